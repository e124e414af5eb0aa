use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CDN_BASE: &str = "https://cdn.discordapp.com";

/// Message flag that hides a response from everyone but the invoker.
pub const EPHEMERAL: u64 = 1 << 6;

// ─── Users and members ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// `name#1234` for legacy accounts, the bare username for migrated ones.
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            None | Some("0") | Some("") => self.username.clone(),
            Some(d) => format!("{}#{}", self.username, d),
        }
    }

    /// Avatar URL as shown by the client: animated hashes get `.gif`,
    /// static ones `.webp`, and users without an avatar get the default
    /// embed avatar for their id.
    pub fn display_avatar_url(&self) -> String {
        match self.avatar.as_deref() {
            Some(hash) => {
                let ext = if hash.starts_with("a_") { "gif" } else { "webp" };
                format!("{CDN_BASE}/avatars/{}/{hash}.{ext}", self.id)
            }
            None => format!("{CDN_BASE}/embed/avatars/{}.png", self.default_avatar_index()),
        }
    }

    fn default_avatar_index(&self) -> u64 {
        let legacy = self
            .discriminator
            .as_deref()
            .and_then(|d| d.parse::<u64>().ok())
            .filter(|d| *d != 0);
        match legacy {
            Some(d) => d % 5,
            None => self.id.parse::<u64>().map(|id| (id >> 22) % 6).unwrap_or(0),
        }
    }
}

/// Guild member as embedded in an interaction or returned by
/// `GET /guilds/{guild}/members/{user}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub nick: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Role {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Decimal bitset, sent as a string.
    pub permissions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Guild {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub owner_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Channel {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub guild_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
}

// ─── Inbound interactions ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum InteractionType {
    Ping,
    ApplicationCommand,
    Other(u8),
}

impl From<u8> for InteractionType {
    fn from(v: u8) -> Self {
        match v {
            1 => InteractionType::Ping,
            2 => InteractionType::ApplicationCommand,
            other => InteractionType::Other(other),
        }
    }
}

/// An interaction as POSTed to the interactions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub application_id: String,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default)]
    pub data: Option<CommandData>,
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    /// Present when invoked in a guild.
    #[serde(default)]
    pub member: Option<Member>,
    /// Present when invoked in a DM.
    #[serde(default)]
    pub user: Option<User>,
    pub token: String,
}

impl Interaction {
    /// The invoking user, wherever Discord put it.
    pub fn invoker(&self) -> Option<&User> {
        self.member
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .or(self.user.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandDataOption>,
    #[serde(default)]
    pub resolved: Option<Resolved>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandDataOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resolved {
    #[serde(default)]
    pub attachments: HashMap<String, Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl CommandData {
    fn option(&self, name: &str) -> Option<&serde_json::Value> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .and_then(|o| o.value.as_ref())
    }

    pub fn string_option(&self, name: &str) -> Option<&str> {
        self.option(name).and_then(|v| v.as_str())
    }

    pub fn integer_option(&self, name: &str) -> Option<i64> {
        self.option(name).and_then(|v| v.as_i64())
    }

    /// Attachment options carry only an id; the object lives in `resolved`.
    pub fn attachment_option(&self, name: &str) -> Option<&Attachment> {
        let id = self.string_option(name)?;
        self.resolved.as_ref()?.attachments.get(id)
    }
}

// ─── Outbound messages ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedMedia {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedMedia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedMedia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(EmbedMedia { url: url.into() });
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(EmbedMedia { url: url.into() });
        self
    }

    pub fn timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at);
        self
    }
}

/// Message body shared by channel sends, interaction replies and edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl MessagePayload {
    pub fn text(content: impl Into<String>) -> Self {
        MessagePayload {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn embed(embed: Embed) -> Self {
        MessagePayload {
            embeds: vec![embed],
            ..Default::default()
        }
    }

    pub fn ephemeral(mut self) -> Self {
        self.flags = Some(self.flags.unwrap_or(0) | EPHEMERAL);
        self
    }

    pub fn is_ephemeral(&self) -> bool {
        self.flags.is_some_and(|f| f & EPHEMERAL != 0)
    }
}

/// Body returned from the interactions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessagePayload>,
}

impl InteractionResponse {
    pub const PONG: u8 = 1;
    pub const CHANNEL_MESSAGE: u8 = 4;
    pub const DEFERRED_CHANNEL_MESSAGE: u8 = 5;

    pub fn pong() -> Self {
        InteractionResponse {
            kind: Self::PONG,
            data: None,
        }
    }

    pub fn message(data: MessagePayload) -> Self {
        InteractionResponse {
            kind: Self::CHANNEL_MESSAGE,
            data: Some(data),
        }
    }

    /// "Bot is thinking…" placeholder, to be edited later.
    pub fn deferred(ephemeral: bool) -> Self {
        InteractionResponse {
            kind: Self::DEFERRED_CHANNEL_MESSAGE,
            data: ephemeral.then(|| MessagePayload {
                flags: Some(EPHEMERAL),
                ..Default::default()
            }),
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        self.data.as_ref().is_some_and(|d| d.is_ephemeral())
    }
}

// ─── Command registration ─────────────────────────────────────────────────

pub mod option_type {
    pub const STRING: u8 = 3;
    pub const INTEGER: u8 = 4;
    pub const ATTACHMENT: u8 = 11;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandChoice {
    pub name: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOptionSpec {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<CommandChoice>,
}

/// A chat-input command definition, as sent to the bulk-overwrite endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCommand {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOptionSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegisteredCommand {
    pub id: String,
    pub name: String,
}
