use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::permissions::{guild_permissions, Permissions};
use crate::types::{
    ApplicationCommand, Channel, Guild, Member, Message, MessagePayload, RegisteredCommand, Role,
    User,
};
use crate::{DiscordError, Result};

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/orchard9/vouchbot, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

// ─── DiscordApi ───────────────────────────────────────────────────────────

/// The subset of the Discord REST API the bot relies on.
///
/// [`DiscordHttp`] talks to Discord; tests substitute a recording fake.
#[async_trait]
pub trait DiscordApi: Send + Sync {
    /// `GET /users/@me`, the bot's own user.
    async fn current_user(&self) -> Result<User>;

    /// Replace every command registered for `guild_id` with `commands`.
    async fn register_guild_commands(
        &self,
        application_id: &str,
        guild_id: &str,
        commands: &[ApplicationCommand],
    ) -> Result<Vec<RegisteredCommand>>;

    /// Look a channel up by id. Unknown or inaccessible channels are `None`.
    async fn get_channel(&self, channel_id: &str) -> Result<Option<Channel>>;

    async fn rename_channel(&self, channel_id: &str, name: &str) -> Result<Channel>;

    async fn send_message(&self, channel_id: &str, message: &MessagePayload) -> Result<Message>;

    /// Edit the original (usually deferred) response to an interaction.
    async fn edit_original_response(
        &self,
        application_id: &str,
        interaction_token: &str,
        message: &MessagePayload,
    ) -> Result<Message>;

    /// Guild-level permissions held by the bot itself.
    async fn bot_guild_permissions(&self, guild_id: &str) -> Result<Permissions>;
}

// ─── DiscordHttp ──────────────────────────────────────────────────────────

/// [`DiscordApi`] over HTTPS with a bot token.
pub struct DiscordHttp {
    http: reqwest::Client,
    base: String,
    token: String,
    bot_user: OnceCell<User>,
}

impl DiscordHttp {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_API_BASE)
    }

    /// Point the client at another API root (a proxy, or a mock server).
    pub fn with_base_url(token: impl Into<String>, base: impl Into<String>) -> Self {
        DiscordHttp {
            http: reqwest::Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
            token: token.into(),
            bot_user: OnceCell::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base, path))
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let endpoint = format!("GET {path}");
        self.execute(self.request(Method::GET, path), endpoint).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let endpoint = format!("{method} {path}");
        self.execute(self.request(method, path).json(body), endpoint)
            .await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        endpoint: String,
    ) -> Result<T> {
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        tracing::debug!(%endpoint, status = status.as_u16(), "discord call");

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v.get("retry_after").and_then(|r| r.as_f64()))
                .unwrap_or(0.0);
            return Err(DiscordError::RateLimited {
                endpoint,
                retry_after,
            });
        }
        if !status.is_success() {
            return Err(DiscordError::Api {
                endpoint,
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|source| DiscordError::Decode { endpoint, source })
    }

    async fn bot_user(&self) -> Result<&User> {
        self.bot_user
            .get_or_try_init(|| self.get("/users/@me"))
            .await
    }
}

#[derive(Serialize)]
struct RenameBody<'a> {
    name: &'a str,
}

#[async_trait]
impl DiscordApi for DiscordHttp {
    async fn current_user(&self) -> Result<User> {
        self.bot_user().await.cloned()
    }

    async fn register_guild_commands(
        &self,
        application_id: &str,
        guild_id: &str,
        commands: &[ApplicationCommand],
    ) -> Result<Vec<RegisteredCommand>> {
        let path = format!("/applications/{application_id}/guilds/{guild_id}/commands");
        self.send_json(Method::PUT, &path, commands).await
    }

    async fn get_channel(&self, channel_id: &str) -> Result<Option<Channel>> {
        match self.get(&format!("/channels/{channel_id}")).await {
            Ok(channel) => Ok(Some(channel)),
            Err(DiscordError::Api { status, .. }) if status == 404 || status == 403 => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn rename_channel(&self, channel_id: &str, name: &str) -> Result<Channel> {
        let body = RenameBody { name };
        self.send_json(Method::PATCH, &format!("/channels/{channel_id}"), &body)
            .await
    }

    async fn send_message(&self, channel_id: &str, message: &MessagePayload) -> Result<Message> {
        let path = format!("/channels/{channel_id}/messages");
        self.send_json(Method::POST, &path, message).await
    }

    async fn edit_original_response(
        &self,
        application_id: &str,
        interaction_token: &str,
        message: &MessagePayload,
    ) -> Result<Message> {
        let path = format!("/webhooks/{application_id}/{interaction_token}/messages/@original");
        self.send_json(Method::PATCH, &path, message).await
    }

    async fn bot_guild_permissions(&self, guild_id: &str) -> Result<Permissions> {
        let bot_id = self.bot_user().await?.id.clone();
        let guild: Guild = self.get(&format!("/guilds/{guild_id}")).await?;
        let member: Member = self
            .get(&format!("/guilds/{guild_id}/members/{bot_id}"))
            .await?;
        let roles: Vec<Role> = self.get(&format!("/guilds/{guild_id}/roles")).await?;
        Ok(guild_permissions(&guild, &bot_id, &member, &roles))
    }
}
