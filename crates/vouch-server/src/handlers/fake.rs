//! Recording stand-in for the Discord API, used by handler tests.
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::time::Instant;

use discord_client::{
    ApplicationCommand, Channel, DiscordApi, DiscordError, Message, MessagePayload, Permissions,
    RegisteredCommand, User,
};
use vouch_core::config::Config;

use crate::state::AppState;

pub const OWNER_ID: &str = "4000";
pub const VOUCH_CHANNEL_ID: &str = "3000";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CurrentUser,
    Register(Vec<ApplicationCommand>),
    GetChannel(String),
    Permissions(String),
    Rename { channel: String, name: String },
    Send { channel: String, payload: MessagePayload, at: Instant },
    EditOriginal { token: String, payload: MessagePayload },
}

pub enum RenameBehaviour {
    Succeed,
    Hang,
    Fail(u16),
}

pub struct FakeDiscord {
    pub calls: Mutex<Vec<Call>>,
    pub channel_exists: bool,
    pub permissions: Permissions,
    pub rename: RenameBehaviour,
    /// Fail the nth (0-based) channel send.
    pub fail_send_at: Option<usize>,
    pub fail_register: bool,
}

impl Default for FakeDiscord {
    fn default() -> Self {
        FakeDiscord {
            calls: Mutex::new(Vec::new()),
            channel_exists: true,
            permissions: Permissions::MANAGE_CHANNELS,
            rename: RenameBehaviour::Succeed,
            fail_send_at: None,
            fail_register: false,
        }
    }
}

impl FakeDiscord {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sends(&self) -> Vec<(MessagePayload, Instant)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send { payload, at, .. } => Some((payload, at)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn channel(id: &str, name: &str) -> Channel {
        Channel {
            id: id.into(),
            kind: 0,
            name: Some(name.into()),
            guild_id: Some("2000".into()),
        }
    }
}

#[async_trait]
impl DiscordApi for FakeDiscord {
    async fn current_user(&self) -> discord_client::Result<User> {
        self.record(Call::CurrentUser);
        Ok(User {
            id: "555".into(),
            username: "vouchbot".into(),
            discriminator: Some("0".into()),
            global_name: None,
            avatar: None,
            bot: true,
        })
    }

    async fn register_guild_commands(
        &self,
        _application_id: &str,
        _guild_id: &str,
        commands: &[ApplicationCommand],
    ) -> discord_client::Result<Vec<RegisteredCommand>> {
        self.record(Call::Register(commands.to_vec()));
        if self.fail_register {
            return Err(DiscordError::Api {
                endpoint: "PUT /applications/1000/guilds/2000/commands".into(),
                status: 403,
                body: r#"{"message":"Missing Access","code":50001}"#.into(),
            });
        }
        Ok(commands
            .iter()
            .enumerate()
            .map(|(i, c)| RegisteredCommand {
                id: i.to_string(),
                name: c.name.clone(),
            })
            .collect())
    }

    async fn get_channel(&self, channel_id: &str) -> discord_client::Result<Option<Channel>> {
        self.record(Call::GetChannel(channel_id.into()));
        Ok(self
            .channel_exists
            .then(|| Self::channel(channel_id, "vouches")))
    }

    async fn rename_channel(
        &self,
        channel_id: &str,
        name: &str,
    ) -> discord_client::Result<Channel> {
        self.record(Call::Rename {
            channel: channel_id.into(),
            name: name.into(),
        });
        match self.rename {
            RenameBehaviour::Succeed => Ok(Self::channel(channel_id, name)),
            RenameBehaviour::Hang => {
                std::future::pending::<()>().await;
                unreachable!("pending never resolves")
            }
            RenameBehaviour::Fail(status) => Err(DiscordError::Api {
                endpoint: format!("PATCH /channels/{channel_id}"),
                status,
                body: "{}".into(),
            }),
        }
    }

    async fn send_message(
        &self,
        channel_id: &str,
        message: &MessagePayload,
    ) -> discord_client::Result<Message> {
        let index = self.sends().len();
        self.record(Call::Send {
            channel: channel_id.into(),
            payload: message.clone(),
            at: Instant::now(),
        });
        if self.fail_send_at == Some(index) {
            return Err(DiscordError::Api {
                endpoint: format!("POST /channels/{channel_id}/messages"),
                status: 500,
                body: "boom".into(),
            });
        }
        Ok(Message {
            id: index.to_string(),
            channel_id: channel_id.into(),
        })
    }

    async fn edit_original_response(
        &self,
        _application_id: &str,
        interaction_token: &str,
        message: &MessagePayload,
    ) -> discord_client::Result<Message> {
        self.record(Call::EditOriginal {
            token: interaction_token.into(),
            payload: message.clone(),
        });
        Ok(Message {
            id: "original".into(),
            channel_id: "dm".into(),
        })
    }

    async fn bot_guild_permissions(&self, guild_id: &str) -> discord_client::Result<Permissions> {
        self.record(Call::Permissions(guild_id.into()));
        Ok(self.permissions)
    }
}

pub fn test_config() -> Config {
    let key = ed25519_dalek::SigningKey::from_bytes(&[7u8; 32]);
    Config {
        token: "token".into(),
        client_id: "1000".into(),
        guild_id: "2000".into(),
        vouch_channel_id: VOUCH_CHANNEL_ID.into(),
        owner_id: OWNER_ID.into(),
        public_key: hex::encode(key.verifying_key().as_bytes()),
        port: 0,
        data_file: vouch_core::paths::DATA_FILE.into(),
        api_base: discord_client::DEFAULT_API_BASE.into(),
    }
}

pub fn test_state(dir: &TempDir, api: Arc<FakeDiscord>) -> AppState {
    AppState::new(test_config(), dir.path(), api).unwrap()
}
