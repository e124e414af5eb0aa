use crate::error::{Result, VouchError};
use crate::io;
use crate::paths;
use discord_client::DEFAULT_API_BASE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3000;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Runtime configuration for the bot.
///
/// Loaded from `config.json` (camelCase keys) with environment variables
/// taking precedence key by key.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub token: String,
    pub client_id: String,
    pub guild_id: String,
    pub vouch_channel_id: String,
    pub owner_id: String,
    pub public_key: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_data_file() -> PathBuf {
    PathBuf::from(paths::DATA_FILE)
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("guild_id", &self.guild_id)
            .field("vouch_channel_id", &self.vouch_channel_id)
            .field("owner_id", &self.owner_id)
            .field("public_key", &self.public_key)
            .field("port", &self.port)
            .field("data_file", &self.data_file)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Every key optional, as read from disk before env overrides apply.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialConfig {
    token: Option<String>,
    client_id: Option<String>,
    guild_id: Option<String>,
    vouch_channel_id: Option<String>,
    owner_id: Option<String>,
    public_key: Option<String>,
    port: Option<u16>,
    data_file: Option<PathBuf>,
    api_base: Option<String>,
}

impl Config {
    /// Load from `path`, overlaying process environment variables.
    /// A missing file is fine as long as the environment supplies every key.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`] with an injectable environment lookup.
    pub fn load_with_env(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut partial = match io::read_optional(path)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| VouchError::Parse {
                path: path.display().to_string(),
                source,
            })?,
            None => PartialConfig::default(),
        };

        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        overlay(&mut partial.token, env("DISCORD_TOKEN"));
        overlay(&mut partial.client_id, env("DISCORD_CLIENT_ID"));
        overlay(&mut partial.guild_id, env("DISCORD_GUILD_ID"));
        overlay(&mut partial.vouch_channel_id, env("VOUCH_CHANNEL_ID"));
        overlay(&mut partial.owner_id, env("VOUCH_OWNER_ID"));
        overlay(&mut partial.public_key, env("DISCORD_PUBLIC_KEY"));
        if let Some(port) = env("PORT") {
            partial.port = Some(port.parse().map_err(|_| VouchError::InvalidConfig {
                key: "port".into(),
                reason: format!("'{port}' is not a valid port number"),
            })?);
        }

        Self::from_partial(partial)
    }

    fn from_partial(p: PartialConfig) -> Result<Self> {
        let mut missing = Vec::new();
        let mut take = |value: Option<String>, key: &str| {
            value.filter(|v| !v.trim().is_empty()).unwrap_or_else(|| {
                missing.push(key.to_string());
                String::new()
            })
        };
        let token = take(p.token, "token");
        let client_id = take(p.client_id, "clientId");
        let guild_id = take(p.guild_id, "guildId");
        let vouch_channel_id = take(p.vouch_channel_id, "vouchChannelId");
        let owner_id = take(p.owner_id, "ownerId");
        let public_key = take(p.public_key, "publicKey");
        if !missing.is_empty() {
            return Err(VouchError::MissingConfig(missing));
        }

        Ok(Config {
            token,
            client_id,
            guild_id,
            vouch_channel_id,
            owner_id,
            public_key,
            port: p.port.unwrap_or(DEFAULT_PORT),
            data_file: p.data_file.unwrap_or_else(default_data_file),
            api_base: p.api_base.unwrap_or_else(default_api_base),
        })
    }
}

fn overlay(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}
