pub mod register;
pub mod serve;
pub mod vouches;

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use vouch_core::config::Config;

fn load_config(path: &Path) -> anyhow::Result<Config> {
    Config::load(path).with_context(|| format!("loading config from {}", path.display()))
}

/// REST client for the configured bot token and API base.
fn discord_api(config: &Config) -> Arc<discord_client::DiscordHttp> {
    Arc::new(discord_client::DiscordHttp::with_base_url(
        config.token.clone(),
        config.api_base.clone(),
    ))
}
