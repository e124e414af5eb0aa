use std::path::Path;

use super::{discord_api, load_config};

pub fn run(root: &Path, config_path: &Path, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.port = port;
    }

    let api = discord_api(&config);
    let state = vouch_server::AppState::new(config, root, api)?;
    tracing::info!(data = %state.store.path().display(), "vouch store");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        tokio::select! {
            res = vouch_server::start(state) => res,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    })
}
