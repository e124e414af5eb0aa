use std::path::Path;
use std::sync::Arc;

use discord_client::DiscordApi;
use vouch_core::config::Config;
use vouch_core::{paths, RecordStore};

use crate::signature::InteractionVerifier;

/// Everything a handler needs, passed explicitly instead of living in globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: RecordStore,
    pub api: Arc<dyn DiscordApi>,
    pub verifier: InteractionVerifier,
}

impl AppState {
    /// Build the state for a bot rooted at `root`; the data file is resolved
    /// against it.
    pub fn new(config: Config, root: &Path, api: Arc<dyn DiscordApi>) -> anyhow::Result<Self> {
        let verifier = InteractionVerifier::from_hex(&config.public_key)?;
        let store = RecordStore::new(paths::data_path(root, &config.data_file));
        Ok(Self {
            config: Arc::new(config),
            store,
            api,
            verifier,
        })
    }
}
