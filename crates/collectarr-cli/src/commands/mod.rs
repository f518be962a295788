pub mod config;
pub mod daemon;
pub mod run;

use collection_sync_config::Config;
use collection_sync_core::{ReconcileSettings, Reconciler};
use collection_sync_sources::RadarrClient;
use color_eyre::Result;
use std::sync::Arc;

/// Build the Radarr client and resolve the quality profile. Failure here is fatal for both commands.
pub async fn connect(config: &Config) -> Result<Reconciler> {
    let client = RadarrClient::from_config(&config.radarr)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create Radarr client: {}", e))?;
    Reconciler::connect(Arc::new(client), ReconcileSettings::from_config(config))
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Cannot start reconciliation: {}", e))
}
