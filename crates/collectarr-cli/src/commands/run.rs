use crate::output::Output;
use color_eyre::Result;
use collection_sync_config::Config;

pub async fn run_once(config: Config, output: &Output) -> Result<()> {
    tracing::debug!("Run command started");

    let reconciler = super::connect(&config).await?;
    if config.reconcile.dry_run {
        output.info("Dry run: missing movies will be reported, not added");
    }

    let summary = reconciler.run_once().await;
    output.summary(&summary);

    Ok(())
}
