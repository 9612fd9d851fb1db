//! Ingest command - one ingestion pass, then exit

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Congress to ingest (defaults to the configured session)
    #[arg(long)]
    pub congress: Option<u16>,
}

/// Run a single ingestion pass
pub async fn run(args: IngestArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&logging::LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });

    let state = crate::create_app_state_with_config(&config).await?;
    let congress = args.congress.unwrap_or(config.ingestion.congress);

    let report = state.ingestion_service.run(congress).await?;

    info!(
        processed = report.processed,
        errors = report.errors,
        "{}",
        report.message
    );

    Ok(())
}
