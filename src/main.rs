//! Report ingestion console.
//!
//! Walks a range of publication days, downloads each day's trading report
//! and stores the extracted results. Days without a publication (weekends,
//! holidays) are logged and skipped.
//!
//! # Usage
//! ```sh
//! cargo run -- --start 2023-01-01 --end 2024-01-01
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use spimex_reports::application::ingest::ReportIngestService;
use spimex_reports::application::reports::publication_moment;
use spimex_reports::config::Config;
use spimex_reports::infrastructure::persistence::Database;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Debug, Parser)]
#[command(about = "Ingest exchange trading reports into the local store")]
struct Args {
    /// First publication day to ingest (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,

    /// Day after the last publication day to ingest (YYYY-MM-DD)
    #[arg(long)]
    end: NaiveDate,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!(
        "Report ingestion {} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: store={}, reports={}",
        config.database_url, config.reports_base_url
    );

    let database = Database::new(&config.database_url).await?;

    let service = Arc::new(ReportIngestService::new(
        database,
        config.reports_base_url,
        Duration::from_secs(config.fetch_timeout_secs),
    ));

    info!(
        "Ingesting publications from {} to {} (exclusive)",
        args.start, args.end
    );
    let summary = service
        .ingest_range(publication_moment(args.start), publication_moment(args.end))
        .await;

    info!(
        "Ingest finished: {} reports stored, {} dates skipped",
        summary.ingested, summary.skipped
    );

    Ok(())
}
