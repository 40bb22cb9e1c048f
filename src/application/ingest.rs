//! Report ingestion: fetch, extract, map, persist.
//!
//! One unit of work per report file. Ingestions for different dates are
//! independent of each other, so the range driver runs them as parallel
//! tasks; a failing date is logged and skipped while its siblings proceed.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use futures::future::join_all;
use tracing::{info, warn};

use crate::application::reports;
use crate::domain::errors::IngestError;
use crate::domain::repositories::AsyncTradingResultRepository;
use crate::infrastructure::extract::ReportTable;
use crate::infrastructure::fetch::ReportFetcher;
use crate::infrastructure::persistence::{Database, SqliteTradingResultsUnitOfWork};
use crate::infrastructure::sheet;

/// Outcome of one range ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Reports fetched, extracted and committed.
    pub ingested: usize,
    /// Dates skipped because their ingestion failed.
    pub skipped: usize,
}

pub struct ReportIngestService {
    fetcher: ReportFetcher,
    database: Database,
    base_url: String,
}

impl ReportIngestService {
    pub fn new(database: Database, base_url: impl Into<String>, fetch_timeout: Duration) -> Self {
        Self {
            fetcher: ReportFetcher::new(fetch_timeout),
            database,
            base_url: base_url.into(),
        }
    }

    /// Ingests the report published at `moment`. Returns the number of
    /// records committed for that date.
    pub async fn ingest_publication(&self, moment: NaiveDateTime) -> Result<usize, IngestError> {
        let url = reports::report_url(&self.base_url, moment);
        self.ingest_url(&url).await
    }

    /// Ingests one report file by URL: the whole pipeline inside a single
    /// unit of work, so a failure at any step stages nothing.
    pub async fn ingest_url(&self, url: &str) -> Result<usize, IngestError> {
        let date = reports::date_from_url(url)?;
        let bytes = self.fetcher.fetch(url).await?;

        let grid = sheet::decode_xls(&bytes)?;
        let table = ReportTable::extract(grid, date)?;
        let results = table.list_results()?;
        let count = results.len();

        let mut uow = SqliteTradingResultsUnitOfWork::new(&self.database);
        uow.data_mut().add_bulk(results)?;
        uow.commit().await?;

        Ok(count)
    }

    /// Ingests every publication in `[start, end)` concurrently.
    ///
    /// Each date runs in its own task with its own unit of work; one
    /// failed date never aborts the batch. The exchange skips weekends and
    /// holidays, so a share of skipped dates is the normal case.
    pub async fn ingest_range(
        self: Arc<Self>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> IngestSummary {
        let tasks: Vec<_> = reports::date_range(start, end)
            .map(|moment| {
                let service = Arc::clone(&self);
                tokio::spawn(async move {
                    match service.ingest_publication(moment).await {
                        Ok(count) => {
                            info!("Stored {} trading results for {}", count, moment.date());
                            true
                        }
                        Err(err) => {
                            warn!("Skipping report for {}: {}", moment.date(), err);
                            false
                        }
                    }
                })
            })
            .collect();

        let outcomes = join_all(tasks).await;

        let ingested = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, Ok(true)))
            .count();
        IngestSummary {
            ingested,
            skipped: outcomes.len() - ingested,
        }
    }
}
