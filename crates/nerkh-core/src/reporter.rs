//! Category Reporter
//!
//! Fetches every instrument of a report concurrently and assembles the
//! labeled lines in catalog order. A failing instrument only degrades its own
//! line.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::Instant;

use crate::catalog::Catalog;
use crate::error::FetchError;
use crate::fetcher::QuoteFetcher;
use crate::model::{Category, CategoryReport, Instrument, NormalizedQuote, ReportLine};
use crate::normalize::normalize;

/// Reporter tuning
#[derive(Clone, Debug, Default)]
pub struct ReporterConfig {
    /// Maximum in-flight fetches per report; `None` uses the size of the
    /// catalog's largest category
    pub concurrency: Option<usize>,

    /// Outer bound for a whole report; unfinished lines become sentinels
    pub deadline: Option<Duration>,
}

/// Builds category reports from the catalog and a fetcher
#[derive(Clone)]
pub struct CategoryReporter {
    catalog: Arc<Catalog>,
    fetcher: Arc<dyn QuoteFetcher>,
    config: ReporterConfig,
}

impl CategoryReporter {
    pub fn new(catalog: Arc<Catalog>, fetcher: Arc<dyn QuoteFetcher>, config: ReporterConfig) -> Self {
        Self {
            catalog,
            fetcher,
            config,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// In-flight fetch bound shared by all sections of one report
    pub fn concurrency(&self) -> usize {
        self.config
            .concurrency
            .unwrap_or_else(|| self.catalog.largest_category())
            .max(1)
    }

    /// Build the report for one category
    pub async fn build_report(&self, category: Category) -> CategoryReport {
        self.build_reports(&[category])
            .await
            .pop()
            .unwrap_or_else(|| CategoryReport {
                category,
                lines: Vec::new(),
            })
    }

    /// Build several category reports as one report, in the given order.
    ///
    /// All sections share the concurrency bound and the deadline.
    pub async fn build_reports(&self, categories: &[Category]) -> Vec<CategoryReport> {
        let deadline = self.config.deadline.map(|d| Instant::now() + d);

        let jobs: Vec<(usize, Instrument)> = categories
            .iter()
            .enumerate()
            .flat_map(|(section, category)| {
                self.catalog
                    .lookup(*category)
                    .into_iter()
                    .map(move |instrument| (section, instrument.clone()))
            })
            .collect();
        tracing::debug!(sections = categories.len(), count = jobs.len(), "building report");

        let fetcher = Arc::clone(&self.fetcher);
        // `buffered` yields in input order regardless of completion order
        let lines: Vec<(usize, ReportLine)> = stream::iter(jobs)
            .map(move |(section, instrument)| {
                let fetcher = Arc::clone(&fetcher);
                async move {
                    let quote = quote_until(fetcher.as_ref(), &instrument, deadline).await;
                    let line = ReportLine {
                        label: instrument.label,
                        display_value: quote.display_value,
                    };
                    (section, line)
                }
            })
            .buffered(self.concurrency())
            .collect()
            .await;

        let mut reports: Vec<CategoryReport> = categories
            .iter()
            .map(|category| CategoryReport {
                category: *category,
                lines: Vec::new(),
            })
            .collect();
        for (section, line) in lines {
            if let Some(report) = reports.get_mut(section) {
                report.lines.push(line);
            }
        }
        reports
    }
}

async fn quote_until(
    fetcher: &dyn QuoteFetcher,
    instrument: &Instrument,
    deadline: Option<Instant>,
) -> NormalizedQuote {
    let result = match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, fetcher.fetch(instrument))
            .await
            .unwrap_or_else(|_| Err(FetchError::unavailable("report deadline elapsed"))),
        None => fetcher.fetch(instrument).await,
    };

    let display_value = match result {
        Ok(raw) => {
            tracing::debug!(key = %raw.instrument_key, payload = %raw.payload, "quote fetched");
            normalize(&raw.payload)
        }
        Err(e) => {
            tracing::warn!(key = %instrument.key, error = %e, "quote unavailable");
            e.sentinel().to_string()
        }
    };

    NormalizedQuote {
        instrument_key: instrument.key.clone(),
        display_value,
    }
}
