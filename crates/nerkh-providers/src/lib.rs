//! # nerkh-providers
//!
//! Upstream quote sources for the nerkh price service.
//!
//! ## Shapes
//!
//! - **profile** (default): per-instrument HTML profile page, price in a marked element
//! - **keyed**: JSON widget addressed by numeric id, price as a markup fragment
//! - **ticker**: JSON widget addressed by ticker code, token authenticated
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nerkh_providers::{ProviderConfig, build_fetcher};
//!
//! let config = ProviderConfig::from_env()?;
//! let fetcher = build_fetcher(&config)?;
//! let reporter = CategoryReporter::new(catalog, fetcher, ReporterConfig::default());
//! ```

use std::sync::Arc;

use nerkh_core::QuoteFetcher;

pub mod config;
pub mod error;
mod http;
pub mod keyed_json;
pub mod markup;
pub mod profile_page;
pub mod ticker_json;

#[cfg(test)]
mod fixture;

pub use config::{ProviderConfig, Shape};
pub use error::{ProviderError, Result};
pub use keyed_json::KeyedJsonFetcher;
pub use profile_page::ProfilePageFetcher;
pub use ticker_json::TickerJsonFetcher;

/// Build the fetcher for the configured shape
pub fn build_fetcher(config: &ProviderConfig) -> Result<Arc<dyn QuoteFetcher>> {
    config.validate()?;

    let fetcher: Arc<dyn QuoteFetcher> = match config.shape {
        Shape::ProfilePage => Arc::new(ProfilePageFetcher::new(config)?),
        Shape::KeyedJson => Arc::new(KeyedJsonFetcher::new(config)?),
        Shape::TickerJson => Arc::new(TickerJsonFetcher::new(config)?),
    };

    tracing::info!(shape = config.shape.as_str(), timeout = ?config.timeout, "Quote fetcher ready");
    Ok(fetcher)
}
