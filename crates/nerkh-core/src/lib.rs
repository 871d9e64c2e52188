//! # nerkh-core
//!
//! Price retrieval and normalization for the nerkh price service.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     ReportDispatcher                          │
//! │  selector ──▶ CategoryReporter ──▶ QuoteFetcher (N, bounded)  │
//! │                      │                  (Strategy)            │
//! │                      └──▶ normalize ──▶ labeled lines         │
//! │  HeaderSource ──▶ header + sections ──▶ report text           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `QuoteFetcher` trait lets a deployment swap the upstream response
//! shape (profile page, keyed JSON, ticker JSON) without touching callers.

pub mod catalog;
pub mod dispatcher;
pub mod error;
pub mod fetcher;
pub mod header;
pub mod model;
pub mod normalize;
pub mod reporter;

pub use catalog::Catalog;
pub use dispatcher::{ReportDispatcher, Selector};
pub use error::{FetchError, NerkhError, Result};
pub use fetcher::{QuoteFetcher, StaticQuoteFetcher};
pub use header::{FixedHeader, HeaderSource};
pub use model::{Category, CategoryReport, Instrument, NormalizedQuote, RawQuote, ReportLine};
pub use normalize::normalize;
pub use reporter::{CategoryReporter, ReporterConfig};
