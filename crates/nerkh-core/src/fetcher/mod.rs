//! Quote Fetching
//!
//! The single contract every upstream shape implements.

mod mock;

pub use mock::StaticQuoteFetcher;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::{Instrument, RawQuote};

/// Quote fetcher trait (Strategy pattern)
///
/// One implementation per upstream response shape. Implementations make a
/// single attempt with their own timeout and never retry.
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    /// Fetch the current raw quote for an instrument
    async fn fetch(&self, instrument: &Instrument) -> Result<RawQuote, FetchError>;

    /// Shape name, for logs and health output
    fn name(&self) -> &str;
}
