//! Static Quote Fetcher
//!
//! In-process fetcher with canned answers. Used by tests and local demos.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::QuoteFetcher;
use crate::error::FetchError;
use crate::model::{Instrument, RawQuote};

/// Fetcher that answers from a fixed table keyed by instrument key
#[derive(Clone, Debug, Default)]
pub struct StaticQuoteFetcher {
    answers: HashMap<String, Result<String, FetchError>>,
    delays: HashMap<String, Duration>,
    /// Answer for keys with no entry (`None` = malformed)
    fallback: Option<String>,
}

impl StaticQuoteFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every unknown key answers with `payload`
    pub fn answering_all(payload: impl Into<String>) -> Self {
        Self {
            fallback: Some(payload.into()),
            ..Self::default()
        }
    }

    /// Answer `key` with `payload`
    pub fn with_quote(mut self, key: impl Into<String>, payload: impl Into<String>) -> Self {
        self.answers.insert(key.into(), Ok(payload.into()));
        self
    }

    /// Fail `key` with `error`
    pub fn with_error(mut self, key: impl Into<String>, error: FetchError) -> Self {
        self.answers.insert(key.into(), Err(error));
        self
    }

    /// Sleep before answering `key`
    pub fn with_delay(mut self, key: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(key.into(), delay);
        self
    }
}

#[async_trait]
impl QuoteFetcher for StaticQuoteFetcher {
    async fn fetch(&self, instrument: &Instrument) -> Result<RawQuote, FetchError> {
        if let Some(delay) = self.delays.get(&instrument.key) {
            tokio::time::sleep(*delay).await;
        }

        let payload = match self.answers.get(&instrument.key) {
            Some(answer) => answer.clone()?,
            None => self.fallback.clone().ok_or_else(|| {
                FetchError::malformed(format!("no canned quote for {}", instrument.key))
            })?,
        };

        Ok(RawQuote::new(&instrument.key, payload))
    }

    fn name(&self) -> &str {
        "static"
    }
}
