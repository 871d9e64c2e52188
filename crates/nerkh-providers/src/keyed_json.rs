//! Keyed JSON Shape
//!
//! `GET <api-base>/widget/tmp?keys=<numeric-id>` answers
//!
//! ```json
//! {"response": {"indicators": [{"item_id": 137119, "p": "<span class=\"high\">45,810,000</span>"}]}}
//! ```
//!
//! The first indicator's price field is a markup fragment.

use async_trait::async_trait;
use nerkh_core::{FetchError, Instrument, QuoteFetcher, RawQuote};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::config::{ProviderConfig, parse_url};
use crate::error::Result;
use crate::http::{build_client, get_body};
use crate::markup::strip_markup;

#[derive(Deserialize)]
struct WidgetResponse {
    response: WidgetBody,
}

#[derive(Deserialize)]
struct WidgetBody {
    indicators: Vec<Indicator>,
}

#[derive(Deserialize)]
struct Indicator {
    #[serde(default)]
    p: Option<serde_json::Value>,
    #[serde(default)]
    price: Option<serde_json::Value>,
}

/// Reads quotes from the numeric-id widget endpoint
pub struct KeyedJsonFetcher {
    client: Client,
    endpoint: Url,
}

impl KeyedJsonFetcher {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let base = config.api_base.trim_end_matches('/');
        Ok(Self {
            client: build_client(config)?,
            endpoint: parse_url("API_BASE", &format!("{base}/widget/tmp"))?,
        })
    }

    fn url(&self, id: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("keys", id.trim());
        url
    }
}

/// Extract the first indicator's price text from a widget response
pub fn parse_widget(body: &str) -> std::result::Result<String, FetchError> {
    let parsed: WidgetResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::malformed(format!("widget response: {e}")))?;

    let indicator = parsed
        .response
        .indicators
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::malformed("empty indicator list"))?;

    let text = match indicator.p.or(indicator.price) {
        Some(serde_json::Value::String(fragment)) => strip_markup(&fragment),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    if text.is_empty() {
        return Err(FetchError::malformed("indicator has no price"));
    }
    Ok(text)
}

#[async_trait]
impl QuoteFetcher for KeyedJsonFetcher {
    async fn fetch(&self, instrument: &Instrument) -> std::result::Result<RawQuote, FetchError> {
        let body = get_body(&self.client, self.url(&instrument.provider_id)).await?;
        let payload = parse_widget(&body)?;
        Ok(RawQuote::new(&instrument.key, payload))
    }

    fn name(&self) -> &str {
        "keyed"
    }
}
