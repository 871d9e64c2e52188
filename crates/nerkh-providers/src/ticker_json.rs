//! Ticker JSON Shape
//!
//! `GET <api-base>/widget/v2?type=ticker&items=<ticker>&token=<token>` answers
//! an object keyed by ticker code, optionally wrapped in `"response"`:
//!
//! ```json
//! {"response": {"price_dollar_rl": {"title": "دلار", "price": "92,350"}}}
//! ```

use async_trait::async_trait;
use nerkh_core::{FetchError, Instrument, QuoteFetcher, RawQuote};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::config::{ProviderConfig, parse_url};
use crate::error::{ProviderError, Result};
use crate::http::{build_client, get_body};
use crate::markup::strip_markup;

/// Reads quotes from the ticker widget endpoint
pub struct TickerJsonFetcher {
    client: Client,
    endpoint: Url,
    token: String,
}

impl TickerJsonFetcher {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let token = config
            .api_token
            .clone()
            .ok_or_else(|| ProviderError::Config("API_TOKEN is required for the ticker shape".into()))?;
        let base = config.api_base.trim_end_matches('/');
        Ok(Self {
            client: build_client(config)?,
            endpoint: parse_url("API_BASE", &format!("{base}/widget/v2"))?,
            token,
        })
    }

    fn url(&self, ticker: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("type", "ticker")
            .append_pair("items", ticker.trim())
            .append_pair("token", &self.token);
        url
    }
}

/// Extract the price for `ticker` from a ticker response
pub fn parse_ticker(body: &str, ticker: &str) -> std::result::Result<String, FetchError> {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::malformed(format!("ticker response: {e}")))?;

    let items = match root.get("response") {
        Some(inner) if inner.is_object() => inner,
        _ => &root,
    };

    let entry = items
        .get(ticker)
        .ok_or_else(|| FetchError::malformed(format!("ticker '{ticker}' missing from response")))?;

    let text = match entry.get("price").or_else(|| entry.get("p")) {
        Some(Value::String(s)) => strip_markup(s),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    if text.is_empty() {
        return Err(FetchError::malformed(format!("ticker '{ticker}' has no price")));
    }
    Ok(text)
}

#[async_trait]
impl QuoteFetcher for TickerJsonFetcher {
    async fn fetch(&self, instrument: &Instrument) -> std::result::Result<RawQuote, FetchError> {
        let ticker = instrument.provider_id.trim();
        let body = get_body(&self.client, self.url(ticker)).await?;
        let payload = parse_ticker(&body, ticker)?;
        Ok(RawQuote::new(&instrument.key, payload))
    }

    fn name(&self) -> &str {
        "ticker"
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use axum::{Json, Router, extract::Query, http::StatusCode, routing::get};
    use nerkh_core::Category;

    use super::*;
    use crate::config::Shape;
    use crate::fixture;

    #[test]
    fn parses_wrapped_and_bare_objects() {
        let wrapped = r#"{"response":{"price_dollar_rl":{"title":"دلار","price":"92,350"}}}"#;
        assert_eq!(parse_ticker(wrapped, "price_dollar_rl").unwrap(), "92,350");

        let bare = r#"{"tether":{"price":98150}}"#;
        assert_eq!(parse_ticker(bare, "tether").unwrap(), "98150");
    }

    #[test]
    fn missing_ticker_or_price_is_malformed() {
        let body = r#"{"geram18":{"price":"1"}}"#;
        assert!(matches!(parse_ticker(body, "geram24"), Err(FetchError::Malformed(_))));
        assert!(matches!(
            parse_ticker(r#"{"geram18":{"title":"x"}}"#, "geram18"),
            Err(FetchError::Malformed(_))
        ));
        assert!(matches!(parse_ticker("[]", "geram18"), Err(FetchError::Malformed(_))));
    }

    async fn ticker(
        Query(params): Query<HashMap<String, String>>,
    ) -> std::result::Result<Json<serde_json::Value>, StatusCode> {
        if params.get("token").map(String::as_str) != Some("secret")
            || params.get("type").map(String::as_str) != Some("ticker")
        {
            return Err(StatusCode::UNAUTHORIZED);
        }
        let item = params.get("items").cloned().unwrap_or_default();
        let mut items = serde_json::Map::new();
        items.insert(item, serde_json::json!({"price": "<b>4,512,300</b>"}));
        Ok(Json(serde_json::json!({ "response": items })))
    }

    async fn fetcher(token: &str) -> TickerJsonFetcher {
        let base = fixture::serve(Router::new().route("/widget/v2", get(ticker))).await;
        TickerJsonFetcher::new(&ProviderConfig {
            shape: Shape::TickerJson,
            api_base: base,
            api_token: Some(token.into()),
            timeout: Duration::from_secs(5),
            ..ProviderConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn fetches_by_ticker() {
        let fetcher = fetcher("secret").await;
        let instrument = Instrument::new("geram18", "geram18", "طلای ۱۸ عیار", Category::Gold);
        let quote = fetcher.fetch(&instrument).await.unwrap();
        assert_eq!(quote.payload, "4,512,300");
    }

    #[tokio::test]
    async fn rejected_token_is_unavailable_without_leaking_it() {
        let fetcher = fetcher("wrong-token").await;
        let instrument = Instrument::new("geram18", "geram18", "طلای ۱۸ عیار", Category::Gold);
        let err = fetcher.fetch(&instrument).await.unwrap_err();
        assert!(matches!(err, FetchError::Unavailable(_)));
        assert!(!err.to_string().contains("wrong-token"));
    }

    #[test]
    fn requires_token() {
        let config = ProviderConfig {
            shape: Shape::TickerJson,
            ..ProviderConfig::default()
        };
        assert!(TickerJsonFetcher::new(&config).is_err());
    }
}
