//! Profile Page Shape
//!
//! `GET <base>/<slug>` returns an HTML page; the quote is the text of the
//! element carrying the price marker (`data-col="info-price"` by default).

use async_trait::async_trait;
use nerkh_core::{FetchError, Instrument, QuoteFetcher, RawQuote};
use regex::Regex;
use reqwest::{Client, Url};

use crate::config::{ProviderConfig, parse_url};
use crate::error::Result;
use crate::http::{build_client, get_body};
use crate::markup::{marked_text, marker_pattern};

/// Scrapes per-instrument profile pages
pub struct ProfilePageFetcher {
    client: Client,
    base_url: String,
    marker: Regex,
}

impl ProfilePageFetcher {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        parse_url("BASE_URL", &config.base_url)?;
        Ok(Self {
            client: build_client(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            marker: marker_pattern(&config.marker_attr, &config.marker_value)?,
        })
    }

    fn page_url(&self, slug: &str) -> std::result::Result<Url, FetchError> {
        Url::parse(&format!("{}/{}", self.base_url, slug.trim_matches('/')))
            .map_err(|e| FetchError::malformed(format!("bad profile url for '{slug}': {e}")))
    }

    /// Extract the quote text from a profile page
    pub fn parse(&self, html: &str) -> std::result::Result<String, FetchError> {
        marked_text(html, &self.marker)
            .ok_or_else(|| FetchError::malformed("price element not found"))
    }
}

#[async_trait]
impl QuoteFetcher for ProfilePageFetcher {
    async fn fetch(&self, instrument: &Instrument) -> std::result::Result<RawQuote, FetchError> {
        let url = self.page_url(&instrument.provider_id)?;
        let html = get_body(&self.client, url).await?;
        let payload = self.parse(&html)?;
        Ok(RawQuote::new(&instrument.key, payload))
    }

    fn name(&self) -> &str {
        "profile"
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use axum::{Router, extract::Path, http::StatusCode, response::Html, routing::get};
    use nerkh_core::Category;

    use super::*;
    use crate::fixture;

    const PAGE: &str = r#"<!DOCTYPE html>
<html lang="fa"><body>
  <table><tr>
    <td>نرخ فعلی</td><td><span data-col="info-price">45,810,000</span></td>
  </tr><tr>
    <td>تغییر</td><td><span data-col="info-change">1.2%</span></td>
  </tr></table>
</body></html>"#;

    async fn profile(Path(slug): Path<String>) -> std::result::Result<Html<&'static str>, StatusCode> {
        match slug.as_str() {
            "sekee" => Ok(Html(PAGE)),
            "empty" => Ok(Html("<html><body>maintenance</body></html>")),
            "blank" => Ok(Html("")),
            "hang" => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Html(PAGE))
            }
            _ => Err(StatusCode::SERVICE_UNAVAILABLE),
        }
    }

    async fn fetcher(timeout: Duration) -> ProfilePageFetcher {
        let base = fixture::serve(Router::new().route("/profile/{slug}", get(profile))).await;
        ProfilePageFetcher::new(&ProviderConfig {
            base_url: format!("{base}/profile/"),
            timeout,
            ..ProviderConfig::default()
        })
        .unwrap()
    }

    fn instrument(slug: &str) -> Instrument {
        Instrument::new(slug, slug, slug, Category::Coin)
    }

    #[test]
    fn parses_price_span() {
        let fetcher = ProfilePageFetcher::new(&ProviderConfig::default()).unwrap();
        assert_eq!(fetcher.parse(PAGE).unwrap(), "45,810,000");
        assert!(matches!(fetcher.parse("<html></html>"), Err(FetchError::Malformed(_))));
    }

    #[tokio::test]
    async fn fetches_quote_from_page() {
        let fetcher = fetcher(Duration::from_secs(5)).await;
        let quote = fetcher.fetch(&instrument("sekee")).await.unwrap();
        assert_eq!(quote.instrument_key, "sekee");
        assert_eq!(quote.payload, "45,810,000");
    }

    #[tokio::test]
    async fn page_without_marker_is_malformed() {
        let fetcher = fetcher(Duration::from_secs(5)).await;
        let err = fetcher.fetch(&instrument("empty")).await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[tokio::test]
    async fn error_status_and_blank_body_are_unavailable() {
        let fetcher = fetcher(Duration::from_secs(5)).await;
        let err = fetcher.fetch(&instrument("missing")).await.unwrap_err();
        assert!(matches!(err, FetchError::Unavailable(ref m) if m.contains("503")), "{err}");

        let err = fetcher.fetch(&instrument("blank")).await.unwrap_err();
        assert!(matches!(err, FetchError::Unavailable(_)));
    }

    #[tokio::test]
    async fn hanging_upstream_times_out() {
        let fetcher = fetcher(Duration::from_millis(300)).await;
        let started = Instant::now();
        let err = fetcher.fetch(&instrument("hang")).await.unwrap_err();

        assert!(matches!(err, FetchError::Unavailable(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn refused_connection_is_unavailable() {
        let fetcher = ProfilePageFetcher::new(&ProviderConfig {
            base_url: "http://127.0.0.1:9/profile/".into(),
            timeout: Duration::from_secs(2),
            ..ProviderConfig::default()
        })
        .unwrap();
        let err = fetcher.fetch(&instrument("sekee")).await.unwrap_err();
        assert!(matches!(err, FetchError::Unavailable(_)));
    }
}
