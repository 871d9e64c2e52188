//! Provider configuration
//!
//! One shape per deployment, chosen here and nowhere else.

use std::time::Duration;

use nerkh_core::Catalog;
use reqwest::Url;

use crate::error::{ProviderError, Result};

/// Upstream response shape
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shape {
    /// HTML profile page with the quote in a marked element
    #[default]
    ProfilePage,
    /// `widget/tmp?keys=<id>` JSON with a markup price fragment
    KeyedJson,
    /// `widget/v2?type=ticker` JSON keyed by ticker code
    TickerJson,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::ProfilePage => "profile",
            Shape::KeyedJson => "keyed",
            Shape::TickerJson => "ticker",
        }
    }
}

impl std::str::FromStr for Shape {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "profile" | "html" => Ok(Shape::ProfilePage),
            "keyed" | "keyed-json" => Ok(Shape::KeyedJson),
            "ticker" | "ticker-json" => Ok(Shape::TickerJson),
            other => Err(ProviderError::Config(format!(
                "QUOTE_SHAPE must be profile, keyed or ticker (got '{other}')"
            ))),
        }
    }
}

/// Provider configuration
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// Which upstream shape to speak
    pub shape: Shape,

    /// Profile page base (`<base>/<slug>`)
    pub base_url: String,

    /// JSON widget API base (`<api-base>/widget/...`)
    pub api_base: String,

    /// Token for the ticker endpoint
    pub api_token: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,

    /// Attribute marking the price element on profile pages
    pub marker_attr: String,

    /// Value of `marker_attr` on the price element
    pub marker_value: String,

    /// User-Agent header sent upstream
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            shape: Shape::default(),
            base_url: "https://www.tgju.org/profile/".into(),
            api_base: "https://api.tgju.org/v1".into(),
            api_token: None,
            timeout: Duration::from_secs(10),
            marker_attr: "data-col".into(),
            marker_value: "info-price".into(),
            user_agent: concat!("nerkh/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl ProviderConfig {
    /// Read from an arbitrary variable source, then validate
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let shape = match get("QUOTE_SHAPE") {
            Some(s) => s.parse()?,
            None => defaults.shape,
        };

        let timeout = match get("FETCH_TIMEOUT_SECS") {
            Some(s) => Duration::from_secs(s.trim().parse().map_err(|_| {
                ProviderError::Config(format!("FETCH_TIMEOUT_SECS must be a whole number (got '{s}')"))
            })?),
            None => defaults.timeout,
        };

        let config = Self {
            shape,
            base_url: get("BASE_URL").unwrap_or(defaults.base_url),
            api_base: get("API_BASE").unwrap_or(defaults.api_base),
            api_token: get("API_TOKEN").filter(|t| !t.trim().is_empty()),
            timeout,
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    /// Read from process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Check the values this shape needs
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(ProviderError::Config("FETCH_TIMEOUT_SECS must be greater than 0".into()));
        }

        match self.shape {
            Shape::ProfilePage => {
                parse_url("BASE_URL", &self.base_url)?;
            }
            Shape::KeyedJson => {
                parse_url("API_BASE", &self.api_base)?;
            }
            Shape::TickerJson => {
                parse_url("API_BASE", &self.api_base)?;
                if self.api_token.is_none() {
                    return Err(ProviderError::Config(
                        "API_TOKEN is required for the ticker shape".into(),
                    ));
                }
            }
        }

        if self.marker_attr.trim().is_empty() || self.marker_value.trim().is_empty() {
            return Err(ProviderError::Config("price marker must not be blank".into()));
        }

        Ok(())
    }

    /// Check that every catalog identifier fits this shape
    pub fn validate_catalog(&self, catalog: &Catalog) -> Result<()> {
        if self.shape == Shape::KeyedJson {
            if let Some(bad) = catalog
                .iter()
                .find(|i| i.provider_id.trim().parse::<u64>().is_err())
            {
                return Err(ProviderError::Config(format!(
                    "keyed shape needs numeric provider ids; '{}' has '{}'",
                    bad.key, bad.provider_id
                )));
            }
        }
        Ok(())
    }
}

pub(crate) fn parse_url(name: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| ProviderError::Config(format!("{name} is not a valid URL: {e}")))
}
