//! Server configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use nerkh_core::dispatcher::DEFAULT_CURRENCY_UNIT;
use nerkh_core::{Catalog, ReporterConfig};
use nerkh_providers::{ProviderConfig, Shape};
use nerkh_registry::{MemoryUserRegistry, SqliteUserRegistry, UserRegistry};

/// Everything the server needs to start
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Telegram id allowed to list users
    pub admin_id: i64,

    /// Listen address
    pub bind_addr: String,

    /// Upstream provider settings
    pub provider: ProviderConfig,

    /// Reporter concurrency and deadline
    pub reporter: ReporterConfig,

    /// JSON catalog file; the built-in table is used when unset
    pub catalog_path: Option<PathBuf>,

    /// SQLite user database; users are kept in memory when unset
    pub database_path: Option<PathBuf>,

    /// Unit appended to every report line
    pub currency_unit: String,
}

impl AppConfig {
    /// Read from an arbitrary variable source
    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let admin_id = get("ADMIN_ID")
            .context("ADMIN_ID must be set")?
            .trim()
            .parse::<i64>()
            .context("ADMIN_ID must be an integer telegram id")?;

        let concurrency = match get("FETCH_CONCURRENCY") {
            Some(v) => {
                let limit = v
                    .trim()
                    .parse::<usize>()
                    .context("FETCH_CONCURRENCY must be a whole number")?;
                if limit == 0 {
                    bail!("FETCH_CONCURRENCY must be at least 1");
                }
                Some(limit)
            }
            None => None,
        };

        let deadline = match get("REPORT_DEADLINE_SECS") {
            Some(v) => {
                let secs = v
                    .trim()
                    .parse::<u64>()
                    .context("REPORT_DEADLINE_SECS must be a whole number")?;
                if secs == 0 {
                    bail!("REPORT_DEADLINE_SECS must be greater than 0");
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let provider = ProviderConfig::from_lookup(&get)?;
        let catalog_path = get("CATALOG_PATH").map(PathBuf::from);

        if provider.shape == Shape::KeyedJson && catalog_path.is_none() {
            bail!("CATALOG_PATH is required for the keyed shape (numeric provider ids)");
        }

        Ok(Self {
            admin_id,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            provider,
            reporter: ReporterConfig {
                concurrency,
                deadline,
            },
            catalog_path,
            database_path: get("DATABASE_PATH").map(PathBuf::from),
            currency_unit: get("CURRENCY_UNIT").unwrap_or_else(|| DEFAULT_CURRENCY_UNIT.into()),
        })
    }

    /// Read from process environment
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configured catalog and check it against the provider shape
    pub fn load_catalog(&self) -> anyhow::Result<Catalog> {
        let catalog = match &self.catalog_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading catalog {}", path.display()))?;
                Catalog::from_json(&json)
                    .with_context(|| format!("parsing catalog {}", path.display()))?
            }
            None => Catalog::builtin().context("built-in catalog")?,
        };

        self.provider.validate_catalog(&catalog)?;
        Ok(catalog)
    }

    /// Open the user registry: SQLite when `DATABASE_PATH` is set, memory otherwise
    pub fn open_registry(&self) -> anyhow::Result<Arc<dyn UserRegistry>> {
        match &self.database_path {
            Some(path) => {
                let registry = SqliteUserRegistry::open(path)
                    .with_context(|| format!("opening user database {}", path.display()))?;
                Ok(Arc::new(registry))
            }
            None => {
                tracing::warn!("⚠ DATABASE_PATH not set - registered users are lost on restart");
                Ok(Arc::new(MemoryUserRegistry::new()))
            }
        }
    }
}
