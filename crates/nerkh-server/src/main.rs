//! nerkh HTTP Server
//!
//! Axum front end for the nerkh price service: keyboard selectors in,
//! dated price reports out, plus user registration and the admin listing.

mod calendar;
mod config;
mod handlers;
mod state;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nerkh_core::{CategoryReporter, ReportDispatcher};
use nerkh_providers::build_fetcher;

use crate::calendar::JalaliClock;
use crate::config::AppConfig;
use crate::handlers::router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    // Catalog misconfiguration stops startup
    let catalog = Arc::new(config.load_catalog()?);
    tracing::info!(
        "✓ Catalog loaded: {} instruments ({})",
        catalog.len(),
        config
            .catalog_path
            .as_ref()
            .map_or_else(|| "built-in".to_string(), |p| p.display().to_string()),
    );

    let fetcher = build_fetcher(&config.provider).context("building quote fetcher")?;

    let reporter = CategoryReporter::new(catalog.clone(), fetcher, config.reporter.clone());
    let dispatcher = ReportDispatcher::new(reporter, Arc::new(JalaliClock), config.currency_unit.clone());

    let registry = config.open_registry()?;
    tracing::info!("✓ User registry ready: {} users", registry.len()?);

    let state = AppState {
        dispatcher: Arc::new(dispatcher),
        registry,
        admin_id: config.admin_id,
        shape: config.provider.shape.as_str(),
    };

    let app = router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 nerkh server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health        - Health check");
    tracing::info!("  GET  /api/selectors - Keyboard options");
    tracing::info!("  POST /api/start     - Register and greet");
    tracing::info!("  POST /api/report    - Price report for a selector");
    tracing::info!("  GET  /api/users     - Registered users (admin)");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
