//! Application State

use std::sync::Arc;

use nerkh_core::ReportDispatcher;
use nerkh_registry::UserRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Selector → report text
    pub dispatcher: Arc<ReportDispatcher>,

    /// Users who have sent `/start`
    pub registry: Arc<dyn UserRegistry>,

    /// Telegram id allowed to list users
    pub admin_id: i64,

    /// Configured upstream shape, reported by `/health`
    pub shape: &'static str,
}
