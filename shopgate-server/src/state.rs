//! Application state shared across all request handlers.

use shopgate_core::config::SharedConfig;
use shopgate_core::processors::WebhookIntake;
use shopgate_core::services::{OrderService, ProductCatalog, SearchIndexer};
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
/// Collaborators are trait objects so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    /// Shared configuration with per-section locks (reloadable via SIGHUP).
    pub config: SharedConfig,
    pub orders: Arc<dyn OrderService>,
    pub products: Arc<dyn ProductCatalog>,
    pub search: Arc<dyn SearchIndexer>,
    pub webhook_intake: WebhookIntake,
}
