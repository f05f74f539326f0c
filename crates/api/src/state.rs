use std::sync::Arc;

use assetdesk_core::service::AssetService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the service holds `Arc`s internally.
#[derive(Clone)]
pub struct AppState {
    /// Asset lifecycle operations over the configured store.
    pub service: AssetService,
    /// Database pool, when the service is backed by Postgres. Only used by
    /// the health check.
    pub pool: Option<assetdesk_db::DbPool>,
    pub config: Arc<ServerConfig>,
}
