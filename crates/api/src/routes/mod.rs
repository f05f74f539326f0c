pub mod assets;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /assets                          list, create
/// /assets/summary                  status counts (GET)
/// /assets/bulk/transition          bulk transition (POST)
/// /assets/bulk/delete              bulk soft-delete (POST)
/// /assets/{id}                     get, update, soft-delete
/// /assets/{id}/transition          transition (POST)
/// /assets/{id}/assignments         assignment history (GET)
/// /assets/{id}/assignment          current open assignment (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/assets", assets::router())
}
