//! Route definitions for assets.
//!
//! Mounted at `/assets` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Asset routes.
///
/// ```text
/// POST   /                      -> create_asset
/// GET    /                      -> list_assets
/// GET    /summary               -> status_summary
/// POST   /bulk/transition       -> bulk_transition
/// POST   /bulk/delete           -> bulk_delete
/// GET    /{id}                  -> get_asset
/// PUT    /{id}                  -> update_asset
/// DELETE /{id}                  -> delete_asset
/// POST   /{id}/transition       -> transition_asset
/// GET    /{id}/assignments      -> assignment_history
/// GET    /{id}/assignment       -> current_assignment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(assets::create_asset).get(assets::list_assets))
        .route("/summary", get(assets::status_summary))
        .route("/bulk/transition", post(assets::bulk_transition))
        .route("/bulk/delete", post(assets::bulk_delete))
        .route(
            "/{id}",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/{id}/transition", post(assets::transition_asset))
        .route("/{id}/assignments", get(assets::assignment_history))
        .route("/{id}/assignment", get(assets::current_assignment))
}
