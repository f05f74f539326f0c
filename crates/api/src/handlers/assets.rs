//! Handlers for the asset registry, lifecycle transitions, assignment
//! ledger, and bulk operations.
//!
//! Every endpoint resolves the caller's scope through [`ActorScope`] and
//! delegates to the [`AssetService`](assetdesk_core::service::AssetService).

use assetdesk_core::asset::AssetFields;
use assetdesk_core::asset_status::AssetStatus;
use assetdesk_core::engine::TransitionContext;
use assetdesk_core::listing::{
    clamp_limit, AssetFilter, AssetQuery, AssetSort, SortColumn, SortDirection, DEFAULT_LIMIT,
    MAX_LIMIT,
};
use assetdesk_core::types::DbId;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::middleware::actor::ActorScope;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /assets`.
#[derive(Debug, Default, Deserialize)]
pub struct AssetListParams {
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<SortColumn>,
    pub direction: Option<SortDirection>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl AssetListParams {
    fn into_query(self) -> AppResult<AssetQuery> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<AssetStatus>)
            .transpose()?;
        Ok(AssetQuery {
            filter: AssetFilter {
                status,
                category: self.category,
                search: self.search,
            },
            sort: AssetSort {
                column: self.sort.unwrap_or_default(),
                direction: self.direction.unwrap_or_default(),
            },
            limit: Some(clamp_limit(self.limit, DEFAULT_LIMIT, MAX_LIMIT)),
            offset: self.offset,
        })
    }
}

/// Body for `POST /assets/{id}/transition`.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub to: AssetStatus,
    #[serde(flatten)]
    pub context: TransitionContext,
}

/// Body for `POST /assets/bulk/transition`.
#[derive(Debug, Deserialize)]
pub struct BulkTransitionRequest {
    pub ids: Vec<DbId>,
    pub to: AssetStatus,
    #[serde(flatten)]
    pub context: TransitionContext,
}

/// Body for `POST /assets/bulk/delete`.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// POST /assets
pub async fn create_asset(
    ActorScope(scope): ActorScope,
    State(state): State<AppState>,
    AppJson(input): AppJson<AssetFields>,
) -> AppResult<impl IntoResponse> {
    let asset = state.service.create_asset(&scope, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// GET /assets
pub async fn list_assets(
    ActorScope(scope): ActorScope,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<AssetListParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.into_query()?;
    let assets = state.service.list_assets(&scope, &query).await?;
    Ok(Json(DataResponse { data: assets }))
}

/// GET /assets/summary
pub async fn status_summary(
    ActorScope(scope): ActorScope,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let counts = state.service.status_summary(&scope).await?;
    Ok(Json(DataResponse { data: counts }))
}

/// GET /assets/{id}
pub async fn get_asset(
    ActorScope(scope): ActorScope,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = state.service.get_asset(&scope, id).await?;
    Ok(Json(DataResponse { data: asset }))
}

/// PUT /assets/{id}
///
/// Partial update of descriptive fields; status cannot be changed here.
pub async fn update_asset(
    ActorScope(scope): ActorScope,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<AssetFields>,
) -> AppResult<impl IntoResponse> {
    let asset = state.service.update_asset_fields(&scope, id, &input).await?;
    Ok(Json(DataResponse { data: asset }))
}

/// DELETE /assets/{id}
pub async fn delete_asset(
    ActorScope(scope): ActorScope,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.service.soft_delete(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /assets/{id}/transition
pub async fn transition_asset(
    ActorScope(scope): ActorScope,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<TransitionRequest>,
) -> AppResult<impl IntoResponse> {
    let asset = state
        .service
        .transition(&scope, id, input.to, &input.context)
        .await?;
    Ok(Json(DataResponse { data: asset }))
}

/// GET /assets/{id}/assignments
pub async fn assignment_history(
    ActorScope(scope): ActorScope,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let history = state.service.assignment_history(&scope, id).await?;
    Ok(Json(DataResponse { data: history }))
}

/// GET /assets/{id}/assignment
///
/// `data` is `null` when the asset is not checked out.
pub async fn current_assignment(
    ActorScope(scope): ActorScope,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let open = state.service.current_assignment(&scope, id).await?;
    Ok(Json(DataResponse { data: open }))
}

// ---------------------------------------------------------------------------
// Bulk
// ---------------------------------------------------------------------------

/// POST /assets/bulk/transition
///
/// Always 200: per-item failures are reported in `data.failed`.
pub async fn bulk_transition(
    ActorScope(scope): ActorScope,
    State(state): State<AppState>,
    AppJson(input): AppJson<BulkTransitionRequest>,
) -> AppResult<impl IntoResponse> {
    let result = state
        .service
        .bulk_transition(&scope, &input.ids, input.to, &input.context)
        .await;
    Ok(Json(DataResponse { data: result }))
}

/// POST /assets/bulk/delete
pub async fn bulk_delete(
    ActorScope(scope): ActorScope,
    State(state): State<AppState>,
    AppJson(input): AppJson<BulkDeleteRequest>,
) -> AppResult<impl IntoResponse> {
    let result = state.service.bulk_soft_delete(&scope, &input.ids).await;
    Ok(Json(DataResponse { data: result }))
}
