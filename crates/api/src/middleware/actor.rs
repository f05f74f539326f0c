//! Actor scope extractor for Axum handlers.

use assetdesk_core::error::CoreError;
use assetdesk_core::scope::Scope;
use assetdesk_core::types::ActorId;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the authenticated actor id, set by the upstream gateway.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// The caller's resolved tenant/organization scope.
///
/// Use this as an extractor parameter in any handler that touches assets:
///
/// ```ignore
/// async fn my_handler(ActorScope(scope): ActorScope) -> AppResult<Json<()>> {
///     tracing::info!(tenant_id = scope.tenant_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ActorScope(pub Scope);

impl FromRequestParts<AppState> for ActorScope {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Missing {ACTOR_HEADER} header"
                )))
            })?;

        let actor_id: ActorId = raw.trim().parse().map_err(|_| {
            AppError::Core(CoreError::Unauthorized(format!(
                "Invalid {ACTOR_HEADER} header"
            )))
        })?;

        let scope = state.service.resolve_scope(actor_id).await?;
        Ok(ActorScope(scope))
    }
}
