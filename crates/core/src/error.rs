use serde::Serialize;

use crate::types::DbId;

/// Domain error returned by every registry, ledger, engine, and store call.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The actor could not be resolved to a scope.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The addressed entity lives outside the caller's tenant/organization.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse error classification reported per item in bulk results and used by
/// callers that only need to branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Authorization,
    Internal,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::Conflict(_) => ErrorKind::Conflict,
            CoreError::Unauthorized(_) | CoreError::Forbidden(_) => ErrorKind::Authorization,
            CoreError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn asset_not_found(id: DbId) -> Self {
        CoreError::NotFound { entity: "Asset", id }
    }
}
