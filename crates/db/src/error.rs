//! Translation of sqlx errors into domain errors.

use assetdesk_core::error::CoreError;

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Constraint guarding one open assignment per asset.
pub const OPEN_ASSIGNMENT_CONSTRAINT: &str = "uq_asset_assignments_open";

/// Constraint guarding tag uniqueness among a tenant's live assets.
pub const TENANT_TAG_CONSTRAINT: &str = "uq_assets_tenant_tag";

/// Name of the violated unique constraint, if `err` is a unique violation.
pub fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            Some(db_err.constraint().unwrap_or("unknown"))
        }
        _ => None,
    }
}

/// Map a sqlx error to a [`CoreError`].
///
/// - Violations of `uq_*` constraints become [`CoreError::Conflict`].
/// - Everything else is logged and becomes a sanitized
///   [`CoreError::Internal`].
pub fn map_db_error(err: sqlx::Error) -> CoreError {
    match unique_violation(&err) {
        Some(TENANT_TAG_CONSTRAINT) => {
            CoreError::Conflict("Asset tag is already in use in this tenant".to_string())
        }
        Some(OPEN_ASSIGNMENT_CONSTRAINT) => {
            CoreError::Conflict("Asset already has an open assignment".to_string())
        }
        Some(constraint) if constraint.starts_with("uq_") => CoreError::Conflict(format!(
            "Duplicate value violates unique constraint: {constraint}"
        )),
        _ => {
            tracing::error!(error = %err, "Database error");
            CoreError::Internal("Database error".to_string())
        }
    }
}
