//! Repository for the `asset_assignments` ledger.
//!
//! Rows are inserted open and closed at most once; nothing else is ever
//! updated or deleted.

use assetdesk_core::assignment::NewAssignment;
use assetdesk_core::types::{ActorId, DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::assignment::AssignmentRow;

/// Column list for `asset_assignments` queries.
const COLUMNS: &str = "\
    id, asset_id, tenant_id, organization_id, assigned_to, assigned_by, \
    assigned_at, returned_at, returned_by, condition_at_assignment, notes";

pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Insert an open assignment. A second open row for the same asset
    /// violates `uq_asset_assignments_open`.
    pub async fn open(
        conn: &mut PgConnection,
        input: &NewAssignment,
    ) -> Result<AssignmentRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO asset_assignments (\
                asset_id, tenant_id, organization_id, assigned_to, assigned_by, \
                assigned_at, condition_at_assignment, notes\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssignmentRow>(&query)
            .bind(input.asset_id)
            .bind(input.tenant_id)
            .bind(input.organization_id)
            .bind(input.assigned_to)
            .bind(input.assigned_by)
            .bind(input.assigned_at)
            .bind(&input.condition_at_assignment)
            .bind(&input.notes)
            .fetch_one(conn)
            .await
    }

    /// Close an assignment if it belongs to `asset_id` and is still open.
    ///
    /// Returns `true` if a row was closed.
    pub async fn close(
        conn: &mut PgConnection,
        id: DbId,
        asset_id: DbId,
        returned_at: Timestamp,
        returned_by: ActorId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE asset_assignments SET returned_at = $3, returned_by = $4 \
             WHERE id = $1 AND asset_id = $2 AND returned_at IS NULL",
        )
        .bind(id)
        .bind(asset_id)
        .bind(returned_at)
        .bind(returned_by)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The open assignment for an asset, if any.
    pub async fn find_open(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Option<AssignmentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM asset_assignments \
             WHERE asset_id = $1 AND returned_at IS NULL"
        );
        sqlx::query_as::<_, AssignmentRow>(&query)
            .bind(asset_id)
            .fetch_optional(pool)
            .await
    }

    /// Every assignment for an asset, newest first.
    pub async fn list_for_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Vec<AssignmentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM asset_assignments \
             WHERE asset_id = $1 \
             ORDER BY assigned_at DESC, id DESC"
        );
        sqlx::query_as::<_, AssignmentRow>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }
}
