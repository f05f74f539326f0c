//! Rows of the `asset_assignments` ledger table.

use assetdesk_core::assignment::AssetAssignment;
use assetdesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `asset_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentRow {
    pub id: DbId,
    pub asset_id: DbId,
    pub tenant_id: DbId,
    pub organization_id: Option<DbId>,
    pub assigned_to: DbId,
    pub assigned_by: DbId,
    pub assigned_at: Timestamp,
    pub returned_at: Option<Timestamp>,
    pub returned_by: Option<DbId>,
    pub condition_at_assignment: Option<String>,
    pub notes: Option<String>,
}

impl From<AssignmentRow> for AssetAssignment {
    fn from(row: AssignmentRow) -> Self {
        AssetAssignment {
            id: row.id,
            asset_id: row.asset_id,
            tenant_id: row.tenant_id,
            organization_id: row.organization_id,
            assigned_to: row.assigned_to,
            assigned_by: row.assigned_by,
            assigned_at: row.assigned_at,
            returned_at: row.returned_at,
            returned_by: row.returned_by,
            condition_at_assignment: row.condition_at_assignment,
            notes: row.notes,
        }
    }
}
