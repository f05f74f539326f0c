//! Assignment ledger records.

use serde::Serialize;

use crate::types::{ActorId, DbId, OrganizationId, TenantId, Timestamp};

/// One checkout of an asset. Append-only: the only mutation is closing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetAssignment {
    pub id: DbId,
    pub asset_id: DbId,
    pub tenant_id: TenantId,
    pub organization_id: Option<OrganizationId>,
    pub assigned_to: ActorId,
    pub assigned_by: ActorId,
    pub assigned_at: Timestamp,
    /// `None` while the assignment is open.
    pub returned_at: Option<Timestamp>,
    pub returned_by: Option<ActorId>,
    pub condition_at_assignment: Option<String>,
    pub notes: Option<String>,
}

impl AssetAssignment {
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }
}

/// A staged assignment row, inserted by the store as part of a lifecycle write.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
    pub asset_id: DbId,
    pub tenant_id: TenantId,
    pub organization_id: Option<OrganizationId>,
    pub assigned_to: ActorId,
    pub assigned_by: ActorId,
    pub assigned_at: Timestamp,
    pub condition_at_assignment: Option<String>,
    pub notes: Option<String>,
}
