//! Rows of the `directory_actors` table.

use assetdesk_core::scope::DirectoryEntry;
use assetdesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct DirectoryActorRow {
    pub actor_id: DbId,
    pub tenant_id: DbId,
    pub organization_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<DirectoryActorRow> for DirectoryEntry {
    fn from(row: DirectoryActorRow) -> Self {
        DirectoryEntry {
            actor_id: row.actor_id,
            tenant_id: row.tenant_id,
            organization_id: row.organization_id,
            is_active: row.is_active,
        }
    }
}
