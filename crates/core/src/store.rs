//! Persistence seam for assets and the assignment ledger.
//!
//! The store is the only shared mutable resource. Every lifecycle change goes
//! through [`AssetStore::commit_lifecycle_write`], which must apply the asset
//! update and the ledger change atomically and only if the asset still has
//! the status and lock version the caller read.

use async_trait::async_trait;
use serde::Serialize;

use crate::asset::{Asset, AssetFields, NewAsset};
use crate::asset_status::AssetStatus;
use crate::assignment::{AssetAssignment, NewAssignment};
use crate::error::CoreError;
use crate::listing::AssetQuery;
use crate::scope::Scope;
use crate::types::{ActorId, DbId, Timestamp};

/// Ledger change committed together with a status change.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerWrite {
    None,
    /// Insert an open assignment. The store rejects it with
    /// [`CoreError::Conflict`] if another open row exists for the asset.
    Open(NewAssignment),
    /// Close the given open assignment.
    Close {
        assignment_id: DbId,
        returned_at: Timestamp,
        returned_by: ActorId,
    },
}

/// A conditional lifecycle write against one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleWrite {
    pub asset_id: DbId,
    pub expected_status: AssetStatus,
    pub expected_version: i32,
    pub new_status: AssetStatus,
    pub assigned_to: Option<ActorId>,
    pub mark_deleted: bool,
    pub ledger: LedgerWrite,
}

/// Result of a conditional write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Committed(Asset),
    /// The asset changed after it was read (or was deleted); nothing was
    /// written.
    Stale,
}

/// Number of active assets in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: AssetStatus,
    pub count: i64,
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Insert a new asset as `available`. Duplicate tags within a tenant are a
    /// [`CoreError::Conflict`].
    async fn insert_asset(&self, asset: &NewAsset) -> Result<Asset, CoreError>;

    /// Load an asset by id, including soft-deleted rows.
    async fn find_asset(&self, id: DbId) -> Result<Option<Asset>, CoreError>;

    /// Apply the present descriptive fields. Returns `None` if the asset is
    /// missing or soft-deleted.
    async fn update_asset_fields(
        &self,
        id: DbId,
        fields: &AssetFields,
    ) -> Result<Option<Asset>, CoreError>;

    /// Active (non-deleted) assets visible to `scope`, filtered, sorted, and
    /// paginated per `query`.
    async fn list_assets(&self, scope: &Scope, query: &AssetQuery)
        -> Result<Vec<Asset>, CoreError>;

    /// Active asset counts per status visible to `scope`. Statuses with no
    /// assets may be omitted.
    async fn count_by_status(&self, scope: &Scope) -> Result<Vec<StatusCount>, CoreError>;

    async fn find_open_assignment(
        &self,
        asset_id: DbId,
    ) -> Result<Option<AssetAssignment>, CoreError>;

    /// Every assignment row for the asset, newest `assigned_at` first.
    async fn list_assignments(&self, asset_id: DbId) -> Result<Vec<AssetAssignment>, CoreError>;

    /// Atomically apply `write` if the asset still matches
    /// `expected_status`/`expected_version` and is not deleted.
    async fn commit_lifecycle_write(&self, write: &LifecycleWrite)
        -> Result<WriteOutcome, CoreError>;
}
