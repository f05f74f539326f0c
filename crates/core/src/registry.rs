//! Asset registry: creation, descriptive edits, soft-delete, and listing.

use std::sync::Arc;

use crate::asset::{Asset, AssetFields, NewAsset};
use crate::asset_status::AssetStatus;
use crate::error::CoreError;
use crate::ledger::AssignmentLedger;
use crate::listing::AssetQuery;
use crate::scope::Scope;
use crate::store::{AssetStore, LedgerWrite, LifecycleWrite, StatusCount, WriteOutcome};
use crate::types::DbId;

/// Load an asset the caller addressed by id, soft-deleted rows included.
///
/// Missing ids are [`CoreError::NotFound`]; assets in another tenant or
/// organization are [`CoreError::Forbidden`].
pub async fn load_scoped(
    store: &dyn AssetStore,
    scope: &Scope,
    id: DbId,
) -> Result<Asset, CoreError> {
    let asset = store
        .find_asset(id)
        .await?
        .ok_or_else(|| CoreError::asset_not_found(id))?;
    scope.ensure_contains("Asset", asset.tenant_id, asset.organization_id)?;
    Ok(asset)
}

/// Like [`load_scoped`], but soft-deleted assets are [`CoreError::NotFound`].
pub async fn load_active(
    store: &dyn AssetStore,
    scope: &Scope,
    id: DbId,
) -> Result<Asset, CoreError> {
    let asset = load_scoped(store, scope, id).await?;
    if asset.is_deleted {
        return Err(CoreError::asset_not_found(id));
    }
    Ok(asset)
}

#[derive(Clone)]
pub struct AssetRegistry {
    store: Arc<dyn AssetStore>,
    ledger: AssignmentLedger,
}

impl AssetRegistry {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        let ledger = AssignmentLedger::new(Arc::clone(&store));
        Self { store, ledger }
    }

    /// Register a new asset in the caller's tenant/organization as
    /// `available`.
    pub async fn create_asset(&self, scope: &Scope, fields: AssetFields) -> Result<Asset, CoreError> {
        let new = NewAsset::from_fields(scope, fields)?;
        let asset = self.store.insert_asset(&new).await?;

        tracing::info!(
            asset_id = asset.id,
            asset_tag = %asset.asset_tag,
            tenant_id = asset.tenant_id,
            actor_id = scope.actor_id,
            "Asset created",
        );
        Ok(asset)
    }

    pub async fn get_asset(&self, scope: &Scope, id: DbId) -> Result<Asset, CoreError> {
        load_active(self.store.as_ref(), scope, id).await
    }

    /// Partially update descriptive fields. Never touches status or holder.
    pub async fn update_asset_fields(
        &self,
        scope: &Scope,
        id: DbId,
        fields: &AssetFields,
    ) -> Result<Asset, CoreError> {
        let current = load_active(self.store.as_ref(), scope, id).await?;
        fields.validate_present()?;
        if fields.is_empty() {
            return Ok(current);
        }

        let asset = self
            .store
            .update_asset_fields(id, fields)
            .await?
            .ok_or_else(|| CoreError::asset_not_found(id))?;

        tracing::info!(asset_id = id, actor_id = scope.actor_id, "Asset fields updated");
        Ok(asset)
    }

    /// Soft-delete an asset.
    ///
    /// An asset that is still checked out is checked in by the same atomic
    /// write, so a deleted asset never holds an open assignment.
    pub async fn soft_delete(&self, scope: &Scope, id: DbId) -> Result<(), CoreError> {
        let asset = load_active(self.store.as_ref(), scope, id).await?;

        let (ledger, new_status, assigned_to) = if asset.status == AssetStatus::Assigned {
            let close = self.ledger.close_assignment(&asset, scope.actor_id).await?;
            (close, AssetStatus::Available, None)
        } else {
            (LedgerWrite::None, asset.status, asset.assigned_to)
        };
        let forced_check_in = matches!(ledger, LedgerWrite::Close { .. });

        let write = LifecycleWrite {
            asset_id: id,
            expected_status: asset.status,
            expected_version: asset.lock_version,
            new_status,
            assigned_to,
            mark_deleted: true,
            ledger,
        };

        match self.store.commit_lifecycle_write(&write).await? {
            WriteOutcome::Committed(_) => {
                tracing::info!(
                    asset_id = id,
                    actor_id = scope.actor_id,
                    forced_check_in,
                    "Asset soft-deleted",
                );
                Ok(())
            }
            WriteOutcome::Stale => {
                tracing::warn!(asset_id = id, "Soft-delete lost a concurrent write race");
                Err(CoreError::Conflict(format!(
                    "Asset {id} was modified concurrently; reload and retry"
                )))
            }
        }
    }

    /// Active assets in scope matching the query.
    pub async fn list_assets(&self, scope: &Scope, query: &AssetQuery) -> Result<Vec<Asset>, CoreError> {
        let assets = self.store.list_assets(scope, query).await?;
        tracing::debug!(
            tenant_id = scope.tenant_id,
            count = assets.len(),
            "Listed assets",
        );
        Ok(assets)
    }

    /// Active asset counts per status, every status present (zero-filled).
    pub async fn status_summary(&self, scope: &Scope) -> Result<Vec<StatusCount>, CoreError> {
        let counts = self.store.count_by_status(scope).await?;
        Ok(crate::asset_status::ALL_STATUSES
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: counts
                    .iter()
                    .find(|c| c.status == status)
                    .map_or(0, |c| c.count),
            })
            .collect())
    }
}
