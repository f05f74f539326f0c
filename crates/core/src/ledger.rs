//! Assignment ledger: checkout, check-in, and history for one asset.
//!
//! Opening and closing stage a [`LedgerWrite`]; the rows themselves are
//! written by the store as part of the transition engine's conditional
//! lifecycle write so the asset status and the ledger never disagree.

use std::sync::Arc;

use chrono::Utc;

use crate::asset::Asset;
use crate::assignment::{AssetAssignment, NewAssignment};
use crate::error::CoreError;
use crate::registry;
use crate::scope::Scope;
use crate::store::{AssetStore, LedgerWrite};
use crate::types::{ActorId, DbId};

/// Holder and free-text details for a checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkout {
    pub holder_id: ActorId,
    pub condition: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct AssignmentLedger {
    store: Arc<dyn AssetStore>,
}

impl AssignmentLedger {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }

    /// Stage a new open assignment for `asset`.
    ///
    /// Fails with [`CoreError::Conflict`] if the asset is already checked
    /// out. The store repeats the check at commit time.
    pub async fn open_assignment(
        &self,
        asset: &Asset,
        checkout: &Checkout,
        actor_id: ActorId,
    ) -> Result<LedgerWrite, CoreError> {
        if let Some(open) = self.store.find_open_assignment(asset.id).await? {
            return Err(CoreError::Conflict(format!(
                "Asset {} is already assigned to {} (assignment {})",
                asset.id, open.assigned_to, open.id
            )));
        }

        Ok(LedgerWrite::Open(NewAssignment {
            asset_id: asset.id,
            tenant_id: asset.tenant_id,
            organization_id: asset.organization_id,
            assigned_to: checkout.holder_id,
            assigned_by: actor_id,
            assigned_at: Utc::now(),
            condition_at_assignment: checkout.condition.clone(),
            notes: checkout.notes.clone(),
        }))
    }

    /// Stage closing the asset's open assignment.
    ///
    /// Fails with [`CoreError::NotFound`] when there is nothing to close.
    pub async fn close_assignment(
        &self,
        asset: &Asset,
        actor_id: ActorId,
    ) -> Result<LedgerWrite, CoreError> {
        let open = self
            .store
            .find_open_assignment(asset.id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Open assignment",
                id: asset.id,
            })?;

        Ok(LedgerWrite::Close {
            assignment_id: open.id,
            returned_at: Utc::now(),
            returned_by: actor_id,
        })
    }

    /// All assignments for an asset, newest first. History of soft-deleted
    /// assets stays readable.
    pub async fn history(
        &self,
        scope: &Scope,
        asset_id: DbId,
    ) -> Result<Vec<AssetAssignment>, CoreError> {
        registry::load_scoped(self.store.as_ref(), scope, asset_id).await?;
        self.store.list_assignments(asset_id).await
    }

    /// The asset's open assignment, if it is checked out.
    pub async fn current_assignment(
        &self,
        scope: &Scope,
        asset_id: DbId,
    ) -> Result<Option<AssetAssignment>, CoreError> {
        registry::load_active(self.store.as_ref(), scope, asset_id).await?;
        self.store.find_open_assignment(asset_id).await
    }
}
