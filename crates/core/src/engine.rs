//! Status transition engine.
//!
//! Validates a single-asset status change against the transition table,
//! stages the matching ledger change, and commits both with one conditional
//! write. A lost race is reported as a conflict and never retried here.

use std::sync::Arc;

use serde::Deserialize;

use crate::asset::Asset;
use crate::asset_status::{validate_transition, AssetStatus, LedgerEffect};
use crate::error::CoreError;
use crate::ledger::{AssignmentLedger, Checkout};
use crate::registry::load_active;
use crate::scope::{Directory, Scope};
use crate::store::{AssetStore, LedgerWrite, LifecycleWrite, WriteOutcome};
use crate::types::{ActorId, DbId};

/// Caller-supplied details for a transition. `holder_id` is required when
/// the target is `assigned` and ignored otherwise. The holder must be an
/// active directory actor inside the caller's scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransitionContext {
    pub holder_id: Option<ActorId>,
    pub condition: Option<String>,
    pub notes: Option<String>,
}

impl TransitionContext {
    pub fn assign_to(holder_id: ActorId) -> Self {
        Self {
            holder_id: Some(holder_id),
            ..Default::default()
        }
    }
}

#[derive(Clone)]
pub struct TransitionEngine {
    store: Arc<dyn AssetStore>,
    directory: Arc<dyn Directory>,
    ledger: AssignmentLedger,
}

impl TransitionEngine {
    pub fn new(store: Arc<dyn AssetStore>, directory: Arc<dyn Directory>) -> Self {
        let ledger = AssignmentLedger::new(Arc::clone(&store));
        Self {
            store,
            directory,
            ledger,
        }
    }

    /// Check that `holder_id` names an active actor the caller may assign to.
    async fn check_holder(&self, scope: &Scope, holder_id: ActorId) -> Result<(), CoreError> {
        let holder = self
            .directory
            .find_actor(holder_id)
            .await?
            .filter(|entry| entry.is_active)
            .ok_or_else(|| {
                CoreError::Validation(format!("holder {holder_id} is not an active actor"))
            })?;
        if !scope.contains(holder.tenant_id, holder.organization_id) {
            return Err(CoreError::Validation(format!(
                "holder {holder_id} is outside the caller's scope"
            )));
        }
        Ok(())
    }

    /// Move one asset to `target`, returning the committed asset.
    pub async fn transition(
        &self,
        scope: &Scope,
        asset_id: DbId,
        target: AssetStatus,
        context: &TransitionContext,
    ) -> Result<Asset, CoreError> {
        let asset = load_active(self.store.as_ref(), scope, asset_id).await?;
        let from = asset.status;

        let (ledger, assigned_to) = match validate_transition(from, target)? {
            LedgerEffect::Open => {
                let holder_id = context.holder_id.ok_or_else(|| {
                    CoreError::Validation("holder_id is required to assign an asset".into())
                })?;
                self.check_holder(scope, holder_id).await?;
                let checkout = Checkout {
                    holder_id,
                    condition: context.condition.clone(),
                    notes: context.notes.clone(),
                };
                let open = self
                    .ledger
                    .open_assignment(&asset, &checkout, scope.actor_id)
                    .await?;
                (open, Some(holder_id))
            }
            LedgerEffect::Close => {
                let close = self.ledger.close_assignment(&asset, scope.actor_id).await?;
                (close, None)
            }
            LedgerEffect::None => (LedgerWrite::None, asset.assigned_to),
        };

        let write = LifecycleWrite {
            asset_id,
            expected_status: from,
            expected_version: asset.lock_version,
            new_status: target,
            assigned_to,
            mark_deleted: false,
            ledger,
        };

        match self.store.commit_lifecycle_write(&write).await {
            Ok(WriteOutcome::Committed(updated)) => {
                tracing::info!(
                    asset_id,
                    tenant_id = updated.tenant_id,
                    actor_id = scope.actor_id,
                    %from,
                    to = %target,
                    assigned_to = ?updated.assigned_to,
                    "Asset status changed",
                );
                Ok(updated)
            }
            Ok(WriteOutcome::Stale) => {
                tracing::warn!(asset_id, %from, to = %target, "Transition lost a concurrent write race");
                Err(CoreError::Conflict(format!(
                    "Asset {asset_id} was modified concurrently; reload and retry"
                )))
            }
            Err(err) => {
                if matches!(err, CoreError::Conflict(_)) {
                    tracing::warn!(asset_id, %from, to = %target, error = %err, "Transition rejected");
                }
                Err(err)
            }
        }
    }
}
