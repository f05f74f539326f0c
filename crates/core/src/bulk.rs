//! Bulk operation coordinator.
//!
//! Runs a single-asset operation for every id in a caller-supplied batch.
//! Items are independent: one failure never aborts the rest, and items that
//! committed stay committed if the caller drops the future midway.

use std::collections::HashSet;
use std::future::Future;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::asset_status::AssetStatus;
use crate::engine::{TransitionContext, TransitionEngine};
use crate::error::{CoreError, ErrorKind};
use crate::registry::AssetRegistry;
use crate::scope::Scope;
use crate::types::DbId;

/// Default number of items processed concurrently within one batch.
pub const DEFAULT_BULK_CONCURRENCY: usize = 8;

/// One item that did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    pub id: DbId,
    pub kind: ErrorKind,
    pub message: String,
}

/// Per-item outcome of a bulk operation, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkResult {
    pub succeeded: Vec<DbId>,
    pub failed: Vec<BulkFailure>,
}

impl BulkResult {
    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }

    fn record(&mut self, id: DbId, outcome: Result<(), CoreError>) {
        match outcome {
            Ok(()) => self.succeeded.push(id),
            Err(err) => self.failed.push(BulkFailure {
                id,
                kind: err.kind(),
                message: err.to_string(),
            }),
        }
    }
}

/// Drop repeated ids, keeping the first occurrence's position.
pub fn dedupe_ids(ids: &[DbId]) -> Vec<DbId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[derive(Clone)]
pub struct BulkCoordinator {
    engine: TransitionEngine,
    registry: AssetRegistry,
    concurrency: usize,
}

impl BulkCoordinator {
    pub fn new(engine: TransitionEngine, registry: AssetRegistry, concurrency: usize) -> Self {
        Self {
            engine,
            registry,
            concurrency: concurrency.max(1),
        }
    }

    /// Apply `target` to every id independently.
    pub async fn bulk_transition(
        &self,
        scope: &Scope,
        ids: &[DbId],
        target: AssetStatus,
        context: &TransitionContext,
    ) -> BulkResult {
        let engine = &self.engine;
        let result = self
            .run(ids, move |id| async move {
                engine.transition(scope, id, target, context).await.map(|_| ())
            })
            .await;

        tracing::info!(
            tenant_id = scope.tenant_id,
            actor_id = scope.actor_id,
            to = %target,
            succeeded = result.succeeded.len(),
            failed = result.failed.len(),
            "Bulk transition finished",
        );
        result
    }

    /// Soft-delete every id independently.
    pub async fn bulk_soft_delete(&self, scope: &Scope, ids: &[DbId]) -> BulkResult {
        let registry = &self.registry;
        let result = self
            .run(ids, move |id| async move { registry.soft_delete(scope, id).await })
            .await;

        tracing::info!(
            tenant_id = scope.tenant_id,
            actor_id = scope.actor_id,
            succeeded = result.succeeded.len(),
            failed = result.failed.len(),
            "Bulk soft-delete finished",
        );
        result
    }

    async fn run<F, Fut>(&self, ids: &[DbId], op: F) -> BulkResult
    where
        F: Fn(DbId) -> Fut,
        Fut: Future<Output = Result<(), CoreError>>,
    {
        let ids = dedupe_ids(ids);
        let mut result = BulkResult::default();
        if ids.is_empty() {
            return result;
        }

        // `buffered` runs up to `concurrency` items at once but yields
        // outcomes in input order.
        let outcomes: Vec<(DbId, Result<(), CoreError>)> = stream::iter(ids)
            .map(|id| {
                let fut = op(id);
                async move { (id, fut.await) }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        for (id, outcome) in outcomes {
            result.record(id, outcome);
        }
        result
    }
}
