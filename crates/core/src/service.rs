//! Facade bundling the lifecycle components behind one cheaply cloneable
//! handle. Callers resolve a [`Scope`] once per request and pass it to every
//! operation.

use std::sync::Arc;

use crate::asset::{Asset, AssetFields};
use crate::asset_status::AssetStatus;
use crate::assignment::AssetAssignment;
use crate::bulk::{BulkCoordinator, BulkResult};
use crate::engine::{TransitionContext, TransitionEngine};
use crate::error::CoreError;
use crate::ledger::AssignmentLedger;
use crate::listing::AssetQuery;
use crate::registry::AssetRegistry;
use crate::scope::{Directory, Scope, ScopeResolver};
use crate::store::{AssetStore, StatusCount};
use crate::types::{ActorId, DbId};

#[derive(Clone)]
pub struct AssetService {
    resolver: ScopeResolver,
    registry: AssetRegistry,
    ledger: AssignmentLedger,
    engine: TransitionEngine,
    bulk: BulkCoordinator,
}

impl AssetService {
    pub fn new(
        store: Arc<dyn AssetStore>,
        directory: Arc<dyn Directory>,
        bulk_concurrency: usize,
    ) -> Self {
        let registry = AssetRegistry::new(Arc::clone(&store));
        let ledger = AssignmentLedger::new(Arc::clone(&store));
        let engine = TransitionEngine::new(store, Arc::clone(&directory));
        let bulk = BulkCoordinator::new(engine.clone(), registry.clone(), bulk_concurrency);
        Self {
            resolver: ScopeResolver::new(directory),
            registry,
            ledger,
            engine,
            bulk,
        }
    }

    pub async fn resolve_scope(&self, actor_id: ActorId) -> Result<Scope, CoreError> {
        self.resolver.resolve_scope(actor_id).await
    }

    pub async fn create_asset(&self, scope: &Scope, fields: AssetFields) -> Result<Asset, CoreError> {
        self.registry.create_asset(scope, fields).await
    }

    pub async fn get_asset(&self, scope: &Scope, id: DbId) -> Result<Asset, CoreError> {
        self.registry.get_asset(scope, id).await
    }

    pub async fn update_asset_fields(
        &self,
        scope: &Scope,
        id: DbId,
        fields: &AssetFields,
    ) -> Result<Asset, CoreError> {
        self.registry.update_asset_fields(scope, id, fields).await
    }

    pub async fn soft_delete(&self, scope: &Scope, id: DbId) -> Result<(), CoreError> {
        self.registry.soft_delete(scope, id).await
    }

    pub async fn list_assets(&self, scope: &Scope, query: &AssetQuery) -> Result<Vec<Asset>, CoreError> {
        self.registry.list_assets(scope, query).await
    }

    pub async fn status_summary(&self, scope: &Scope) -> Result<Vec<StatusCount>, CoreError> {
        self.registry.status_summary(scope).await
    }

    pub async fn transition(
        &self,
        scope: &Scope,
        id: DbId,
        target: AssetStatus,
        context: &TransitionContext,
    ) -> Result<Asset, CoreError> {
        self.engine.transition(scope, id, target, context).await
    }

    pub async fn bulk_transition(
        &self,
        scope: &Scope,
        ids: &[DbId],
        target: AssetStatus,
        context: &TransitionContext,
    ) -> BulkResult {
        self.bulk.bulk_transition(scope, ids, target, context).await
    }

    pub async fn bulk_soft_delete(&self, scope: &Scope, ids: &[DbId]) -> BulkResult {
        self.bulk.bulk_soft_delete(scope, ids).await
    }

    pub async fn assignment_history(
        &self,
        scope: &Scope,
        asset_id: DbId,
    ) -> Result<Vec<AssetAssignment>, CoreError> {
        self.ledger.history(scope, asset_id).await
    }

    pub async fn current_assignment(
        &self,
        scope: &Scope,
        asset_id: DbId,
    ) -> Result<Option<AssetAssignment>, CoreError> {
        self.ledger.current_assignment(scope, asset_id).await
    }
}
