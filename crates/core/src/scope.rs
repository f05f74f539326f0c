//! Tenant scope resolution.
//!
//! A [`Scope`] is resolved once per request from the identity directory and
//! threaded explicitly through every registry, ledger, and engine call.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{ActorId, OrganizationId, TenantId};

/// The tenant/organization boundary a request operates within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scope {
    pub tenant_id: TenantId,
    /// `None` for tenant-level actors, who see every organization's assets.
    pub organization_id: Option<OrganizationId>,
    pub actor_id: ActorId,
}

impl Scope {
    /// Whether a record owned by `(tenant_id, organization_id)` is visible.
    pub fn contains(&self, tenant_id: TenantId, organization_id: Option<OrganizationId>) -> bool {
        if tenant_id != self.tenant_id {
            return false;
        }
        match self.organization_id {
            Some(org) => organization_id == Some(org),
            None => true,
        }
    }

    /// Reject access to a directly-addressed record outside this scope.
    pub fn ensure_contains(
        &self,
        entity: &'static str,
        tenant_id: TenantId,
        organization_id: Option<OrganizationId>,
    ) -> Result<(), CoreError> {
        if self.contains(tenant_id, organization_id) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "{entity} is outside the caller's tenant/organization scope"
            )))
        }
    }
}

/// A directory record for an authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub actor_id: ActorId,
    pub tenant_id: TenantId,
    pub organization_id: Option<OrganizationId>,
    pub is_active: bool,
}

/// Identity/organization directory owned by the surrounding application.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn find_actor(&self, actor_id: ActorId) -> Result<Option<DirectoryEntry>, CoreError>;
}

/// Turns an authenticated actor id into the [`Scope`] for one request.
#[derive(Clone)]
pub struct ScopeResolver {
    directory: Arc<dyn Directory>,
}

impl ScopeResolver {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }

    pub async fn resolve_scope(&self, actor_id: ActorId) -> Result<Scope, CoreError> {
        let entry = self
            .directory
            .find_actor(actor_id)
            .await?
            .ok_or_else(|| CoreError::Unauthorized(format!("Unknown actor {actor_id}")))?;

        if !entry.is_active {
            tracing::warn!(actor_id, "Scope resolution refused for inactive actor");
            return Err(CoreError::Unauthorized(format!(
                "Actor {actor_id} is deactivated"
            )));
        }

        Ok(Scope {
            tenant_id: entry.tenant_id,
            organization_id: entry.organization_id,
            actor_id: entry.actor_id,
        })
    }
}
