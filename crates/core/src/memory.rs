//! In-process implementations of [`AssetStore`] and [`Directory`].
//!
//! Every operation takes the single state lock for its whole duration, which
//! gives lifecycle writes the same all-or-nothing behaviour as the Postgres
//! transaction. Used by tests and by embedders that do not need durability.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::asset::{Asset, AssetFields, NewAsset};
use crate::asset_status::{AssetStatus, ALL_STATUSES};
use crate::assignment::AssetAssignment;
use crate::error::CoreError;
use crate::listing::AssetQuery;
use crate::scope::{Directory, DirectoryEntry, Scope};
use crate::store::{AssetStore, LedgerWrite, LifecycleWrite, StatusCount, WriteOutcome};
use crate::types::{ActorId, DbId, TenantId};

#[derive(Debug, Default)]
struct State {
    assets: BTreeMap<DbId, Asset>,
    assignments: Vec<AssetAssignment>,
    next_asset_id: DbId,
    next_assignment_id: DbId,
}

impl State {
    fn tag_taken(&self, tenant_id: TenantId, tag: &str, except: Option<DbId>) -> bool {
        self.assets.values().any(|a| {
            a.tenant_id == tenant_id && !a.is_deleted && a.asset_tag == tag && Some(a.id) != except
        })
    }

    fn open_assignment(&self, asset_id: DbId) -> Option<&AssetAssignment> {
        self.assignments
            .iter()
            .find(|row| row.asset_id == asset_id && row.is_open())
    }
}

fn duplicate_tag(tag: &str) -> CoreError {
    CoreError::Conflict(format!("Asset tag '{tag}' is already in use in this tenant"))
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AssetStore for MemoryStore {
    async fn insert_asset(&self, new: &NewAsset) -> Result<Asset, CoreError> {
        let mut state = self.lock();
        if state.tag_taken(new.tenant_id, &new.asset_tag, None) {
            return Err(duplicate_tag(&new.asset_tag));
        }

        state.next_asset_id += 1;
        let now = Utc::now();
        let asset = Asset {
            id: state.next_asset_id,
            tenant_id: new.tenant_id,
            organization_id: new.organization_id,
            asset_tag: new.asset_tag.clone(),
            category: new.category.clone(),
            brand: new.brand.clone(),
            model: new.model.clone(),
            serial_number: new.serial_number.clone(),
            description: new.description.clone(),
            configuration: new.configuration.clone(),
            purchase_date: new.purchase_date,
            purchase_cost_cents: new.purchase_cost_cents,
            vendor: new.vendor.clone(),
            site: new.site.clone(),
            location: new.location.clone(),
            department: new.department.clone(),
            classification: new.classification.clone(),
            photo_url: new.photo_url.clone(),
            status: AssetStatus::Available,
            assigned_to: None,
            is_deleted: false,
            lock_version: 1,
            created_by: Some(new.created_by),
            created_at: now,
            updated_at: now,
        };
        state.assets.insert(asset.id, asset.clone());
        Ok(asset)
    }

    async fn find_asset(&self, id: DbId) -> Result<Option<Asset>, CoreError> {
        Ok(self.lock().assets.get(&id).cloned())
    }

    async fn update_asset_fields(
        &self,
        id: DbId,
        fields: &AssetFields,
    ) -> Result<Option<Asset>, CoreError> {
        let mut state = self.lock();
        let Some(current) = state.assets.get(&id).filter(|a| !a.is_deleted) else {
            return Ok(None);
        };

        let mut updated = current.clone();
        updated.apply_fields(fields);
        if updated.asset_tag != current.asset_tag
            && state.tag_taken(updated.tenant_id, &updated.asset_tag, Some(id))
        {
            return Err(duplicate_tag(&updated.asset_tag));
        }
        updated.updated_at = Utc::now();
        state.assets.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn list_assets(
        &self,
        scope: &Scope,
        query: &AssetQuery,
    ) -> Result<Vec<Asset>, CoreError> {
        let state = self.lock();
        let mut rows: Vec<Asset> = state
            .assets
            .values()
            .filter(|a| !a.is_deleted && scope.contains(a.tenant_id, a.organization_id))
            .filter(|a| query.filter.matches(a))
            .cloned()
            .collect();
        rows.sort_by(|a, b| query.sort.compare(a, b));

        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let limit = query
            .limit()
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_by_status(&self, scope: &Scope) -> Result<Vec<StatusCount>, CoreError> {
        let state = self.lock();
        let counts = ALL_STATUSES
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: state
                    .assets
                    .values()
                    .filter(|a| {
                        !a.is_deleted
                            && a.status == status
                            && scope.contains(a.tenant_id, a.organization_id)
                    })
                    .count() as i64,
            })
            .filter(|c| c.count > 0)
            .collect();
        Ok(counts)
    }

    async fn find_open_assignment(
        &self,
        asset_id: DbId,
    ) -> Result<Option<AssetAssignment>, CoreError> {
        Ok(self.lock().open_assignment(asset_id).cloned())
    }

    async fn list_assignments(&self, asset_id: DbId) -> Result<Vec<AssetAssignment>, CoreError> {
        let state = self.lock();
        let mut rows: Vec<AssetAssignment> = state
            .assignments
            .iter()
            .filter(|row| row.asset_id == asset_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.assigned_at.cmp(&a.assigned_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn commit_lifecycle_write(
        &self,
        write: &LifecycleWrite,
    ) -> Result<WriteOutcome, CoreError> {
        let mut state = self.lock();
        let fresh = state.assets.get(&write.asset_id).is_some_and(|a| {
            !a.is_deleted
                && a.status == write.expected_status
                && a.lock_version == write.expected_version
        });
        if !fresh {
            return Ok(WriteOutcome::Stale);
        }

        // Check the ledger precondition before touching anything so a
        // rejected write leaves no trace.
        match &write.ledger {
            LedgerWrite::None => {}
            LedgerWrite::Open(_) => {
                if state.open_assignment(write.asset_id).is_some() {
                    return Err(CoreError::Conflict(format!(
                        "Asset {} already has an open assignment",
                        write.asset_id
                    )));
                }
            }
            LedgerWrite::Close { assignment_id, .. } => {
                let open = state
                    .open_assignment(write.asset_id)
                    .is_some_and(|row| row.id == *assignment_id);
                if !open {
                    return Ok(WriteOutcome::Stale);
                }
            }
        }

        match &write.ledger {
            LedgerWrite::None => {}
            LedgerWrite::Open(new) => {
                state.next_assignment_id += 1;
                let row = AssetAssignment {
                    id: state.next_assignment_id,
                    asset_id: new.asset_id,
                    tenant_id: new.tenant_id,
                    organization_id: new.organization_id,
                    assigned_to: new.assigned_to,
                    assigned_by: new.assigned_by,
                    assigned_at: new.assigned_at,
                    returned_at: None,
                    returned_by: None,
                    condition_at_assignment: new.condition_at_assignment.clone(),
                    notes: new.notes.clone(),
                };
                state.assignments.push(row);
            }
            LedgerWrite::Close {
                assignment_id,
                returned_at,
                returned_by,
            } => {
                if let Some(row) = state
                    .assignments
                    .iter_mut()
                    .find(|row| row.id == *assignment_id)
                {
                    row.returned_at = Some(*returned_at);
                    row.returned_by = Some(*returned_by);
                }
            }
        }

        let Some(asset) = state.assets.get_mut(&write.asset_id) else {
            return Ok(WriteOutcome::Stale);
        };
        asset.status = write.new_status;
        asset.assigned_to = write.assigned_to;
        asset.is_deleted = write.mark_deleted;
        asset.lock_version += 1;
        asset.updated_at = Utc::now();
        Ok(WriteOutcome::Committed(asset.clone()))
    }
}

/// A directory backed by a map, for tests and single-tenant embedders.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    actors: RwLock<HashMap<ActorId, DirectoryEntry>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, entry: DirectoryEntry) {
        self.actors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(entry.actor_id, entry);
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn find_actor(&self, actor_id: ActorId) -> Result<Option<DirectoryEntry>, CoreError> {
        Ok(self
            .actors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&actor_id)
            .cloned())
    }
}
