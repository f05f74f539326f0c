use std::sync::Arc;

use assetdesk_core::asset::{Asset, AssetFields};
use assetdesk_core::memory::{MemoryDirectory, MemoryStore};
use assetdesk_core::scope::{DirectoryEntry, Scope};
use assetdesk_core::service::AssetService;
use chrono::NaiveDate;

/// Tenant 1 / organization 10, operated by actor 100.
pub const ACTOR_ORG_A: i64 = 100;
/// Tenant 1 / organization 11, operated by actor 101.
pub const ACTOR_ORG_B: i64 = 101;
/// Tenant 1 with no organization (sees the whole tenant), actor 102.
pub const ACTOR_TENANT_ADMIN: i64 = 102;
/// Tenant 2 / organization 20, operated by actor 200.
pub const ACTOR_OTHER_TENANT: i64 = 200;

/// Assignable holders in tenant 1 / organization 10.
pub const HOLDER_1: i64 = 501;
pub const HOLDER_2: i64 = 502;
/// A holder in tenant 2.
pub const HOLDER_FOREIGN: i64 = 503;
/// Known to the directory but deactivated.
pub const HOLDER_INACTIVE: i64 = 504;
/// First of sixteen consecutive holder ids in organization 10.
pub const RACE_HOLDERS: i64 = 1_000;

/// A service over fresh in-memory stores, plus the store for direct checks.
pub fn test_service() -> (AssetService, Arc<MemoryStore>) {
    let directory = MemoryDirectory::new();
    let actors = [
        (ACTOR_ORG_A, 1, Some(10), true),
        (ACTOR_ORG_B, 1, Some(11), true),
        (ACTOR_TENANT_ADMIN, 1, None, true),
        (ACTOR_OTHER_TENANT, 2, Some(20), true),
        (HOLDER_1, 1, Some(10), true),
        (HOLDER_2, 1, Some(10), true),
        (HOLDER_FOREIGN, 2, Some(20), true),
        (HOLDER_INACTIVE, 1, Some(10), false),
    ];
    let race_holders = (RACE_HOLDERS..RACE_HOLDERS + 16).map(|id| (id, 1, Some(10), true));
    for (actor_id, tenant_id, organization_id, is_active) in actors.into_iter().chain(race_holders) {
        directory.insert(DirectoryEntry {
            actor_id,
            tenant_id,
            organization_id,
            is_active,
        });
    }

    let store = Arc::new(MemoryStore::new());
    let service = AssetService::new(store.clone(), Arc::new(directory), 4);
    (service, store)
}

pub async fn scope_for(service: &AssetService, actor_id: i64) -> Scope {
    service.resolve_scope(actor_id).await.unwrap()
}

pub fn fields(tag: &str) -> AssetFields {
    AssetFields {
        asset_tag: Some(tag.to_string()),
        category: Some("laptop".into()),
        brand: Some("Lenovo".into()),
        model: Some("ThinkPad T14".into()),
        serial_number: Some(format!("SN-{tag}")),
        purchase_date: NaiveDate::from_ymd_opt(2024, 5, 17),
        purchase_cost_cents: Some(149_900),
        ..Default::default()
    }
}

pub async fn create(service: &AssetService, scope: &Scope, tag: &str) -> Asset {
    service.create_asset(scope, fields(tag)).await.unwrap()
}
