//! End-to-end lifecycle tests against the in-memory store.
//!
//! Covers checkout/check-in through the transition engine, the coupling
//! between asset status and the assignment ledger, soft-delete, and the
//! behaviour of racing writers.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use assetdesk_core::asset_status::AssetStatus;
use assetdesk_core::engine::TransitionContext;
use assetdesk_core::error::CoreError;
use assetdesk_core::listing::AssetQuery;
use assetdesk_core::service::AssetService;
use assetdesk_core::store::{AssetStore, LedgerWrite, LifecycleWrite, WriteOutcome};

use common::*;

/// `status = assigned` iff exactly one open assignment exists.
async fn assert_ledger_consistent(service: &AssetService, actor: i64, asset_id: i64) {
    let scope = scope_for(service, actor).await;
    let asset = service.get_asset(&scope, asset_id).await.unwrap();
    let open: Vec<_> = service
        .assignment_history(&scope, asset_id)
        .await
        .unwrap()
        .into_iter()
        .filter(|row| row.is_open())
        .collect();

    assert!(open.len() <= 1, "at most one open assignment, got {}", open.len());
    assert_eq!(
        asset.status == AssetStatus::Assigned,
        open.len() == 1,
        "status {} vs {} open rows",
        asset.status,
        open.len()
    );
    assert_eq!(asset.assigned_to, open.first().map(|row| row.assigned_to));
}

// ---------------------------------------------------------------------------
// Checkout / check-in
// ---------------------------------------------------------------------------

#[tokio::test]
async fn assigning_an_available_asset_opens_one_assignment() {
    let (service, _) = test_service();
    let scope = scope_for(&service, ACTOR_ORG_A).await;
    let asset = create(&service, &scope, "AST-1").await;
    assert_eq!(asset.status, AssetStatus::Available);

    let assigned = service
        .transition(
            &scope,
            asset.id,
            AssetStatus::Assigned,
            &TransitionContext {
                holder_id: Some(HOLDER_1),
                condition: Some("good".into()),
                notes: Some("new starter kit".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(assigned.status, AssetStatus::Assigned);
    assert_eq!(assigned.assigned_to, Some(HOLDER_1));

    let history = service.assignment_history(&scope, asset.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].assigned_to, HOLDER_1);
    assert_eq!(history[0].assigned_by, ACTOR_ORG_A);
    assert_eq!(history[0].condition_at_assignment.as_deref(), Some("good"));
    assert!(history[0].returned_at.is_none());
    assert_ledger_consistent(&service, ACTOR_ORG_A, asset.id).await;
}

#[tokio::test]
async fn assigning_an_assigned_asset_conflicts_and_changes_nothing() {
    let (service, _) = test_service();
    let scope = scope_for(&service, ACTOR_ORG_A).await;
    let asset = create(&service, &scope, "AST-1").await;
    service
        .transition(&scope, asset.id, AssetStatus::Assigned, &TransitionContext::assign_to(HOLDER_1))
        .await
        .unwrap();

    let result = service
        .transition(&scope, asset.id, AssetStatus::Assigned, &TransitionContext::assign_to(HOLDER_2))
        .await;
    assert_matches!(result, Err(CoreError::Conflict(_)));

    let current = service.get_asset(&scope, asset.id).await.unwrap();
    assert_eq!(current.status, AssetStatus::Assigned);
    assert_eq!(current.assigned_to, Some(HOLDER_1));
    assert_eq!(service.assignment_history(&scope, asset.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn returning_an_asset_closes_its_assignment() {
    let (service, _) = test_service();
    let scope = scope_for(&service, ACTOR_ORG_A).await;
    let asset = create(&service, &scope, "AST-1").await;
    service
        .transition(&scope, asset.id, AssetStatus::Assigned, &TransitionContext::assign_to(HOLDER_1))
        .await
        .unwrap();

    let returned = service
        .transition(&scope, asset.id, AssetStatus::Available, &TransitionContext::default())
        .await
        .unwrap();

    assert_eq!(returned.status, AssetStatus::Available);
    assert_eq!(returned.assigned_to, None);
    let history = service.assignment_history(&scope, asset.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].returned_at.is_some());
    assert_eq!(history[0].returned_by, Some(ACTOR_ORG_A));
    assert!(service.current_assignment(&scope, asset.id).await.unwrap().is_none());
    assert_ledger_consistent(&service, ACTOR_ORG_A, asset.id).await;
}

#[tokio::test]
async fn losing_an_assigned_asset_ends_the_assignment_implicitly() {
    let (service, _) = test_service();
    let scope = scope_for(&service, ACTOR_ORG_A).await;
    let asset = create(&service, &scope, "AST-1").await;
    service
        .transition(&scope, asset.id, AssetStatus::Assigned, &TransitionContext::assign_to(HOLDER_1))
        .await
        .unwrap();

    let lost = service
        .transition(&scope, asset.id, AssetStatus::Lost, &TransitionContext::default())
        .await
        .unwrap();
    assert_eq!(lost.status, AssetStatus::Lost);
    assert_eq!(lost.assigned_to, None);
    assert_ledger_consistent(&service, ACTOR_ORG_A, asset.id).await;

    // Lost is terminal.
    let result = service
        .transition(&scope, asset.id, AssetStatus::Available, &TransitionContext::default())
        .await;
    assert_matches!(result, Err(CoreError::Validation(_)));
}

#[tokio::test]
async fn history_is_newest_first_across_checkouts() {
    let (service, _) = test_service();
    let scope = scope_for(&service, ACTOR_ORG_A).await;
    let asset = create(&service, &scope, "AST-1").await;

    for holder in [HOLDER_1, HOLDER_2] {
        service
            .transition(&scope, asset.id, AssetStatus::Assigned, &TransitionContext::assign_to(holder))
            .await
            .unwrap();
        service
            .transition(&scope, asset.id, AssetStatus::Available, &TransitionContext::default())
            .await
            .unwrap();
    }

    let history = service.assignment_history(&scope, asset.id).await.unwrap();
    let holders: Vec<_> = history.iter().map(|row| row.assigned_to).collect();
    assert_eq!(holders, vec![HOLDER_2, HOLDER_1]);
    assert!(history.iter().all(|row| !row.is_open()));
}

#[tokio::test]
async fn assigning_without_a_holder_is_a_validation_error() {
    let (service, _) = test_service();
    let scope = scope_for(&service, ACTOR_ORG_A).await;
    let asset = create(&service, &scope, "AST-1").await;

    let result = service
        .transition(&scope, asset.id, AssetStatus::Assigned, &TransitionContext::default())
        .await;
    assert_matches!(result, Err(CoreError::Validation(_)));
    assert!(service.assignment_history(&scope, asset.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn holders_must_be_active_actors_inside_the_scope() {
    let (service, _) = test_service();
    let scope = scope_for(&service, ACTOR_ORG_A).await;
    let asset = create(&service, &scope, "AST-1").await;

    for holder in [9_999, HOLDER_FOREIGN, HOLDER_INACTIVE, ACTOR_ORG_B] {
        let result = service
            .transition(&scope, asset.id, AssetStatus::Assigned, &TransitionContext::assign_to(holder))
            .await;
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    let untouched = service.get_asset(&scope, asset.id).await.unwrap();
    assert_eq!(untouched.status, AssetStatus::Available);
    assert_eq!(untouched.lock_version, asset.lock_version);
    assert!(service.assignment_history(&scope, asset.id).await.unwrap().is_empty());

    // A tenant-level caller may assign to any organization's actor.
    let admin = scope_for(&service, ACTOR_TENANT_ADMIN).await;
    let assigned = service
        .transition(&admin, asset.id, AssetStatus::Assigned, &TransitionContext::assign_to(ACTOR_ORG_B))
        .await
        .unwrap();
    assert_eq!(assigned.assigned_to, Some(ACTOR_ORG_B));
}

#[tokio::test]
async fn repair_cycle_follows_the_transition_table() {
    let (service, _) = test_service();
    let scope = scope_for(&service, ACTOR_ORG_A).await;
    let asset = create(&service, &scope, "AST-1").await;
    let ctx = TransitionContext::default();

    service
        .transition(&scope, asset.id, AssetStatus::InRepair, &ctx)
        .await
        .unwrap();
    assert_matches!(
        service
            .transition(&scope, asset.id, AssetStatus::Assigned, &TransitionContext::assign_to(HOLDER_1))
            .await,
        Err(CoreError::Validation(_))
    );
    let back = service
        .transition(&scope, asset.id, AssetStatus::Available, &ctx)
        .await
        .unwrap();
    assert_eq!(back.status, AssetStatus::Available);
    assert_eq!(back.lock_version, asset.lock_version + 2);
}

// ---------------------------------------------------------------------------
// Soft delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn soft_deleted_assets_disappear_from_lists_and_transitions() {
    let (service, _) = test_service();
    let scope = scope_for(&service, ACTOR_ORG_A).await;
    let asset = create(&service, &scope, "AST-1").await;
    let keep = create(&service, &scope, "AST-2").await;

    service.soft_delete(&scope, asset.id).await.unwrap();

    let listed = service.list_assets(&scope, &AssetQuery::default()).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![keep.id]);

    assert_matches!(
        service
            .transition(&scope, asset.id, AssetStatus::Available, &TransitionContext::default())
            .await,
        Err(CoreError::NotFound { .. })
    );
    assert_matches!(
        service.soft_delete(&scope, asset.id).await,
        Err(CoreError::NotFound { .. })
    );
}

#[tokio::test]
async fn soft_deleting_an_assigned_asset_checks_it_in_first() {
    let (service, store) = test_service();
    let scope = scope_for(&service, ACTOR_ORG_A).await;
    let asset = create(&service, &scope, "AST-1").await;
    service
        .transition(&scope, asset.id, AssetStatus::Assigned, &TransitionContext::assign_to(HOLDER_1))
        .await
        .unwrap();

    service.soft_delete(&scope, asset.id).await.unwrap();

    let stored = store.find_asset(asset.id).await.unwrap().unwrap();
    assert!(stored.is_deleted);
    assert_eq!(stored.status, AssetStatus::Available);
    assert_eq!(stored.assigned_to, None);
    assert!(store.find_open_assignment(asset.id).await.unwrap().is_none());

    // History of a deleted asset stays readable.
    let history = service.assignment_history(&scope, asset.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].returned_at.is_some());
}

#[tokio::test]
async fn deleted_tags_can_be_reused() {
    let (service, _) = test_service();
    let scope = scope_for(&service, ACTOR_ORG_A).await;
    let asset = create(&service, &scope, "AST-1").await;

    assert_matches!(
        service.create_asset(&scope, fields("AST-1")).await,
        Err(CoreError::Conflict(_))
    );

    service.soft_delete(&scope, asset.id).await.unwrap();
    let replacement = create(&service, &scope, "AST-1").await;
    assert_ne!(replacement.id, asset.id);
}

// ---------------------------------------------------------------------------
// Field updates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn field_updates_leave_lifecycle_state_alone() {
    let (service, _) = test_service();
    let scope = scope_for(&service, ACTOR_ORG_A).await;
    let asset = create(&service, &scope, "AST-1").await;
    service
        .transition(&scope, asset.id, AssetStatus::Assigned, &TransitionContext::assign_to(HOLDER_1))
        .await
        .unwrap();

    let patch = assetdesk_core::asset::AssetFields {
        location: Some("HQ 3F".into()),
        purchase_cost_cents: Some(99_000),
        ..Default::default()
    };
    let updated = service.update_asset_fields(&scope, asset.id, &patch).await.unwrap();

    assert_eq!(updated.location.as_deref(), Some("HQ 3F"));
    assert_eq!(updated.purchase_cost_cents, 99_000);
    assert_eq!(updated.brand, "Lenovo");
    assert_eq!(updated.status, AssetStatus::Assigned);
    assert_eq!(updated.assigned_to, Some(HOLDER_1));
    assert_ledger_consistent(&service, ACTOR_ORG_A, asset.id).await;
}

#[tokio::test]
async fn field_updates_validate_and_respect_deletion() {
    let (service, _) = test_service();
    let scope = scope_for(&service, ACTOR_ORG_A).await;
    let asset = create(&service, &scope, "AST-1").await;
    create(&service, &scope, "AST-2").await;

    let blank = assetdesk_core::asset::AssetFields {
        model: Some("  ".into()),
        ..Default::default()
    };
    assert_matches!(
        service.update_asset_fields(&scope, asset.id, &blank).await,
        Err(CoreError::Validation(_))
    );

    let clash = assetdesk_core::asset::AssetFields {
        asset_tag: Some("AST-2".into()),
        ..Default::default()
    };
    assert_matches!(
        service.update_asset_fields(&scope, asset.id, &clash).await,
        Err(CoreError::Conflict(_))
    );

    service.soft_delete(&scope, asset.id).await.unwrap();
    assert_matches!(
        service
            .update_asset_fields(&scope, asset.id, &fields("AST-9"))
            .await,
        Err(CoreError::NotFound { .. })
    );
}

// ---------------------------------------------------------------------------
// Optimistic concurrency
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stale_lifecycle_writes_are_rejected_without_side_effects() {
    let (service, store) = test_service();
    let scope = scope_for(&service, ACTOR_ORG_A).await;
    let asset = create(&service, &scope, "AST-1").await;

    // Another operator moves the asset after we read it.
    service
        .transition(&scope, asset.id, AssetStatus::InRepair, &TransitionContext::default())
        .await
        .unwrap();

    let write = LifecycleWrite {
        asset_id: asset.id,
        expected_status: asset.status,
        expected_version: asset.lock_version,
        new_status: AssetStatus::Retired,
        assigned_to: None,
        mark_deleted: false,
        ledger: LedgerWrite::None,
    };
    assert_eq!(store.commit_lifecycle_write(&write).await.unwrap(), WriteOutcome::Stale);

    let current = store.find_asset(asset.id).await.unwrap().unwrap();
    assert_eq!(current.status, AssetStatus::InRepair);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_assignments_of_one_asset_commit_exactly_once() {
    let (service, store) = test_service();
    let scope = scope_for(&service, ACTOR_ORG_A).await;
    let asset = create(&service, &scope, "AST-1").await;
    let asset_id = asset.id;
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for holder in 0..16_i64 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service
                .transition(
                    &scope,
                    asset_id,
                    AssetStatus::Assigned,
                    &TransitionContext::assign_to(RACE_HOLDERS + holder),
                )
                .await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(err) => assert_matches!(err, CoreError::Conflict(_)),
        }
    }
    assert_eq!(winners, 1, "exactly one concurrent assignment must commit");

    let open: Vec<_> = store
        .list_assignments(asset_id)
        .await
        .unwrap()
        .into_iter()
        .filter(|row| row.is_open())
        .collect();
    assert_eq!(open.len(), 1);
    assert_ledger_consistent(&service, ACTOR_ORG_A, asset_id).await;
}
