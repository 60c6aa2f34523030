//! Batch reconciliation against a real database and hand-built ticket
//! mirror schemas.

mod common;

use std::num::NonZeroUsize;

use common::{contract, contract_of, customer_request, mirror, mirror_ticket, project_with_trac, raw_entry};
use sqlx::PgPool;
use timebook_core::namespace::NamespacePolicy;
use timebook_db::repositories::{CustomerRequestRepo, ProjectRepo, TimeEntryRepo};
use timebook_reconcile::{BatchReconciler, ReconcileConfig};

fn reconciler(shards: usize) -> BatchReconciler {
    BatchReconciler::new(
        ReconcileConfig::default().with_shard_count(NonZeroUsize::new(shards).unwrap()),
    )
}

// ---------------------------------------------------------------------------
// Fill-forward and idempotence
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn attributes_entries_and_second_pass_writes_nothing(pool: PgPool) {
    project_with_trac(&pool, "acme").await;
    mirror(&pool, "acme").await;
    let c = contract(&pool, "Acme Q1").await;
    customer_request(&pool, "CR-7", "acme", Some(&c.id)).await;
    mirror_ticket(&pool, "acme", 42, "CR-7").await;

    let e1 = raw_entry(&pool, "acme", Some(42)).await;
    let e2 = raw_entry(&pool, "acme", Some(42)).await;
    let other = raw_entry(&pool, "acme", Some(99)).await;

    let first = reconciler(10).run(&pool).await.unwrap();
    assert_eq!(first.entries_scanned, 3);
    assert_eq!(first.entries_updated, 2);
    assert_eq!(first.shards_executed, 1);
    assert_eq!(contract_of(&pool, e1.id).await.as_deref(), Some(c.id.as_str()));
    assert_eq!(contract_of(&pool, e2.id).await.as_deref(), Some(c.id.as_str()));
    assert_eq!(contract_of(&pool, other.id).await, None);

    let stamped = TimeEntryRepo::find_by_id(&pool, e1.id).await.unwrap().unwrap().updated_at;

    let second = reconciler(10).run(&pool).await.unwrap();
    assert_eq!(second.entries_updated, 0);
    assert_eq!(second.entries_unchanged, 2);

    // The row was not rewritten, so its timestamp did not move.
    let after = TimeEntryRepo::find_by_id(&pool, e1.id).await.unwrap().unwrap().updated_at;
    assert_eq!(after, stamped);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn never_clears_an_existing_contract(pool: PgPool) {
    project_with_trac(&pool, "acme").await;
    mirror(&pool, "acme").await;
    let c = contract(&pool, "Acme Q1").await;
    customer_request(&pool, "CR-7", "acme", Some(&c.id)).await;
    mirror_ticket(&pool, "acme", 42, "CR-7").await;
    let entry = raw_entry(&pool, "acme", Some(42)).await;

    reconciler(10).run(&pool).await.unwrap();
    assert_eq!(contract_of(&pool, entry.id).await.as_deref(), Some(c.id.as_str()));

    // Point the ticket at a request without a contract.
    customer_request(&pool, "CR-8", "acme", None).await;
    sqlx::query("UPDATE \"trac_acme\".ticket_custom SET value = 'CR-8' WHERE ticket = 42")
        .execute(&pool)
        .await
        .unwrap();

    let report = reconciler(10).run(&pool).await.unwrap();
    assert_eq!(report.unlinked_customer_request, 1);
    assert_eq!(report.entries_updated, 0);
    assert_eq!(contract_of(&pool, entry.id).await.as_deref(), Some(c.id.as_str()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn relinked_request_moves_entries_to_the_new_contract(pool: PgPool) {
    project_with_trac(&pool, "acme").await;
    mirror(&pool, "acme").await;
    let old = contract(&pool, "Acme 2025").await;
    let new = contract(&pool, "Acme 2026").await;
    customer_request(&pool, "CR-7", "acme", Some(&old.id)).await;
    mirror_ticket(&pool, "acme", 42, "CR-7").await;
    let entry = raw_entry(&pool, "acme", Some(42)).await;

    reconciler(10).run(&pool).await.unwrap();
    CustomerRequestRepo::set_contract(&pool, "CR-7", &new.id).await.unwrap();
    let report = reconciler(10).run(&pool).await.unwrap();

    assert_eq!(report.entries_updated, 1);
    assert_eq!(contract_of(&pool, entry.id).await.as_deref(), Some(new.id.as_str()));
}

// ---------------------------------------------------------------------------
// Sharding
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn result_is_independent_of_shard_count(pool: PgPool) {
    let mut entry_ids = Vec::new();
    for (i, ns) in ["alpha", "beta", "gamma", "delta", "epsilon"].iter().enumerate() {
        project_with_trac(&pool, ns).await;
        mirror(&pool, ns).await;
        let c = contract(&pool, &format!("Contract {ns}")).await;
        let cr = format!("CR-{i}");
        customer_request(&pool, &cr, ns, Some(&c.id)).await;
        for ticket in 1..=3 {
            mirror_ticket(&pool, ns, ticket, &cr).await;
            entry_ids.push(raw_entry(&pool, ns, Some(ticket)).await.id);
        }
        entry_ids.push(raw_entry(&pool, ns, Some(100)).await.id);
    }

    let mut outcomes = Vec::new();
    for shards in [1, 2, 3, 10, 64] {
        let mut tx = pool.begin().await.unwrap();
        let report = reconciler(shards).run_in(&mut tx).await.unwrap();
        let attributed: Vec<(i64, Option<String>)> = sqlx::query_as(
            "SELECT id, contract_id FROM time_entries ORDER BY id",
        )
        .fetch_all(&mut *tx)
        .await
        .unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(report.namespaces, 5);
        assert_eq!(report.shards_executed, shards.min(5));
        assert_eq!(report.entries_updated, 15);
        outcomes.push(attributed);
    }

    assert!(outcomes.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(outcomes[0].len(), entry_ids.len());
}

// ---------------------------------------------------------------------------
// Integrity accounting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn counts_entries_it_cannot_reconcile(pool: PgPool) {
    project_with_trac(&pool, "acme").await;
    mirror(&pool, "acme").await;
    mirror_ticket(&pool, "acme", 1, "CR-404").await;

    // No namespace at all.
    ProjectRepo::create(
        &pool,
        &timebook_db::models::project::CreateProject {
            id: "orphan".into(),
            name: "Orphan".into(),
        },
    )
    .await
    .unwrap();
    // Namespace without a mirror schema.
    project_with_trac(&pool, "unmirrored").await;

    raw_entry(&pool, "acme", None).await;
    raw_entry(&pool, "acme", Some(1)).await;
    raw_entry(&pool, "orphan", Some(5)).await;
    raw_entry(&pool, "unmirrored", Some(5)).await;

    let report = reconciler(10).run(&pool).await.unwrap();

    assert_eq!(report.entries_scanned, 4);
    assert_eq!(report.missing_ticket, 1);
    assert_eq!(report.missing_namespace, 1);
    assert_eq!(report.unmirrored_namespace, 1);
    assert_eq!(report.unknown_customer_request, 1);
    assert_eq!(report.entries_updated, 0);
    assert_eq!(report.integrity_warnings(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ambiguous_namespace_policy(pool: PgPool) {
    project_with_trac(&pool, "acme").await;
    ProjectRepo::add_trac(&pool, "acme", "acme_legacy").await.unwrap();
    mirror(&pool, "acme").await;
    mirror(&pool, "acme_legacy").await;
    let c = contract(&pool, "Acme Q1").await;
    customer_request(&pool, "CR-7", "acme", Some(&c.id)).await;
    mirror_ticket(&pool, "acme", 42, "CR-7").await;
    let entry = raw_entry(&pool, "acme", Some(42)).await;

    let strict = BatchReconciler::new(ReconcileConfig {
        namespace_policy: NamespacePolicy::RejectAmbiguous,
        ..ReconcileConfig::default()
    });
    let report = strict.run(&pool).await.unwrap();
    assert_eq!(report.ambiguous_namespace, 1);
    assert_eq!(contract_of(&pool, entry.id).await, None);

    // `first` picks the alphabetically first namespace, `acme`.
    let report = reconciler(10).run(&pool).await.unwrap();
    assert_eq!(report.entries_updated, 1);
    assert_eq!(contract_of(&pool, entry.id).await.as_deref(), Some(c.id.as_str()));
}
