//! HTTP-level tests for the entity, reconciliation and import endpoints.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;
use timebook_trac::{InMemoryTicketService, TicketRecord};

async fn seed_project(pool: &PgPool, id: &str) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/projects", json!({ "id": id, "name": id })).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/projects/{id}/tracs"),
        json!({ "trac_name": id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

fn entry_body(project_id: &str, ticket: Option<i32>) -> serde_json::Value {
    json!({
        "project_id": project_id,
        "date": "2026-03-02",
        "duration_secs": 9000,
        "description": "Fix checkout",
        "ticket": ticket,
    })
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn project_crud_and_namespaces(pool: PgPool) {
    seed_project(&pool, "acme").await;

    let response = get(common::build_test_app(pool.clone()), "/api/v1/projects/acme").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "acme");

    let response = get(common::build_test_app(pool.clone()), "/api/v1/projects/acme/tracs").await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["trac_name"], "acme");

    let response = get(common::build_test_app(pool.clone()), "/api/v1/projects").await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = get(common::build_test_app(pool), "/api/v1/projects/missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unsafe_namespace_is_rejected(pool: PgPool) {
    seed_project(&pool, "acme").await;
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/projects/acme/tracs",
        json!({ "trac_name": "acme\"; DROP SCHEMA public; --" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_project_conflicts(pool: PgPool) {
    seed_project(&pool, "acme").await;
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/projects",
        json!({ "id": "acme", "name": "Again" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Time entries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_time_entry_reconciles_from_tracker(pool: PgPool) {
    seed_project(&pool, "acme").await;
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/customer-requests",
        json!({ "id": "CR-9", "name": "Checkout", "project_id": "acme" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let tickets = Arc::new(InMemoryTicketService::new());
    tickets.insert(
        "acme",
        TicketRecord::new(
            42,
            serde_json::from_value(json!({ "type": "bug", "customerrequest": "CR-9" })).unwrap(),
        ),
    );

    let response = post_json(
        common::build_test_app_with(pool, tickets),
        "/api/v1/time-entries",
        entry_body("acme", Some(42)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["tickettype"], "bug");
    assert!(json["contract_id"].is_null());
    assert_eq!(json["hours_str"], "2:30");
    assert_eq!(json["work_days"], 0.3125);
    assert_eq!(json["reconciliation"]["outcome"], "linked");
    assert_eq!(json["reconciliation"]["customer_request_id"], "CR-9");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn client_cannot_set_derived_fields(pool: PgPool) {
    seed_project(&pool, "acme").await;
    let mut body = entry_body("acme", None);
    body["contract_id"] = json!("forged");
    body["tickettype"] = json!("forged");

    let response = post_json(common::build_test_app(pool), "/api/v1/time-entries", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["contract_id"].is_null());
    assert!(json["tickettype"].is_null());
    assert_eq!(json["reconciliation"]["outcome"], "no_ticket");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn permissions_follow_workflow_state(pool: PgPool) {
    seed_project(&pool, "acme").await;
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/time-entries",
        entry_body("acme", None),
    )
    .await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let owner_can = |grants: &serde_json::Value, action: &str| {
        grants
            .as_array()
            .unwrap()
            .iter()
            .any(|g| g["role"] == "owner" && g["action"] == action)
    };

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/time-entries/{id}/permissions"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["workflow_state"], "new");
    assert!(owner_can(&json["grants"], "edit"));
    assert!(owner_can(&json["grants"], "delete"));

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/time-entries/{id}/transition"),
        json!({ "state": "invoiced" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/time-entries/{id}/permissions"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["workflow_state"], "invoiced");
    assert!(!owner_can(&json["grants"], "edit"));
    assert!(!owner_can(&json["grants"], "delete"));
    assert!(owner_can(&json["grants"], "view"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_transition_and_update_are_rejected(pool: PgPool) {
    seed_project(&pool, "acme").await;
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/time-entries",
        entry_body("acme", None),
    )
    .await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/time-entries/{id}/transition"),
        json!({ "state": "Not A State" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/time-entries/{id}"),
        json!({ "duration_secs": -60 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(
        common::build_test_app(pool),
        &format!("/api/v1/time-entries/{id}"),
        json!({ "duration_secs": 3600 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["hours_str"], "1:00");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_requires_exactly_one_filter(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/time-entries").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Import and reconciliation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn import_then_reconcile(pool: PgPool) {
    seed_project(&pool, "acme").await;
    post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/customer-requests",
        json!({ "id": "CR-7", "name": "Homepage", "project_id": "acme" }),
    )
    .await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/contracts/import?shards=2",
        json!([{
            "titolocommessa": "Acme Q1",
            "nrcontratto": "C-100",
            "gg": 20,
            "amount": 5000,
            "cr_id": "CR-7",
            "stato": "A"
        }]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["data"]["contracts_created"], 1);
    assert!(report["data"]["reconciliation"].is_object());

    let response = get(common::build_test_app(pool.clone()), "/api/v1/contracts?project_id=acme").await;
    let contracts = body_json(response).await;
    let contract_id = contracts["data"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(contracts["data"][0]["workflow_state"], "active");

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/contracts/{contract_id}"),
    )
    .await;
    assert_eq!(body_json(response).await["customer_requests"][0]["id"], "CR-7");

    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/reconciliation", json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["entries_updated"], 0);

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/reconciliation?shards=0",
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
