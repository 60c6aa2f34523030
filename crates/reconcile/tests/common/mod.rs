#![allow(dead_code)]

use chrono::NaiveDate;
use serde_json::json;
use sqlx::PgPool;
use timebook_db::models::contract::{Contract, ContractMetadata, CreateContract};
use timebook_db::models::customer_request::CreateCustomerRequest;
use timebook_db::models::project::CreateProject;
use timebook_db::models::time_entry::{CreateTimeEntry, DerivedFields, TimeEntry};
use timebook_db::repositories::{ContractRepo, CustomerRequestRepo, ProjectRepo, TimeEntryRepo};
use timebook_core::workflow::ContractState;
use timebook_trac::TicketRecord;

// ---------------------------------------------------------------------------
// Relational fixtures
// ---------------------------------------------------------------------------

/// Create a project with one tracker namespace of the same name.
pub async fn project_with_trac(pool: &PgPool, id: &str) {
    ProjectRepo::create(
        pool,
        &CreateProject {
            id: id.to_string(),
            name: format!("Project {id}"),
        },
    )
    .await
    .unwrap();
    ProjectRepo::add_trac(pool, id, id).await.unwrap();
}

pub async fn customer_request(pool: &PgPool, id: &str, project_id: &str, contract_id: Option<&str>) {
    CustomerRequestRepo::create(
        pool,
        &CreateCustomerRequest {
            id: id.to_string(),
            name: format!("Request {id}"),
            project_id: project_id.to_string(),
            contract_id: contract_id.map(str::to_string),
        },
    )
    .await
    .unwrap();
}

pub async fn contract(pool: &PgPool, name: &str) -> Contract {
    ContractRepo::create(
        pool,
        &CreateContract {
            name: name.to_string(),
            metadata: ContractMetadata {
                days: 10.0,
                amount: 1000.0,
                contract_number: None,
                workflow_state: ContractState::Active,
            },
            project_id: None,
        },
    )
    .await
    .unwrap()
}

pub fn new_entry(project_id: &str, ticket: Option<i32>) -> CreateTimeEntry {
    CreateTimeEntry {
        project_id: project_id.to_string(),
        date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        start_at: None,
        end_at: None,
        duration_secs: 2 * 3600,
        description: Some("work".to_string()),
        location: None,
        ticket,
        invoice_number: None,
    }
}

/// Insert an entry directly, bypassing creation-time reconciliation.
pub async fn raw_entry(pool: &PgPool, project_id: &str, ticket: Option<i32>) -> TimeEntry {
    TimeEntryRepo::create(pool, &new_entry(project_id, ticket), &DerivedFields::default())
        .await
        .unwrap()
}

pub async fn contract_of(pool: &PgPool, entry_id: i64) -> Option<String> {
    TimeEntryRepo::find_by_id(pool, entry_id)
        .await
        .unwrap()
        .unwrap()
        .contract_id
}

// ---------------------------------------------------------------------------
// Ticket mirror
// ---------------------------------------------------------------------------

/// Create the mirror schema and `ticket_custom` table for `namespace`.
pub async fn mirror(pool: &PgPool, namespace: &str) {
    sqlx::query(&format!("CREATE SCHEMA \"trac_{namespace}\""))
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(&format!(
        "CREATE TABLE \"trac_{namespace}\".ticket_custom \
         (ticket INTEGER NOT NULL, name TEXT NOT NULL, value TEXT)"
    ))
    .execute(pool)
    .await
    .unwrap();
}

/// Record `ticket`'s customer request in the mirror of `namespace`.
pub async fn mirror_ticket(pool: &PgPool, namespace: &str, ticket: i32, cr_id: &str) {
    sqlx::query(&format!(
        "INSERT INTO \"trac_{namespace}\".ticket_custom (ticket, name, value) \
         VALUES ($1, 'customerrequest', $2)"
    ))
    .bind(ticket)
    .bind(cr_id)
    .execute(pool)
    .await
    .unwrap();
}

// ---------------------------------------------------------------------------
// Tracker records
// ---------------------------------------------------------------------------

pub fn ticket(id: i32, ticket_type: &str, cr_id: Option<&str>) -> TicketRecord {
    let mut attributes = json!({ "type": ticket_type, "summary": format!("Ticket {id}") });
    if let Some(cr_id) = cr_id {
        attributes["customerrequest"] = json!(cr_id);
    }
    TicketRecord::new(id, serde_json::from_value(attributes).unwrap())
}
