pub mod contract;
pub mod customer_request;
pub mod health;
pub mod project;
pub mod reconciliation;
pub mod time_entry;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /projects                              list, create
/// /projects/{id}                         get
/// /projects/{id}/tracs                   list, attach namespace
///
/// /customer-requests                     list, create
/// /customer-requests/{id}                get
///
/// /contracts                             list, create
/// /contracts/{id}                        get with linked requests
/// /contracts/import                      merge spreadsheet rows (POST)
///
/// /time-entries                          list, create (reconciled)
/// /time-entries/{id}                     get, update
/// /time-entries/{id}/permissions         derived grants (GET)
/// /time-entries/{id}/transition          store workflow state (POST)
///
/// /reconciliation                        run a batch pass (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/customer-requests", customer_request::router())
        .nest("/contracts", contract::router())
        .nest("/time-entries", time_entry::router())
        .nest("/reconciliation", reconciliation::router())
}
