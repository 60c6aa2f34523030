//! JSON-RPC client for Trac's `ticket.get`.
//!
//! Each namespace is a separate Trac environment reachable at
//! `{base_url}/{namespace}/login/jsonrpc`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use timebook_core::types::TicketNumber;

use crate::config::TracConfig;
use crate::error::TicketServiceError;
use crate::record::TicketRecord;
use crate::service::TicketService;

/// JSON-RPC error code Trac uses for missing resources.
const RPC_NOT_FOUND: i64 = 404;

/// HTTP client for a family of Trac environments.
pub struct TracClient {
    client: reqwest::Client,
    config: TracConfig,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

impl TracClient {
    /// Build a client whose requests time out after `config.timeout`.
    pub fn new(config: TracConfig) -> Result<Self, TicketServiceError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, namespace: &str) -> String {
        format!("{}/{}/login/jsonrpc", self.config.base_url, namespace)
    }

    /// Turn a decoded JSON-RPC envelope into a record or a classified error.
    fn interpret(
        namespace: &str,
        ticket: TicketNumber,
        response: RpcResponse,
    ) -> Result<TicketRecord, TicketServiceError> {
        if let Some(err) = response.error {
            if err.code == RPC_NOT_FOUND || err.message.contains("does not exist") {
                return Err(TicketServiceError::NotFound {
                    namespace: namespace.to_string(),
                    ticket,
                });
            }
            return Err(TicketServiceError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        let result = response
            .result
            .ok_or_else(|| TicketServiceError::Malformed("response has no result".into()))?;
        TicketRecord::from_rpc_result(&result)
    }
}

#[async_trait]
impl TicketService for TracClient {
    async fn fetch(
        &self,
        namespace: &str,
        ticket: TicketNumber,
    ) -> Result<TicketRecord, TicketServiceError> {
        let body = json!({
            "method": "ticket.get",
            "params": [ticket],
            "id": ticket,
        });

        let mut request = self.client.post(self.endpoint(namespace)).json(&body);
        if let Some(username) = &self.config.username {
            request = request.basic_auth(username, self.config.password.as_deref());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TicketServiceError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: RpcResponse = response.json().await?;
        tracing::debug!(namespace, ticket, "Fetched ticket from tracker");
        Self::interpret(namespace, ticket, envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn config() -> TracConfig {
        TracConfig {
            base_url: "https://trac.example.com".into(),
            username: None,
            password: None,
            timeout: Duration::from_secs(5),
        }
    }

    fn envelope(value: Value) -> RpcResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn endpoint_is_scoped_by_namespace() {
        let client = TracClient::new(config()).unwrap();
        assert_eq!(
            client.endpoint("acme"),
            "https://trac.example.com/acme/login/jsonrpc"
        );
    }

    #[test]
    fn successful_result_becomes_record() {
        let response = envelope(json!({
            "result": [42, 0, 0, {"type": "bug", "customerrequest": "CR-9"}],
            "error": null,
            "id": 42
        }));
        let record = TracClient::interpret("acme", 42, response).unwrap();
        assert_eq!(record.ticket_type(), Some("bug"));
    }

    #[test]
    fn not_found_error_is_distinguished() {
        let response = envelope(json!({
            "result": null,
            "error": {"code": 404, "message": "Ticket 42 does not exist.", "name": "JSONRPCError"},
            "id": 42
        }));
        assert_matches!(
            TracClient::interpret("acme", 42, response),
            Err(TicketServiceError::NotFound { ticket: 42, .. })
        );
    }

    #[test]
    fn other_rpc_errors_are_transient() {
        let response = envelope(json!({
            "error": {"code": -32603, "message": "Internal error"}
        }));
        assert_matches!(
            TracClient::interpret("acme", 42, response),
            Err(TicketServiceError::Rpc { code: -32603, .. })
        );
    }

    #[test]
    fn empty_envelope_is_malformed() {
        assert_matches!(
            TracClient::interpret("acme", 42, envelope(json!({}))),
            Err(TicketServiceError::Malformed(_))
        );
    }
}
