// src/server.rs
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::ord::{self, OrdProvider};
use crate::rpc::{self, RpcRequest, RpcResponse};
use crate::tools;

/// Shared state threaded through the handlers: the immutable
/// configuration plus the registry backend. Nothing here is mutable, so
/// parallel requests need no locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: Arc<dyn OrdProvider>,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/mcp", post(mcp_handler))
        .route("/health", get(health))
        .with_state(state)
}

/// Serve until ctrl-c.
pub async fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let provider = ord::provider_for(&config)?;
    let state = AppState {
        config: Arc::new(config),
        provider,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let listener = TcpListener::bind(addr).await?;
    info!(
        "🌐 MCP server listening on http://{addr}/mcp, provider: {}",
        state.config.provider
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("🛑 shutdown signal received");
    }
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "provider": state.config.provider.to_string(),
    }))
}

async fn mcp_handler(State(state): State<AppState>, body: String) -> Response {
    match handle_rpc(&state, &body).await {
        Some(response) => Json(response).into_response(),
        // Notifications get no body.
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Process one JSON-RPC message. Returns `None` for notifications.
pub async fn handle_rpc(state: &AppState, raw: &str) -> Option<RpcResponse> {
    let request: RpcRequest = match serde_json::from_str(raw) {
        Ok(request) => request,
        Err(err) => {
            warn!("unparseable request: {err}");
            return Some(RpcResponse::failure(
                None,
                rpc::PARSE_ERROR,
                format!("parse error: {err}"),
            ));
        }
    };

    let id = request.id.clone();
    let is_notification = request.is_notification();
    let response = match request.method.as_str() {
        "initialize" => Some(RpcResponse::success(
            id,
            json!({
                "protocolVersion": rpc::PROTOCOL_VERSION,
                "capabilities": {"tools": {}},
                "serverInfo": {
                    "name": "ord-reporting",
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        )),
        "ping" => Some(RpcResponse::success(id, json!({}))),
        "tools/list" => Some(RpcResponse::success(id, json!({"tools": tools::list()}))),
        "tools/call" => match serde_json::from_value::<CallParams>(request.params) {
            Err(err) => Some(RpcResponse::failure(
                id,
                rpc::INVALID_PARAMS,
                format!("invalid call params: {err}"),
            )),
            Ok(params) => match tools::call(state, &params.name, params.arguments).await {
                Ok(result) => match serde_json::to_value(result) {
                    Ok(value) => Some(RpcResponse::success(id, value)),
                    Err(err) => Some(RpcResponse::failure(
                        id,
                        rpc::INTERNAL_ERROR,
                        format!("could not encode tool result: {err}"),
                    )),
                },
                Err(err) => {
                    warn!("tool {} failed: {err}", params.name);
                    Some(RpcResponse::failure(id, err.rpc_code(), err.to_string()))
                }
            },
        },
        other => Some(RpcResponse::failure(
            id,
            rpc::METHOD_NOT_FOUND,
            format!("unknown method: {other}"),
        )),
    };

    // Id-less requests are notifications: still processed, never answered.
    if is_notification {
        debug!("notification: {}, no response sent", request.method);
        return None;
    }
    response
}

// Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ord::VkClient;
    use mockito::Matcher;

    fn state_for(base_url: &str) -> AppState {
        let config = Config::from_lookup(|name| match name {
            "ORD_PROVIDER" => Some("vk".into()),
            "ORD_API_KEY" => Some("abc123".into()),
            _ => None,
        })
        .expect("test config");
        let provider = VkClient::with_base_url("abc123", base_url).expect("test client");
        AppState {
            config: Arc::new(config),
            provider: Arc::new(provider),
        }
    }

    fn rendered(response: RpcResponse) -> Value {
        serde_json::to_value(response).expect("serializable response")
    }

    #[tokio::test]
    async fn initialize_reports_tool_capability() {
        let state = state_for("http://unused.invalid");
        let raw = r#"{"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}"#;
        let response = rendered(handle_rpc(&state, raw).await.unwrap());
        assert_eq!(response["result"]["protocolVersion"], rpc::PROTOCOL_VERSION);
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn tools_list_names_all_four_tools() {
        let state = state_for("http://unused.invalid");
        let raw = r#"{"jsonrpc": "2.0", "id": 2, "method": "tools/list"}"#;
        let response = rendered(handle_rpc(&state, raw).await.unwrap());
        let listed = response["result"]["tools"].as_array().unwrap();
        assert_eq!(listed.len(), 4);
        assert_eq!(listed[0]["name"], "add_counterparty");
    }

    #[tokio::test]
    async fn unknown_method_is_reported() {
        let state = state_for("http://unused.invalid");
        let raw = r#"{"jsonrpc": "2.0", "id": 3, "method": "resources/list"}"#;
        let response = rendered(handle_rpc(&state, raw).await.unwrap());
        assert_eq!(response["error"]["code"], rpc::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn unparseable_body_yields_parse_error() {
        let state = state_for("http://unused.invalid");
        let response = rendered(handle_rpc(&state, "{not json").await.unwrap());
        assert_eq!(response["error"]["code"], rpc::PARSE_ERROR);
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let state = state_for("http://unused.invalid");
        let raw = r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#;
        assert!(handle_rpc(&state, raw).await.is_none());
    }

    #[tokio::test]
    async fn id_less_known_methods_are_treated_as_notifications() {
        let state = state_for("http://unused.invalid");
        let raw = r#"{"jsonrpc": "2.0", "method": "tools/list"}"#;
        assert!(handle_rpc(&state, raw).await.is_none());
    }

    #[tokio::test]
    async fn id_less_tool_call_runs_but_gets_no_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", Matcher::Regex(r"^/v1/person/.+$".into()))
            .match_header("authorization", "Bearer abc123")
            .with_status(201)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let state = state_for(&server.url());
        let raw = r#"{"jsonrpc": "2.0", "method": "tools/call", "params": {
            "name": "add_counterparty",
            "arguments": {
                "name": "ООО «Север»",
                "roles": ["publisher"],
                "type": "juridical",
                "inn": "7707083893"
            }
        }}"#;

        assert!(handle_rpc(&state, raw).await.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn valid_call_makes_exactly_one_outbound_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", Matcher::Regex(r"^/v1/person/.+$".into()))
            .match_header("authorization", "Bearer abc123")
            .with_status(201)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let state = state_for(&server.url());
        let raw = r#"{"jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": {
            "name": "add_counterparty",
            "arguments": {
                "name": "ООО «Север»",
                "roles": ["advertiser"],
                "type": "juridical",
                "inn": "7707083893"
            }
        }}"#;
        let response = rendered(handle_rpc(&state, raw).await.unwrap());

        assert!(response.get("error").is_none());
        let structured = &response["result"]["structuredContent"];
        assert_eq!(structured["status_code"], 201);
        assert!(structured["counterparty_id"].is_string());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_arguments_never_reach_the_registry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let state = state_for(&server.url());
        // INN too short, rejected locally.
        let raw = r#"{"jsonrpc": "2.0", "id": 5, "method": "tools/call", "params": {
            "name": "add_counterparty",
            "arguments": {"name": "x", "roles": ["agency"], "type": "physical", "inn": "123"}
        }}"#;
        let response = rendered(handle_rpc(&state, raw).await.unwrap());

        assert_eq!(response["error"]["code"], rpc::INVALID_PARAMS);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn equal_contract_sides_are_rejected_locally() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let state = state_for(&server.url());
        let raw = r#"{"jsonrpc": "2.0", "id": 6, "method": "tools/call", "params": {
            "name": "add_contract",
            "arguments": {
                "client_external_id": "same",
                "contractor_external_id": "same",
                "subject_type": "distribution"
            }
        }}"#;
        let response = rendered(handle_rpc(&state, raw).await.unwrap());

        assert_eq!(response["error"]["code"], rpc::INVALID_PARAMS);
        assert!(response["error"]["message"]
            .as_str()
            .unwrap()
            .contains("must differ"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upstream_rejection_is_not_remapped_to_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", Matcher::Regex(r"^/v3/creative/.+$".into()))
            .with_status(400)
            .with_body(r#"{"error": "kktu not recognised"}"#)
            .create_async()
            .await;

        let state = state_for(&server.url());
        let raw = r#"{"jsonrpc": "2.0", "id": 7, "method": "tools/call", "params": {
            "name": "add_advertising",
            "arguments": {
                "kktus": ["1.1.1"],
                "texts": ["spring sale"],
                "contract_external_ids": ["contract-1"]
            }
        }}"#;
        let response = rendered(handle_rpc(&state, raw).await.unwrap());

        assert_eq!(response["error"]["code"], rpc::INVALID_PARAMS);
        assert!(response["error"]["message"]
            .as_str()
            .unwrap()
            .contains("kktu not recognised"));
    }

    #[tokio::test]
    async fn upstream_outage_surfaces_as_execution_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", Matcher::Regex(r"^/v4/invoice/.+$".into()))
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let state = state_for(&server.url());
        let raw = r#"{"jsonrpc": "2.0", "id": 8, "method": "tools/call", "params": {
            "name": "add_act",
            "arguments": {
                "contract_external_id": "contract-1",
                "date_act": "2024-03-31",
                "date_start": "2024-03-01",
                "date_end": "2024-03-31",
                "excluding_vat": 100.0,
                "vat_rate": 20,
                "client_role": "agency",
                "contractor_role": "publisher"
            }
        }}"#;
        let response = rendered(handle_rpc(&state, raw).await.unwrap());

        assert_eq!(response["error"]["code"], rpc::INTERNAL_ERROR);
        assert!(response["error"]["message"].as_str().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn unknown_tool_is_invalid_params() {
        let state = state_for("http://unused.invalid");
        let raw = r#"{"jsonrpc": "2.0", "id": 9, "method": "tools/call", "params": {
            "name": "delete_everything", "arguments": {}
        }}"#;
        let response = rendered(handle_rpc(&state, raw).await.unwrap());
        assert_eq!(response["error"]["code"], rpc::INVALID_PARAMS);
    }
}
