// src/tools/mod.rs
//! Reporting tools exposed over the `/mcp` endpoint. Each tool validates
//! its arguments, performs exactly one registry call and wraps the
//! outcome in a tool result.

pub mod add_act;
pub mod add_advertising;
pub mod add_contract;
pub mod add_counterparty;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::OrdError;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

/// Result envelope returned from a tool call.
#[derive(Debug, Serialize)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ToolResult {
    /// Wrap a structured outcome, mirroring it as text content.
    pub fn new(structured: Value, meta: Value) -> Self {
        Self {
            content: vec![ContentItem {
                kind: "text",
                text: structured.to_string(),
            }],
            structured_content: Some(structured),
            meta: Some(meta),
        }
    }
}

/// Tool metadata published through `tools/list`.
#[derive(Debug, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// All tools this server publishes.
pub fn list() -> Vec<ToolDescriptor> {
    vec![
        add_counterparty::descriptor(),
        add_contract::descriptor(),
        add_advertising::descriptor(),
        add_act::descriptor(),
    ]
}

/// Dispatch a `tools/call` to the named tool.
pub async fn call(state: &AppState, name: &str, arguments: Value) -> Result<ToolResult, OrdError> {
    match name {
        "add_counterparty" => add_counterparty::run(state, arguments).await,
        "add_contract" => add_contract::run(state, arguments).await,
        "add_advertising" => add_advertising::run(state, arguments).await,
        "add_act" => add_act::run(state, arguments).await,
        other => Err(OrdError::Validation(format!("unknown tool: {other}"))),
    }
}

/// Decode tool arguments, surfacing serde errors as validation failures.
fn parse_params<T: DeserializeOwned>(arguments: Value) -> Result<T, OrdError> {
    serde_json::from_value(arguments)
        .map_err(|err| OrdError::Validation(format!("invalid tool arguments: {err}")))
}
