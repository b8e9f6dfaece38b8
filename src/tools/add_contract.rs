// src/tools/add_contract.rs
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::OrdError;
use crate::ord::{ContractKind, SubjectType};
use crate::server::AppState;
use crate::tools::{parse_params, ToolDescriptor, ToolResult};
use crate::validators;

#[derive(Debug, Deserialize)]
struct Params {
    client_external_id: String,
    contractor_external_id: String,
    subject_type: SubjectType,
    /// Defaults to today's date (UTC) when omitted.
    #[serde(default)]
    date: Option<String>,
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: "add_contract",
        description: "File a service contract between two registered \
                      counterparties with the ORD registry.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "client_external_id": {
                    "type": "string",
                    "description": "External id of the client counterparty."
                },
                "contractor_external_id": {
                    "type": "string",
                    "description": "External id of the contractor counterparty."
                },
                "subject_type": {
                    "type": "string",
                    "enum": ["representation", "org_distribution", "mediation", "distribution", "other"],
                    "description": "Subject of the contract."
                },
                "date": {
                    "type": "string",
                    "pattern": "^\\d{4}-\\d{2}-\\d{2}$",
                    "description": "Signing date, YYYY-MM-DD. Defaults to today."
                }
            },
            "required": ["client_external_id", "contractor_external_id", "subject_type"]
        }),
    }
}

pub async fn run(state: &AppState, arguments: Value) -> Result<ToolResult, OrdError> {
    let params: Params = parse_params(arguments)?;
    info!(
        "filing contract: client {}, contractor {}",
        params.client_external_id, params.contractor_external_id
    );

    validators::check_client_and_contractor_differ(
        &params.client_external_id,
        &params.contractor_external_id,
    )?;

    let date = params
        .date
        .unwrap_or_else(|| Utc::now().date_naive().format("%Y-%m-%d").to_string());
    validators::check_contract_date(&date)?;

    let created = state
        .provider
        .add_contract(
            ContractKind::Service,
            &params.client_external_id,
            &params.contractor_external_id,
            &date,
            params.subject_type,
        )
        .await?;

    let structured = serde_json::to_value(&created)
        .map_err(|err| OrdError::Internal(format!("could not encode tool result: {err}")))?;
    Ok(ToolResult::new(
        structured,
        json!({
            "tool_name": "add_contract",
            "client_external_id": params.client_external_id,
            "contractor_external_id": params.contractor_external_id,
            "subject_type": params.subject_type,
            "date": date,
        }),
    ))
}
