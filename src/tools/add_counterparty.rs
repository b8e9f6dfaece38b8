// src/tools/add_counterparty.rs
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::OrdError;
use crate::ord::{CounterpartyRole, CounterpartyType, JuridicalDetails};
use crate::server::AppState;
use crate::tools::{parse_params, ToolDescriptor, ToolResult};
use crate::validators;

#[derive(Debug, Deserialize)]
struct Params {
    /// Person or company name, e.g. "Иванов Иван Иванович" or "ООО «Север»".
    name: String,
    roles: Vec<CounterpartyRole>,
    #[serde(rename = "type")]
    kind: CounterpartyType,
    inn: String,
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: "add_counterparty",
        description: "Register a counterparty (a person or company taking part \
                      in the advertising chain) with the ORD registry.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Full person name or legal company name."
                },
                "roles": {
                    "type": "array",
                    "items": {
                        "type": "string",
                        "enum": ["advertiser", "agency", "ors", "publisher"]
                    },
                    "minItems": 1,
                    "description": "Roles the counterparty plays; several may apply."
                },
                "type": {
                    "type": "string",
                    "enum": ["physical", "juridical", "ip", "foreign_physical", "foreign_juridical"],
                    "description": "Legal form of the counterparty."
                },
                "inn": {
                    "type": "string",
                    "pattern": "^\\d{10,12}$",
                    "description": "Tax number: 10 digits for companies, 12 for persons."
                }
            },
            "required": ["name", "roles", "type", "inn"]
        }),
    }
}

pub async fn run(state: &AppState, arguments: Value) -> Result<ToolResult, OrdError> {
    let params: Params = parse_params(arguments)?;
    info!("adding counterparty: {}", params.name);

    validators::check_counterparty_name(&params.name, state.config.max_counterparty_name_len)?;
    validators::check_inn(&params.inn)?;
    if params.roles.is_empty() {
        return Err(OrdError::Validation("at least one role is required".into()));
    }

    let created = state
        .provider
        .add_counterparty(
            &params.name,
            &params.roles,
            JuridicalDetails {
                kind: params.kind,
                inn: params.inn.clone(),
            },
        )
        .await?;

    let structured = serde_json::to_value(&created)
        .map_err(|err| OrdError::Internal(format!("could not encode tool result: {err}")))?;
    Ok(ToolResult::new(
        structured,
        json!({
            "tool_name": "add_counterparty",
            "name": params.name,
            "roles": params.roles,
            "type": params.kind,
            "inn": params.inn,
        }),
    ))
}
