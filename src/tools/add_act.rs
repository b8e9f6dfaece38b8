// src/tools/add_act.rs
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::amount::{Amount, VatRate};
use crate::error::OrdError;
use crate::ord::CounterpartyRole;
use crate::server::AppState;
use crate::tools::{parse_params, ToolDescriptor, ToolResult};
use crate::validators;

#[derive(Debug, Deserialize)]
struct Params {
    contract_external_id: String,
    date_act: String,
    date_start: String,
    date_end: String,
    excluding_vat: f64,
    vat_rate: u8,
    client_role: CounterpartyRole,
    contractor_role: CounterpartyRole,
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: "add_act",
        description: "File an act (invoice) for a contract period with the \
                      ORD registry.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "contract_external_id": {
                    "type": "string",
                    "description": "External id of the contract the act belongs to."
                },
                "date_act": {
                    "type": "string",
                    "pattern": "^\\d{4}-\\d{2}-\\d{2}$",
                    "description": "Date the act was issued, YYYY-MM-DD."
                },
                "date_start": {
                    "type": "string",
                    "pattern": "^\\d{4}-\\d{2}-\\d{2}$",
                    "description": "Start of the act period (campaign launch)."
                },
                "date_end": {
                    "type": "string",
                    "pattern": "^\\d{4}-\\d{2}-\\d{2}$",
                    "description": "End of the act period."
                },
                "excluding_vat": {
                    "type": "number",
                    "minimum": 0,
                    "description": "Non-negative ruble sum excluding VAT."
                },
                "vat_rate": {
                    "type": "integer",
                    "enum": [0, 5, 7, 10, 20],
                    "description": "VAT rate in percent."
                },
                "client_role": {
                    "type": "string",
                    "enum": ["advertiser", "agency", "ors", "publisher"],
                    "description": "Role of the client side of the contract."
                },
                "contractor_role": {
                    "type": "string",
                    "enum": ["advertiser", "agency", "ors", "publisher"],
                    "description": "Role of the contractor side of the contract."
                }
            },
            "required": [
                "contract_external_id", "date_act", "date_start", "date_end",
                "excluding_vat", "vat_rate", "client_role", "contractor_role"
            ]
        }),
    }
}

pub async fn run(state: &AppState, arguments: Value) -> Result<ToolResult, OrdError> {
    let params: Params = parse_params(arguments)?;
    info!(
        "filing act for contract {}: {} .. {}",
        params.contract_external_id, params.date_start, params.date_end
    );

    validators::check_act_dates(&params.date_act, &params.date_start, &params.date_end)?;
    validators::check_act_roles(params.client_role, params.contractor_role)?;

    let vat_rate = VatRate::from_percent(params.vat_rate)?;
    let amount = Amount::from_rubles(params.excluding_vat, vat_rate)?;

    let created = state
        .provider
        .add_act(
            &params.contract_external_id,
            &params.date_act,
            &params.date_start,
            &params.date_end,
            &amount,
            params.client_role,
            params.contractor_role,
        )
        .await?;

    let structured = serde_json::to_value(&created)
        .map_err(|err| OrdError::Internal(format!("could not encode tool result: {err}")))?;
    Ok(ToolResult::new(
        structured,
        json!({
            "tool_name": "add_act",
            "contract_external_id": params.contract_external_id,
            "date_act": params.date_act,
            "date_start": params.date_start,
            "date_end": params.date_end,
            "excluding_vat": params.excluding_vat,
            "vat_rate": params.vat_rate,
            "client_role": params.client_role,
            "contractor_role": params.contractor_role,
        }),
    ))
}
