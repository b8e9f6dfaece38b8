// src/tools/add_advertising.rs
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::OrdError;
use crate::ord::CreativeForm;
use crate::server::AppState;
use crate::tools::{parse_params, ToolDescriptor, ToolResult};
use crate::validators;

#[derive(Debug, Deserialize)]
struct Params {
    kktus: Vec<String>,
    texts: Vec<String>,
    contract_external_ids: Vec<String>,
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: "add_advertising",
        description: "Register a text advertising creative with the ORD \
                      registry and obtain its erid marker.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "kktus": {
                    "type": "array",
                    "items": {"type": "string", "pattern": "^\\d+\\.\\d+\\.\\d+$"},
                    "minItems": 1,
                    "maxItems": 16,
                    "description": "KKTU codes of the advertised goods or services, \
                                    e.g. \"1.1.1\". One for plain creatives, up to 16 \
                                    for co-branded ones."
                },
                "texts": {
                    "type": "array",
                    "items": {"type": "string", "minLength": 1},
                    "minItems": 1,
                    "description": "Creative texts, at most 65000 characters in total."
                },
                "contract_external_ids": {
                    "type": "array",
                    "items": {"type": "string"},
                    "minItems": 1,
                    "description": "External ids of the contracts the creative belongs to."
                }
            },
            "required": ["kktus", "texts", "contract_external_ids"]
        }),
    }
}

pub async fn run(state: &AppState, arguments: Value) -> Result<ToolResult, OrdError> {
    let params: Params = parse_params(arguments)?;
    info!(
        "registering creative: {} kktu codes, {} texts",
        params.kktus.len(),
        params.texts.len()
    );

    validators::check_kktu_codes(&params.kktus)?;
    validators::check_creative_texts(&params.texts)?;
    if params.contract_external_ids.is_empty() {
        return Err(OrdError::Validation(
            "at least one contract external id is required".into(),
        ));
    }

    let created = state
        .provider
        .add_creative(
            &params.kktus,
            CreativeForm::TextBlock,
            &params.texts,
            &params.contract_external_ids,
        )
        .await?;

    let structured = serde_json::to_value(&created)
        .map_err(|err| OrdError::Internal(format!("could not encode tool result: {err}")))?;
    Ok(ToolResult::new(
        structured,
        json!({
            "tool_name": "add_advertising",
            "kktus": params.kktus,
            "texts": params.texts,
            "contract_external_ids": params.contract_external_ids,
        }),
    ))
}
