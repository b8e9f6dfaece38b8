// src/ord/vk.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::amount::Amount;
use crate::error::OrdError;
use crate::ord::api::OrdProvider;
use crate::ord::api_error::format_rejection;
use crate::ord::types::{
    ActCreated, ContractCreated, ContractKind, CounterpartyCreated, CounterpartyRole,
    CreativeCreated, CreativeForm, JuridicalDetails, SubjectType,
};

/// VK ORD sandbox endpoint.
pub const SANDBOX_BASE_URL: &str = "https://api-sandbox.ord.vk.com";

/// Each inbound request maps to one outbound call, bounded by this timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the VK ad data operator.
///
/// Entities are created with `PUT` against an external id generated on
/// our side, so a submission carries its id back to the caller even
/// before the registry responds.
pub struct VkClient {
    client: Client,
    auth_key: String,
    base_url: String,
}

impl VkClient {
    pub fn new(auth_key: impl Into<String>) -> Result<Self, OrdError> {
        Self::with_base_url(auth_key, SANDBOX_BASE_URL)
    }

    /// Build a client against a non-default registry endpoint.
    pub fn with_base_url(
        auth_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, OrdError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            auth_key: auth_key.into(),
            base_url: base_url.into(),
        })
    }

    /// Generate an external id for a new entity.
    ///
    /// 19 hex chars of a v4 UUID split 11-8, e.g. `rajs3fu1698-1h5a50m5`.
    pub fn generate_external_id() -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("{}-{}", &hex[..11], &hex[11..19])
    }

    /// PUT a JSON payload, returning the response status and raw body.
    async fn put_json(&self, url: &str, payload: &Value) -> Result<(StatusCode, String), OrdError> {
        debug!("PUT {url}");
        let response = self
            .client
            .put(url)
            .header("Authorization", format!("Bearer {}", self.auth_key))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("registry responded with status {status}");
        Ok((status, body))
    }

    /// Map a non-success registry status to the matching error variant.
    fn check_status(status: StatusCode, body: &str) -> Result<(), OrdError> {
        if status.is_success() {
            return Ok(());
        }
        match status {
            StatusCode::UNAUTHORIZED => {
                error!("registry rejected the API key");
                Err(OrdError::Unauthorized)
            }
            StatusCode::FORBIDDEN => {
                warn!("registry denied access: {body}");
                Err(OrdError::Forbidden(
                    "check the permissions of the configured key".into(),
                ))
            }
            StatusCode::BAD_REQUEST => {
                let detail = format_rejection(body);
                warn!("registry rejected the payload: {detail}");
                Err(OrdError::Rejected {
                    status: status.as_u16(),
                    detail,
                })
            }
            other => {
                error!("registry error {other}: {body}");
                Err(OrdError::Rejected {
                    status: other.as_u16(),
                    detail: body.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl OrdProvider for VkClient {
    async fn add_counterparty(
        &self,
        name: &str,
        roles: &[CounterpartyRole],
        juridical_details: JuridicalDetails,
    ) -> Result<CounterpartyCreated, OrdError> {
        let counterparty_id = Self::generate_external_id();
        let url = format!("{}/v1/person/{}", self.base_url, counterparty_id);

        let payload = json!({
            "name": name,
            "roles": roles,
            "juridical_details": juridical_details,
        });

        let (status, body) = self.put_json(&url, &payload).await?;
        Self::check_status(status, &body)?;

        info!("counterparty registered: {counterparty_id}");
        Ok(CounterpartyCreated {
            counterparty_id,
            status_code: status.as_u16(),
        })
    }

    async fn add_contract(
        &self,
        kind: ContractKind,
        client_external_id: &str,
        contractor_external_id: &str,
        date: &str,
        subject_type: SubjectType,
    ) -> Result<ContractCreated, OrdError> {
        let contract_id = Self::generate_external_id();
        let url = format!("{}/v1/contract/{}", self.base_url, contract_id);

        let payload = json!({
            "type": kind,
            "client_external_id": client_external_id,
            "contractor_external_id": contractor_external_id,
            "date": date,
            "subject_type": subject_type,
        });

        let (status, body) = self.put_json(&url, &payload).await?;
        Self::check_status(status, &body)?;

        info!("contract filed: {contract_id}");
        Ok(ContractCreated {
            contract_id,
            status_code: status.as_u16(),
        })
    }

    async fn add_creative(
        &self,
        kktus: &[String],
        form: CreativeForm,
        texts: &[String],
        contract_external_ids: &[String],
    ) -> Result<CreativeCreated, OrdError> {
        let creative_id = Self::generate_external_id();
        let url = format!("{}/v3/creative/{}", self.base_url, creative_id);

        let payload = json!({
            "kktus": kktus,
            "form": form,
            "texts": texts,
            "contract_external_ids": contract_external_ids,
        });

        let (status, body) = self.put_json(&url, &payload).await?;
        Self::check_status(status, &body)?;

        // The erid marker comes back in the creation response.
        let erid = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| value.get("erid").and_then(Value::as_str).map(String::from));

        info!("creative registered: {creative_id}, erid: {erid:?}");
        Ok(CreativeCreated {
            erid,
            creative_id,
            status_code: status.as_u16(),
        })
    }

    async fn add_act(
        &self,
        contract_external_id: &str,
        date: &str,
        date_start: &str,
        date_end: &str,
        amount: &Amount,
        client_role: CounterpartyRole,
        contractor_role: CounterpartyRole,
    ) -> Result<ActCreated, OrdError> {
        let act_id = Self::generate_external_id();
        let url = format!("{}/v4/invoice/{}", self.base_url, act_id);

        let payload = json!({
            "contract_external_id": contract_external_id,
            "date": date,
            "date_start": date_start,
            "date_end": date_end,
            "amount": amount,
            "client_role": client_role,
            "contractor_role": contractor_role,
        });

        let (status, body) = self.put_json(&url, &payload).await?;
        Self::check_status(status, &body)?;

        info!("act filed: {act_id}");
        Ok(ActCreated {
            act_id,
            status_code: status.as_u16(),
        })
    }
}
