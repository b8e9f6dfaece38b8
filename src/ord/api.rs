// src/ord/api.rs
use std::sync::Arc;

use async_trait::async_trait;

use crate::amount::Amount;
use crate::config::{Config, Provider};
use crate::error::OrdError;
use crate::ord::types::{
    ActCreated, ContractCreated, ContractKind, CounterpartyCreated, CounterpartyRole,
    CreativeCreated, CreativeForm, JuridicalDetails, SubjectType,
};
use crate::ord::vk::VkClient;

/// Contract every ORD backend implements.
///
/// Four operations: create a counterparty, a contract, a creative and an
/// act. Each maps to exactly one outbound call.
#[async_trait]
pub trait OrdProvider: Send + Sync {
    /// Register a counterparty, returning the locally generated external id.
    async fn add_counterparty(
        &self,
        name: &str,
        roles: &[CounterpartyRole],
        juridical_details: JuridicalDetails,
    ) -> Result<CounterpartyCreated, OrdError>;

    /// File a contract between two previously registered counterparties.
    async fn add_contract(
        &self,
        kind: ContractKind,
        client_external_id: &str,
        contractor_external_id: &str,
        date: &str,
        subject_type: SubjectType,
    ) -> Result<ContractCreated, OrdError>;

    /// Register an advertising creative and obtain its erid marker.
    async fn add_creative(
        &self,
        kktus: &[String],
        form: CreativeForm,
        texts: &[String],
        contract_external_ids: &[String],
    ) -> Result<CreativeCreated, OrdError>;

    /// File an act (invoice) for a contract period.
    #[allow(clippy::too_many_arguments)]
    async fn add_act(
        &self,
        contract_external_id: &str,
        date: &str,
        date_start: &str,
        date_end: &str,
        amount: &Amount,
        client_role: CounterpartyRole,
        contractor_role: CounterpartyRole,
    ) -> Result<ActCreated, OrdError>;
}

/// Build the backend selected by the configuration.
pub fn provider_for(config: &Config) -> Result<Arc<dyn OrdProvider>, OrdError> {
    match config.provider {
        Provider::Vk => Ok(Arc::new(VkClient::new(config.api_key.clone())?)),
    }
}
