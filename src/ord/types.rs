// src/ord/types.rs
//! Wire types shared by every ORD backend. Field and variant names follow
//! the registry's JSON schema.

use serde::{Deserialize, Serialize};

/// Role a counterparty can play in the reporting chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterpartyRole {
    Advertiser,
    Agency,
    Ors,
    Publisher,
}

/// Legal form of a counterparty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterpartyType {
    Physical,
    Juridical,
    Ip,
    ForeignPhysical,
    ForeignJuridical,
}

/// Legal identity block sent with a counterparty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JuridicalDetails {
    #[serde(rename = "type")]
    pub kind: CounterpartyType,
    pub inn: String,
}

/// Contract kind. The reporting flow only files service contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    Service,
}

/// Subject of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    Representation,
    OrgDistribution,
    Mediation,
    Distribution,
    Other,
}

/// Form of a creative. Only text blocks are filed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreativeForm {
    TextBlock,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterpartyCreated {
    pub counterparty_id: String,
    pub status_code: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractCreated {
    pub contract_id: String,
    pub status_code: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeCreated {
    /// Marker token issued by the registry for the creative, if any.
    pub erid: Option<String>,
    pub creative_id: String,
    pub status_code: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActCreated {
    pub act_id: String,
    pub status_code: u16,
}
