// src/ord/mod.rs
pub mod api;
pub mod api_error;
pub mod types;
pub mod vk;

// Re-export the client surface for convenience
pub use api::{provider_for, OrdProvider};
pub use types::{
    ActCreated, ContractCreated, ContractKind, CounterpartyCreated, CounterpartyRole,
    CounterpartyType, CreativeCreated, CreativeForm, JuridicalDetails, SubjectType,
};
pub use vk::VkClient;
