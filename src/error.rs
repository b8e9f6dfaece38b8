// src/error.rs
use thiserror::Error;

use crate::rpc;

/// Central error type for the reporting gateway.
///
/// Each variant maps to one class of failure from the spec: bad
/// configuration, bad caller input, or an upstream problem talking to
/// the ORD registry.
#[derive(Error, Debug)]
pub enum OrdError {
    /// Required configuration absent or malformed, fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Caller input rejected before any outbound call.
    #[error("{0}")]
    Validation(String),

    /// Registry returned 401, the configured key is not accepted.
    #[error("invalid API key, check the ORD_API_KEY environment variable")]
    Unauthorized,

    /// Registry returned 403.
    #[error("access denied by the registry: {0}")]
    Forbidden(String),

    /// Registry rejected the request with a non-success status.
    #[error("registry rejected the request ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// Transport failure reaching the registry (connect, timeout).
    #[error("network error reaching the registry: {0}")]
    Network(#[from] reqwest::Error),

    /// Registry replied with a body we could not decode.
    #[error("could not decode registry response: {0}")]
    UpstreamDecode(#[from] serde_json::Error),

    /// Local failure assembling a response, nothing to do with upstream.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, OrdError>;

impl OrdError {
    /// JSON-RPC error code the inbound endpoint reports for this failure.
    ///
    /// Validation failures and registry rejections of the payload surface
    /// as invalid-params, everything else as an execution error.
    pub fn rpc_code(&self) -> i64 {
        match self {
            OrdError::Validation(_)
            | OrdError::Config(_)
            | OrdError::Unauthorized
            | OrdError::Forbidden(_) => rpc::INVALID_PARAMS,
            OrdError::Rejected { status, .. } if *status == 400 => rpc::INVALID_PARAMS,
            _ => rpc::INTERNAL_ERROR,
        }
    }
}
