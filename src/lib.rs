// src/lib.rs
pub mod amount;
pub mod config;
pub mod error;
pub mod ord;
pub mod rpc;
pub mod server;
pub mod tools;
pub mod validators;

// Re-export the main entry points so they appear at crate root
pub use crate::config::Config;
pub use crate::error::OrdError;
pub use crate::ord::VkClient;
