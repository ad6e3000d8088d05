//! KDL configuration parsing for TalentFlow.
//!
//! This crate handles parsing of the system configuration (`talentflow.kdl`):
//! - HTTP server bind address
//! - Storage backend selection
//! - Simulated network latency and failure injection
//! - Seed data

pub mod error;
pub mod system;

pub use error::{ConfigError, ConfigResult};
pub use system::{
    NetworkConfig, SeedConfig, ServerConfig, StorageConfig, SystemConfig, load_system_config,
    parse_system_config,
};
