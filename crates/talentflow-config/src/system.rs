//! System configuration parsing.
//!
//! ```kdl
//! server { bind "0.0.0.0:3000" }
//! storage "postgres" url="postgres://talentflow@127.0.0.1/talentflow"
//! network {
//!     min-delay-ms 200
//!     max-delay-ms 1200
//!     failure-rate 0.075
//! }
//! seed jobs=25
//! ```
//!
//! Every node is optional; missing nodes fall back to [`SystemConfig::default`].

use crate::{ConfigError, ConfigResult};
use kdl::{KdlDocument, KdlNode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// System-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SystemConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    /// Simulated network conditions applied at the storage boundary.
    pub network: NetworkConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StorageConfig {
    /// Process-local store, lost on restart.
    #[default]
    Memory,
    Postgres { url: String },
}

/// Latency and failure injected into every storage call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Probability in `[0, 1]` that a call fails.
    pub failure_rate: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 200,
            max_delay_ms: 1200,
            failure_rate: 0.075,
        }
    }
}

impl NetworkConfig {
    /// A network with no delay and no failures.
    pub fn none() -> Self {
        Self {
            min_delay_ms: 0,
            max_delay_ms: 0,
            failure_rate: 0.0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_delay_ms > 0 || self.failure_rate > 0.0
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.min_delay_ms > self.max_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "network.min-delay-ms".to_string(),
                message: format!(
                    "{} is greater than max-delay-ms {}",
                    self.min_delay_ms, self.max_delay_ms
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(ConfigError::InvalidValue {
                field: "network.failure-rate".to_string(),
                message: format!("{} is not between 0 and 1", self.failure_rate),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Number of sample jobs written into an empty store at startup.
    pub jobs: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { jobs: 25 }
    }
}

/// Read and parse a configuration file.
pub fn load_system_config(path: impl AsRef<Path>) -> ConfigResult<SystemConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_system_config(&content)
}

/// Parse system configuration from KDL text.
pub fn parse_system_config(kdl: &str) -> ConfigResult<SystemConfig> {
    let doc: KdlDocument = kdl.parse()?;
    let mut config = SystemConfig::default();
    let mut seen = HashSet::new();

    for node in doc.nodes() {
        let name = node.name().value();
        if !seen.insert(name.to_string()) {
            return Err(ConfigError::Duplicate(name.to_string()));
        }

        match name {
            "server" => config.server = parse_server(node)?,
            "storage" => config.storage = parse_storage(node)?,
            "network" => config.network = parse_network(node)?,
            "seed" => {
                if let Some(jobs) = get_int_prop(node, "jobs") {
                    config.seed.jobs = to_unsigned("seed.jobs", jobs)? as usize;
                }
            }
            _ => {} // Ignore unknown nodes
        }
    }

    config.network.validate()?;
    Ok(config)
}

fn parse_server(node: &KdlNode) -> ConfigResult<ServerConfig> {
    let mut server = ServerConfig::default();
    if let Some(children) = node.children() {
        for child in children.nodes() {
            if child.name().value() == "bind" {
                server.bind = get_first_string_arg(child)
                    .ok_or_else(|| ConfigError::MissingField("server.bind".to_string()))?;
            }
        }
    }
    Ok(server)
}

fn parse_storage(node: &KdlNode) -> ConfigResult<StorageConfig> {
    let backend = get_first_string_arg(node).unwrap_or_else(|| "memory".to_string());

    match backend.as_str() {
        "memory" => Ok(StorageConfig::Memory),
        "postgres" => {
            let url = get_string_prop(node, "url")
                .ok_or_else(|| ConfigError::MissingField("storage url".to_string()))?;
            Ok(StorageConfig::Postgres { url })
        }
        other => Err(ConfigError::InvalidValue {
            field: "storage".to_string(),
            message: format!("unknown storage backend: {}", other),
        }),
    }
}

fn parse_network(node: &KdlNode) -> ConfigResult<NetworkConfig> {
    let mut network = NetworkConfig::default();
    let Some(children) = node.children() else {
        return Ok(network);
    };

    for child in children.nodes() {
        match child.name().value() {
            "min-delay-ms" => {
                network.min_delay_ms = to_unsigned("network.min-delay-ms", required_int(child)?)?;
            }
            "max-delay-ms" => {
                network.max_delay_ms = to_unsigned("network.max-delay-ms", required_int(child)?)?;
            }
            "failure-rate" => {
                network.failure_rate = get_first_number_arg(child).ok_or_else(|| {
                    ConfigError::MissingField("network.failure-rate".to_string())
                })?;
            }
            _ => {}
        }
    }
    Ok(network)
}

fn required_int(node: &KdlNode) -> ConfigResult<i128> {
    get_first_int_arg(node).ok_or_else(|| {
        ConfigError::MissingField(format!("integer value for {}", node.name().value()))
    })
}

fn to_unsigned(field: &str, value: i128) -> ConfigResult<u64> {
    u64::try_from(value).map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        message: format!("{} is not a non-negative integer", value),
    })
}

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_first_int_arg(node: &KdlNode) -> Option<i128> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_integer())
}

/// Accepts both `0.5` and `1` style numbers.
fn get_first_number_arg(node: &KdlNode) -> Option<f64> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| {
            let value = e.value();
            value.as_float().or_else(|| value.as_integer().map(|i| i as f64))
        })
}

fn get_string_prop(node: &KdlNode, name: &str) -> Option<String> {
    node.get(name)
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}

fn get_int_prop(node: &KdlNode, name: &str) -> Option<i128> {
    node.get(name).and_then(|v| v.as_integer())
}
