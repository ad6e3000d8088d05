//! CLI command implementations.

pub mod jobs;
pub mod simulate;

use anyhow::Result;
use talentflow_config::StorageConfig;

pub fn validate(path: &str) -> Result<()> {
    match talentflow_config::load_system_config(path) {
        Ok(config) => {
            println!("Configuration is valid");
            println!("  bind:    {}", config.server.bind);
            let storage = match config.storage {
                StorageConfig::Memory => "memory",
                StorageConfig::Postgres { .. } => "postgres",
            };
            println!("  storage: {}", storage);
            println!(
                "  network: {}-{}ms delay, {:.1}% failures",
                config.network.min_delay_ms,
                config.network.max_delay_ms,
                config.network.failure_rate * 100.0
            );
            println!("  seed:    {} jobs", config.seed.jobs);
            Ok(())
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}
