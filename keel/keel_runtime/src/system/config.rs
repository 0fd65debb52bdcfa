//! Configuration for the bootstrap orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Host OS identifier used to slice the manifest
    #[serde(default = "default_os_id")]
    pub os_id: String,

    /// File stem identifying the main/bootstrap module, which is never
    /// self-loaded
    #[serde(default = "default_main_module_stem")]
    pub main_module_stem: String,

    /// Number of job-system worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Worker task queue capacity
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
}

fn default_os_id() -> String {
    std::env::consts::OS.to_string()
}

fn default_main_module_stem() -> String {
    "main_module".to_string()
}

fn default_workers() -> usize {
    num_cpus_fallback()
}

fn default_queue_size() -> usize {
    256
}

// The concurrency crate owns the real num_cpus dependency; the config
// default only needs a sane floor when used standalone.
fn num_cpus_fallback() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            os_id: default_os_id(),
            main_module_stem: default_main_module_stem(),
            workers: default_workers(),
            queue_size: default_queue_size(),
        }
    }
}

impl OrchestratorConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.os_id.is_empty() {
            return Err(ConfigError::Invalid("os_id cannot be empty".to_string()));
        }
        if self.main_module_stem.is_empty() {
            return Err(ConfigError::Invalid(
                "main_module_stem cannot be empty".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers cannot be zero".to_string()));
        }
        if self.queue_size == 0 {
            return Err(ConfigError::Invalid("queue_size cannot be zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.os_id, std::env::consts::OS);
        assert_eq!(config.main_module_stem, "main_module");
        assert!(config.workers >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_os() {
        let config = OrchestratorConfig {
            os_id: String::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
