//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (cluster size, port span)
//! - Check layout keys are usable as path types
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use crate::config::schema::AppConfig;
use crate::runtime::paths::is_symbol;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("environment must not be empty")]
    EmptyEnvironment,

    #[error("host must not be empty")]
    EmptyHost,

    #[error("cluster size must be at least 1")]
    EmptyCluster,

    #[error("port {port} with {nodes} cluster nodes exceeds the port range")]
    PortRange { port: u16, nodes: u16 },

    #[error("unknown log level `{0}`")]
    LogLevel(String),

    #[error("framework key `{0}` is not a valid path type")]
    FrameworkKey(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.environment.trim().is_empty() {
        errors.push(ValidationError::EmptyEnvironment);
    }
    if config.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }

    match config.cluster {
        Some(0) => errors.push(ValidationError::EmptyCluster),
        Some(nodes) if u32::from(config.port) + u32::from(nodes) - 1 > u32::from(u16::MAX) => {
            errors.push(ValidationError::PortRange {
                port: config.port,
                nodes,
            });
        }
        _ => {}
    }

    if config.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::LogLevel(config.log_level.clone()));
    }

    for key in config.framework.keys() {
        if !is_symbol(key) {
            errors.push(ValidationError::FrameworkKey(key.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
