//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for an
//! application process. All types derive Serde traits for deserialization
//! from config files.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root configuration for an application process.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Runtime environment name (development, production, test, ...).
    pub environment: String,

    /// Application root directory.
    #[serde(alias = "merb_root")]
    pub root: Option<PathBuf>,

    /// Interface the server binds to.
    pub host: String,

    /// First port the server binds to.
    pub port: u16,

    /// Number of cluster nodes; each node takes the next consecutive port.
    pub cluster: Option<u16>,

    /// Explicit log file path.
    pub log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Run detached from the terminal.
    pub daemonize: bool,

    /// Test mode: logs go to the fixed test log file.
    pub testing: bool,

    /// Name of the session type the application wants to use.
    pub session_store: Option<String>,

    /// Application layout: component type -> directory (relative to root).
    pub framework: IndexMap<String, FrameworkPath>,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            root: None,
            host: "0.0.0.0".to_string(),
            port: 4000,
            cluster: None,
            log_file: None,
            log_level: "info".to_string(),
            daemonize: false,
            testing: false,
            session_store: None,
            framework: default_framework(),
            request_timeout_secs: 30,
            observability: ObservabilityConfig::default(),
        }
    }
}

/// One entry of the application layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FrameworkPath {
    /// Directory, relative to the application root unless absolute.
    pub dir: PathBuf,

    /// File glob; the registry default applies when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glob: Option<String>,
}

impl FrameworkPath {
    fn new(dir: &str) -> Self {
        Self {
            dir: PathBuf::from(dir),
            glob: None,
        }
    }
}

fn default_framework() -> IndexMap<String, FrameworkPath> {
    let mut layout = IndexMap::new();
    layout.insert("model".to_string(), FrameworkPath::new("app/models"));
    layout.insert("controller".to_string(), FrameworkPath::new("app/controllers"));
    layout.insert("helper".to_string(), FrameworkPath::new("app/helpers"));
    layout.insert(
        "view".to_string(),
        FrameworkPath {
            dir: PathBuf::from("app/views"),
            glob: Some("**/*.html".to_string()),
        },
    );
    layout.insert("mailer".to_string(), FrameworkPath::new("app/mailers"));
    layout.insert("lib".to_string(), FrameworkPath::new("lib"));
    layout.insert("config".to_string(), FrameworkPath::new("config"));
    layout
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
