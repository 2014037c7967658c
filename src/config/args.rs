//! Command-line argument parsing.
//!
//! Raw arguments become an [`AppConfig`] in two layers: an optional config
//! file provides the base, then every flag that was given overrides it.

use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser};

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::AppConfig;
use crate::config::validation::validate_config;
use crate::runtime::sessions::SessionTypeRegistry;

/// Applies overrides on top of an already loaded configuration.
///
/// Only values that were actually supplied are written; everything else
/// keeps what the base configuration says.
pub trait ConfigResolver {
    fn apply(&self, config: &mut AppConfig);
}

/// Flags accepted by the application binary.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "webcore", version, about = "Boot a webcore application")]
pub struct CliArgs {
    /// TOML configuration file used as the base configuration
    #[arg(short = 'C', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Runtime environment (development, production, test, ...)
    #[arg(short, long, value_name = "ENV")]
    pub environment: Option<String>,

    /// Application root directory
    #[arg(short = 'm', long = "root", visible_alias = "merb-root", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Interface to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// First port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Number of cluster nodes, one per consecutive port
    #[arg(short = 'c', long = "cluster-nodes", value_name = "N")]
    pub cluster: Option<u16>,

    /// Log file path
    #[arg(short = 'L', long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Run as a daemon
    #[arg(short, long)]
    pub daemonize: bool,

    /// Session store to use
    #[arg(short, long, value_name = "NAME")]
    pub session_store: Option<String>,

    #[arg(long, hide = true)]
    pub testing: bool,
}

impl ConfigResolver for CliArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(environment) = &self.environment {
            config.environment = environment.clone();
        }
        if let Some(root) = &self.root {
            config.root = Some(root.clone());
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(cluster) = self.cluster {
            config.cluster = Some(cluster);
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if self.daemonize {
            config.daemonize = true;
        }
        if let Some(store) = &self.session_store {
            config.session_store = Some(store.clone());
        }
        if self.testing {
            config.testing = true;
        }
    }
}

/// Help text for `--session-store`, listing registered types in order.
fn session_store_help(sessions: &SessionTypeRegistry) -> String {
    let names = sessions.names();
    if names.is_empty() {
        "Session store to use".to_string()
    } else {
        format!("Session store to use [registered: {}]", names.join(", "))
    }
}

/// Parse a raw argument vector (program name first) into a configuration.
pub fn parse_args<I, T>(argv: I, sessions: &SessionTypeRegistry) -> Result<AppConfig, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = CliArgs::command()
        .mut_arg("session_store", |arg| arg.help(session_store_help(sessions)))
        .try_get_matches_from(argv)?;
    let args = CliArgs::from_arg_matches(&matches)?;

    let mut config = match &args.config_file {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    args.apply(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(
        environment = %config.environment,
        port = config.port,
        config_file = ?args.config_file,
        "Arguments parsed"
    );
    Ok(config)
}
