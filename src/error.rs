//! Crate-level error taxonomy.
//!
//! Nothing in the bootstrap core recovers locally: every failure below
//! surfaces to the caller of `Bootstrapper::start` or of the registry call
//! that produced it.

use thiserror::Error;

use crate::config::ConfigError;
use crate::http::ServerStartError;
use crate::observability::logging::LoggingError;

/// Errors raised by the registries and the startup sequence.
#[derive(Debug, Error)]
pub enum BootError {
    /// A registry key was malformed (e.g. a path type that is not a symbol).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No path was registered for the requested component type.
    #[error("no load path registered for type `{0}`")]
    UnknownPathType(String),

    /// Argument parsing or configuration loading failed.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The server collaborator could not bind or run.
    #[error("server failed to start: {0}")]
    ServerStart(#[from] ServerStartError),

    /// The logging sink could not be opened.
    #[error("logger initialization failed: {0}")]
    Logging(#[from] LoggingError),

    /// `start` was called on a bootstrapper that already ran.
    #[error("bootstrapper has already been started")]
    AlreadyStarted,
}

/// Result type for bootstrap operations.
pub type BootResult<T> = Result<T, BootError>;
