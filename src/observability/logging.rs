//! Structured logging.
//!
//! # Responsibilities
//! - Install the global `tracing` subscriber for the resolved log target
//! - Hand back a handle describing the active sink
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - File targets append, without ANSI colors, creating parent directories
//! - A second installation is not an error; the handle reports it

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::runtime::LogTarget;

/// Error type for logger initialization.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug)]
struct LoggerInner {
    target: LogTarget,
    level: String,
    installed: bool,
}

/// Shared reference to the active logging sink.
#[derive(Debug, Clone)]
pub struct LoggerHandle {
    inner: Arc<LoggerInner>,
}

impl LoggerHandle {
    pub fn target(&self) -> &LogTarget {
        &self.inner.target
    }

    pub fn level(&self) -> &str {
        &self.inner.level
    }

    /// Whether this handle's initialization installed the global subscriber.
    pub fn installed(&self) -> bool {
        self.inner.installed
    }
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("webcore={level},tower_http={level}")))
}

/// Initialize logging to `target` at `level`.
pub fn init(target: &LogTarget, level: &str) -> Result<LoggerHandle, LoggingError> {
    let result = match target {
        LogTarget::Stdout => tracing_subscriber::registry()
            .with(filter(level))
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
        LogTarget::File(path) => {
            let open_err = |source| LoggingError::Open {
                path: path.clone(),
                source,
            };
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir).map_err(open_err)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(open_err)?;
            tracing_subscriber::registry()
                .with(filter(level))
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
    };

    let installed = match result {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "Global subscriber already set, keeping it");
            false
        }
    };

    tracing::info!(log_target = %target, level, "Logger initialized");

    Ok(LoggerHandle {
        inner: Arc::new(LoggerInner {
            target: target.clone(),
            level: level.to_string(),
            installed,
        }),
    })
}
