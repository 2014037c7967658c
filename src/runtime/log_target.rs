//! Log destination resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;

/// File name used in test mode, under the log directory.
pub const TEST_LOG_FILE: &str = "app_test.log";

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// The console stream.
    Stdout,
    /// Append to a file.
    File(PathBuf),
}

impl fmt::Display for LogTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogTarget::Stdout => f.write_str("STDOUT"),
            LogTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Precedence, first match wins:
/// 1. explicit `log_file`
/// 2. test mode: `<log_dir>/app_test.log`
/// 3. neither daemonized nor clustered: stdout
/// 4. otherwise: `<log_dir>/app.<port>.log`
pub(crate) fn resolve(config: &AppConfig, log_dir: &Path) -> LogTarget {
    if let Some(file) = &config.log_file {
        LogTarget::File(file.clone())
    } else if config.testing {
        LogTarget::File(log_dir.join(TEST_LOG_FILE))
    } else if !(config.daemonize || config.cluster.is_some()) {
        LogTarget::Stdout
    } else {
        LogTarget::File(log_dir.join(format!("app.{}.log", config.port)))
    }
}
