//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! argv / config file (TOML) / AppConfig built in code
//!     → args.rs (clap parsing, flag overrides)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → SharedConfig (arc-swap slot read by the runtime context)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → atomic swap into SharedConfig
//!     → next reader observes new config
//! ```
//!
//! # Design Decisions
//! - Readers always take a snapshot; nothing holds a borrow across a reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde, clap) from semantic checks

pub mod args;
pub mod loader;
pub mod schema;
pub mod shared;
pub mod validation;
pub mod watcher;

pub use args::{parse_args, CliArgs, ConfigResolver};
pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, FrameworkPath, ObservabilityConfig};
pub use shared::SharedConfig;
pub use validation::ValidationError;
