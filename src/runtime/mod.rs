//! Shared runtime state.
//!
//! # Data Flow
//! ```text
//! Bootstrapper
//!     → context.rs (environment, root, logger, frozen flag)
//!     → paths.rs (component type → directory + glob)
//!     → sessions.rs (session type name → implementation file)
//!
//! Readers (autoloader, session manager, server):
//!     → Arc<RuntimeContext> handed to them at construction
//! ```
//!
//! # Design Decisions
//! - No ambient globals: the context is passed explicitly
//! - Registries are internally synchronized so plugins may register from
//!   any thread during initialization
//! - Root and log target are computed on read from the latest config

pub mod context;
pub mod log_target;
pub mod paths;
pub mod sessions;

pub use context::RuntimeContext;
pub use log_target::LogTarget;
pub use paths::{PathEntry, PathRegistry, PathType, DEFAULT_GLOB};
pub use sessions::{SessionTypeInfo, SessionTypeRegistry};
