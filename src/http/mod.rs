//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrapper → Server::start(port, cluster)
//!     → server.rs (bind one listener per node, Axum setup)
//!     → request.rs (add request ID)
//!     → routing::Router (match path to route)
//!     → JSON description of the match, or 404
//! ```

pub mod request;
pub mod server;

pub use request::{RequestId, RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use server::{HttpServer, Server, ServerStartError};
