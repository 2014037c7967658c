//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Application setup:
//!     Router::prepare(|r| custom routes, then default routes)
//!     → RouteBuilder collects routes in order
//!     → swapped in as the live route set
//!
//! Incoming Request (path)
//!     → router.rs (route lookup)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: matched route name or no match
//! ```
//!
//! # Design Decisions
//! - Deterministic: same input always matches same route
//! - First match wins (registration order)

pub mod matcher;
pub mod router;

pub use router::{Route, RouteBuilder, Router, DEFAULT_ROUTE};
