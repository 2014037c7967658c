//! Bootstrap and registry core for the webcore application framework.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod runtime;

pub use config::AppConfig;
pub use error::{BootError, BootResult};
pub use http::{HttpServer, Server};
pub use lifecycle::{Bootstrapper, Shutdown, StartArgs};
pub use runtime::RuntimeContext;
