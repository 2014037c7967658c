//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};

use webcore::http::{Server, ServerStartError};
use webcore::{Bootstrapper, RuntimeContext};

/// A server that records how it was started and returns immediately.
#[derive(Default)]
pub struct RecordingServer {
    pub calls: Mutex<Vec<(u16, Option<u16>)>>,
    pub fail_with_bind: bool,
}

impl RecordingServer {
    pub fn failing() -> Self {
        Self {
            fail_with_bind: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(u16, Option<u16>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Server for RecordingServer {
    async fn start(&self, port: u16, cluster: Option<u16>) -> Result<(), ServerStartError> {
        self.calls.lock().unwrap().push((port, cluster));
        if self.fail_with_bind {
            return Err(ServerStartError::Bind {
                addr: format!("0.0.0.0:{port}"),
                source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
            });
        }
        Ok(())
    }
}

/// A bootstrapper over a fresh context, without touching global logging.
pub fn bootstrapper() -> (Arc<RuntimeContext>, Bootstrapper) {
    let ctx = Arc::new(RuntimeContext::default());
    let boot = Bootstrapper::new(ctx.clone()).without_logger();
    (ctx, boot)
}

/// Argument vector with the program name prepended.
pub fn argv(args: &[&str]) -> Vec<String> {
    std::iter::once("webcore")
        .chain(args.iter().copied())
        .map(String::from)
        .collect()
}
