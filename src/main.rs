//! webcore application launcher.
//!
//! ```text
//!   argv ──▶ Bootstrapper ──▶ RuntimeContext ──▶ HttpServer::start(port, cluster)
//!                │                  ▲
//!                ▼                  │
//!           config (clap,      session types,
//!           TOML, validation)  load paths, logger
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use webcore::config::watcher::ConfigWatcher;
use webcore::config::{CliArgs, ConfigError};
use webcore::lifecycle::signals;
use webcore::routing::Router;
use webcore::{BootError, Bootstrapper, HttpServer, RuntimeContext, Shutdown};

#[tokio::main]
async fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().collect();

    let ctx = Arc::new(RuntimeContext::default());
    let sessions = ctx.session_types();
    sessions.register("cookie", "webcore/sessions/cookie.rs", Some("Using signed cookie sessions"));
    sessions.register("memory", "webcore/sessions/memory.rs", None);

    let shutdown = Shutdown::new();
    signals::forward_ctrl_c(shutdown.clone());

    // Parse errors are reported by the bootstrapper; only a readable
    // `--config` gets a watcher.
    let _watcher = match CliArgs::try_parse_from(&argv) {
        Ok(cli) => cli.config_file.clone().and_then(|path| {
            ConfigWatcher::new(&path, ctx.config_handle().clone(), cli)
                .run()
                .map_err(|e| eprintln!("webcore: not watching {}: {e}", path.display()))
                .ok()
        }),
        Err(_) => None,
    };

    let server = HttpServer::new(ctx.clone(), Arc::new(Router::new()), shutdown);
    let mut bootstrapper = Bootstrapper::new(ctx);

    match bootstrapper.start(argv, &server).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(BootError::Configuration(ConfigError::Args(e))) => e.exit(),
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            eprintln!("webcore: {e}");
            ExitCode::FAILURE
        }
    }
}
