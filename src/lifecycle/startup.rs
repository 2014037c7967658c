//! Startup orchestration.
//!
//! # States
//! ```text
//! Unconfigured ──start(args)──▶ Configured ──▶ RootResolved ──▶ Running
//! ```
//! - Unconfigured → Configured: raw arguments are parsed (or a ready
//!   `AppConfig` is taken as is), validated, and published to the context
//! - Configured → RootResolved: environment and root are copied into the
//!   context
//! - RootResolved → Running: the layout is registered, logging is set up,
//!   and the server takes over with `(port, cluster)`
//!
//! # Design Decisions
//! - Fail fast: any startup error is returned to the caller of `start`
//! - No retries and no restart in place: a bootstrapper starts once
//! - Listeners are bound last, after every other step succeeded

use std::sync::Arc;

use crate::config::validation::validate_config;
use crate::config::{parse_args, AppConfig, ConfigError};
use crate::error::{BootError, BootResult};
use crate::http::Server;
use crate::observability::logging;
use crate::runtime::paths::under_root;
use crate::runtime::RuntimeContext;

/// Startup progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    Unconfigured,
    Configured,
    RootResolved,
    Running,
}

/// What `start` is given: raw arguments or a ready configuration.
#[derive(Debug, Clone)]
pub enum StartArgs {
    /// Raw argument vector, program name first.
    Argv(Vec<String>),
    /// Structured configuration, used without argument parsing. It still
    /// goes through the same semantic validation as parsed arguments, so an
    /// invalid value fails with `ConfigError::Validation`.
    Config(AppConfig),
}

impl From<AppConfig> for StartArgs {
    fn from(config: AppConfig) -> Self {
        StartArgs::Config(config)
    }
}

impl From<Vec<String>> for StartArgs {
    fn from(argv: Vec<String>) -> Self {
        StartArgs::Argv(argv)
    }
}

/// Single-shot startup sequence for one process.
pub struct Bootstrapper {
    ctx: Arc<RuntimeContext>,
    state: BootState,
    started: bool,
    install_logger: bool,
}

impl Bootstrapper {
    pub fn new(ctx: Arc<RuntimeContext>) -> Self {
        Self {
            ctx,
            state: BootState::Unconfigured,
            started: false,
            install_logger: true,
        }
    }

    /// Skip logger installation, for embedding in a process that already
    /// configured `tracing`.
    pub fn without_logger(mut self) -> Self {
        self.install_logger = false;
        self
    }

    pub fn state(&self) -> BootState {
        self.state
    }

    pub fn context(&self) -> &Arc<RuntimeContext> {
        &self.ctx
    }

    /// Run the startup sequence and hand control to `server`.
    ///
    /// Returns once the server stops, or with the first error.
    pub async fn start<S: Server>(&mut self, args: impl Into<StartArgs>, server: &S) -> BootResult<()> {
        if self.started {
            return Err(BootError::AlreadyStarted);
        }
        self.started = true;

        let config = self.configure(args.into())?;
        self.resolve_root(&config);
        self.register_layout(&config)?;
        self.init_logger(&config)?;
        self.check_session_store(&config);

        self.state = BootState::Running;
        tracing::info!(
            port = config.port,
            cluster = ?config.cluster,
            "Handing control to server"
        );
        server.start(config.port, config.cluster).await?;
        Ok(())
    }

    fn configure(&mut self, args: StartArgs) -> BootResult<Arc<AppConfig>> {
        let mut config = match args {
            StartArgs::Argv(argv) => parse_args(argv, self.ctx.session_types())?,
            StartArgs::Config(config) => {
                validate_config(&config).map_err(ConfigError::Validation)?;
                config
            }
        };
        if self.ctx.is_flat() {
            config.framework.clear();
        }

        self.ctx.config_handle().store(config);
        self.state = BootState::Configured;
        Ok(self.ctx.config())
    }

    fn resolve_root(&mut self, config: &AppConfig) {
        self.ctx.set_environment(config.environment.clone());
        if let Some(root) = &config.root {
            self.ctx.set_root(root.clone());
        }
        self.state = BootState::RootResolved;
        tracing::info!(
            environment = %config.environment,
            root = %self.ctx.root().display(),
            "Runtime context configured"
        );
    }

    fn register_layout(&self, config: &AppConfig) -> BootResult<()> {
        if self.ctx.is_flat() {
            return Ok(());
        }
        let root = self.ctx.root();
        let paths = self.ctx.paths();
        for (kind, entry) in &config.framework {
            let dir = under_root(&root, &entry.dir);
            match &entry.glob {
                Some(glob) => paths.register_with_glob(kind, dir, glob.as_str())?,
                None => paths.register(kind, dir)?,
            }
        }
        Ok(())
    }

    fn init_logger(&self, config: &AppConfig) -> BootResult<()> {
        if !self.install_logger {
            return Ok(());
        }
        let handle = logging::init(&self.ctx.log_target(), &config.log_level)?;
        self.ctx.set_logger(handle);
        Ok(())
    }

    fn check_session_store(&self, config: &AppConfig) {
        let Some(name) = &config.session_store else {
            return;
        };
        match self.ctx.session_types().get(name) {
            Some(info) => tracing::info!(session_store = %name, file = %info.file, "{}", info.description),
            None => tracing::warn!(
                session_store = %name,
                registered = ?self.ctx.session_types().names(),
                "Configured session store is not registered"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ServerStartError;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(u16, Option<u16>)>>,
    }

    impl Server for Recorder {
        async fn start(&self, port: u16, cluster: Option<u16>) -> Result<(), ServerStartError> {
            self.calls.lock().unwrap().push((port, cluster));
            Ok(())
        }
    }

    fn bootstrapper() -> Bootstrapper {
        Bootstrapper::new(Arc::new(RuntimeContext::default())).without_logger()
    }

    #[tokio::test]
    async fn test_states_advance_to_running() {
        let mut boot = bootstrapper();
        assert_eq!(boot.state(), BootState::Unconfigured);

        boot.start(AppConfig::default(), &Recorder::default()).await.unwrap();
        assert_eq!(boot.state(), BootState::Running);
    }

    #[tokio::test]
    async fn test_layout_registered_under_root() {
        let mut config = AppConfig::default();
        config.root = Some("/srv/app".into());
        let mut boot = bootstrapper();
        boot.start(config, &Recorder::default()).await.unwrap();

        let paths = boot.context().paths();
        assert_eq!(
            paths.directory_for("controller").unwrap(),
            PathBuf::from("/srv/app/app/controllers")
        );
        assert_eq!(paths.glob_for("view").unwrap(), "**/*.html");
        assert_eq!(paths.glob_for("model").unwrap(), crate::runtime::DEFAULT_GLOB);
    }

    #[tokio::test]
    async fn test_invalid_config_stops_before_server() {
        let mut config = AppConfig::default();
        config.cluster = Some(0);
        let server = Recorder::default();
        let mut boot = bootstrapper();

        let err = boot.start(config, &server).await.unwrap_err();
        assert!(matches!(err, BootError::Configuration(ConfigError::Validation(_))));
        assert_eq!(boot.state(), BootState::Unconfigured);
        assert!(server.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_start_is_rejected() {
        let mut boot = bootstrapper();
        let server = Recorder::default();
        boot.start(AppConfig::default(), &server).await.unwrap();

        let err = boot.start(AppConfig::default(), &server).await.unwrap_err();
        assert!(matches!(err, BootError::AlreadyStarted));
        assert_eq!(server.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_flat_mode_skips_layout() {
        let ctx = Arc::new(RuntimeContext::default());
        ctx.flat(&crate::routing::Router::new(), |_| {});
        let mut boot = Bootstrapper::new(ctx.clone()).without_logger();

        boot.start(AppConfig::default(), &Recorder::default()).await.unwrap();
        assert!(ctx.paths().is_empty());
        assert!(ctx.config().framework.is_empty());
    }
}
