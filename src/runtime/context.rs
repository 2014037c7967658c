//! Process-wide runtime context.
//!
//! One `RuntimeContext` is built at startup and shared by `Arc` with every
//! component that needs the root, the environment, the logger or the
//! registries. Tests build as many independent contexts as they like.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::config::{AppConfig, SharedConfig};
use crate::observability::logging::LoggerHandle;
use crate::routing::{RouteBuilder, Router};
use crate::runtime::log_target::{self, LogTarget};
use crate::runtime::paths::PathRegistry;
use crate::runtime::sessions::SessionTypeRegistry;

/// Namespaces consulted, in order, when resolving generator templates.
pub const DEFAULT_GENERATOR_SCOPE: [&str; 3] = ["webcore_default", "webcore", "tests"];

/// Shared bootstrap state.
#[derive(Debug)]
pub struct RuntimeContext {
    config: SharedConfig,
    root: RwLock<Option<PathBuf>>,
    environment: RwLock<String>,
    logger: RwLock<Option<LoggerHandle>>,
    frozen: AtomicBool,
    flat: AtomicBool,
    generator_scope: RwLock<Vec<String>>,
    load_paths: PathRegistry,
    session_types: SessionTypeRegistry,
}

impl RuntimeContext {
    pub fn new(config: AppConfig) -> Self {
        let environment = config.environment.clone();
        Self {
            config: SharedConfig::new(config),
            root: RwLock::new(None),
            environment: RwLock::new(environment),
            logger: RwLock::new(None),
            frozen: AtomicBool::new(false),
            flat: AtomicBool::new(false),
            generator_scope: RwLock::new(
                DEFAULT_GENERATOR_SCOPE.iter().map(|s| s.to_string()).collect(),
            ),
            load_paths: PathRegistry::new(),
            session_types: SessionTypeRegistry::new(),
        }
    }

    // Configuration

    /// Snapshot of the current configuration.
    pub fn config(&self) -> std::sync::Arc<AppConfig> {
        self.config.load()
    }

    /// The swappable configuration slot itself.
    pub fn config_handle(&self) -> &SharedConfig {
        &self.config
    }

    // Root

    /// The application root.
    ///
    /// Explicitly assigned root, else the configured root, else the current
    /// working directory. Only an explicit assignment is cached.
    pub fn root(&self) -> PathBuf {
        if let Some(root) = self
            .root
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return root.clone();
        }
        if let Some(root) = &self.config().root {
            return root.clone();
        }
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }

    pub fn set_root(&self, root: impl Into<PathBuf>) {
        *self.root.write().unwrap_or_else(PoisonError::into_inner) = Some(root.into());
    }

    /// `parts` joined under the application root.
    ///
    /// `root_path(&["views", "admin"])` is `<root>/views/admin`.
    pub fn root_path<P: AsRef<Path>>(&self, parts: &[P]) -> PathBuf {
        parts
            .iter()
            .fold(self.root(), |path, part| path.join(part))
    }

    /// Directory of the framework crate itself.
    pub fn framework_root() -> &'static Path {
        Path::new(env!("CARGO_MANIFEST_DIR"))
    }

    // Environment

    pub fn environment(&self) -> String {
        self.environment
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_environment(&self, environment: impl Into<String>) {
        *self
            .environment
            .write()
            .unwrap_or_else(PoisonError::into_inner) = environment.into();
    }

    // Logging

    /// Where logs should go right now.
    ///
    /// Re-evaluated on every call against the latest configuration.
    pub fn log_target(&self) -> LogTarget {
        let config = self.config();
        log_target::resolve(&config, &self.log_dir_for(&config))
    }

    /// Directory holding the log file.
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir_for(&self.config())
    }

    fn log_dir_for(&self, config: &AppConfig) -> PathBuf {
        match config.log_file.as_deref().map(Path::parent) {
            Some(Some(dir)) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            Some(_) => PathBuf::from("."),
            None => self.root_path(&["log"]),
        }
    }

    pub fn logger(&self) -> Option<LoggerHandle> {
        self.logger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_logger(&self, logger: LoggerHandle) {
        *self.logger.write().unwrap_or_else(PoisonError::into_inner) = Some(logger);
    }

    // Frozen mode

    /// Mark the application as running from a frozen, immutable deployment.
    /// There is no way back.
    pub fn freeze(&self) {
        if !self.frozen.swap(true, Ordering::SeqCst) {
            tracing::info!("Runtime frozen");
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::SeqCst)
    }

    // Generator scope

    /// Append a namespace; duplicates are kept.
    pub fn push_generator_scope(&self, name: impl Into<String>) {
        self.generator_scope
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(name.into());
    }

    pub fn generator_scope(&self) -> Vec<String> {
        self.generator_scope
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // Registries

    pub fn paths(&self) -> &PathRegistry {
        &self.load_paths
    }

    pub fn session_types(&self) -> &SessionTypeRegistry {
        &self.session_types
    }

    // Flat mode

    /// Run without the default application layout.
    ///
    /// Clears the configured layout and every registered load path, then
    /// prepares `router` with the routes `f` adds followed by the default
    /// routes.
    pub fn flat(&self, router: &Router, f: impl FnOnce(&mut RouteBuilder)) {
        self.flat.store(true, Ordering::SeqCst);
        self.config.update(|c| c.framework.clear());
        self.load_paths.clear();
        router.prepare(|r| {
            f(r);
            r.default_routes();
        });
        tracing::info!("Flat application layout enabled");
    }

    pub fn is_flat(&self) -> bool {
        self.flat.load(Ordering::SeqCst)
    }
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_falls_back_to_working_directory() {
        let ctx = RuntimeContext::default();
        assert_eq!(ctx.root(), std::env::current_dir().unwrap());
    }

    #[test]
    fn test_root_from_config() {
        let mut config = AppConfig::default();
        config.root = Some("/srv/from-config".into());
        let ctx = RuntimeContext::new(config);

        assert_eq!(ctx.root(), PathBuf::from("/srv/from-config"));
    }

    #[test]
    fn test_explicit_root_beats_config() {
        let mut config = AppConfig::default();
        config.root = Some("/srv/from-config".into());
        let ctx = RuntimeContext::new(config);
        ctx.set_root("/srv/explicit");

        assert_eq!(ctx.root(), PathBuf::from("/srv/explicit"));

        ctx.config_handle().update(|c| c.root = Some("/srv/changed".into()));
        assert_eq!(ctx.root(), PathBuf::from("/srv/explicit"));
    }

    #[test]
    fn test_root_path_joins_parts() {
        let ctx = RuntimeContext::default();
        ctx.set_root("/home/app");
        assert_eq!(ctx.root_path(&["views", "admin"]), PathBuf::from("/home/app/views/admin"));
        assert_eq!(ctx.root_path::<&str>(&[]), PathBuf::from("/home/app"));
    }

    #[test]
    fn test_log_target_reads_fresh_config() {
        let ctx = RuntimeContext::default();
        ctx.set_root("/app");
        assert_eq!(ctx.log_target(), LogTarget::Stdout);

        ctx.config_handle().update(|c| {
            c.daemonize = true;
            c.port = 4002;
        });
        assert_eq!(ctx.log_target(), LogTarget::File("/app/log/app.4002.log".into()));

        ctx.config_handle().update(|c| c.testing = true);
        assert_eq!(ctx.log_target(), LogTarget::File("/app/log/app_test.log".into()));

        ctx.config_handle().update(|c| c.log_file = Some("/var/log/x.log".into()));
        assert_eq!(ctx.log_target(), LogTarget::File("/var/log/x.log".into()));
        assert_eq!(ctx.log_dir(), PathBuf::from("/var/log"));
    }

    #[test]
    fn test_bare_log_file_lives_in_current_directory() {
        let ctx = RuntimeContext::default();
        ctx.config_handle().update(|c| c.log_file = Some("x.log".into()));
        assert_eq!(ctx.log_dir(), PathBuf::from("."));
        assert_eq!(ctx.log_target(), LogTarget::File("x.log".into()));
    }

    #[test]
    fn test_concurrent_registration_from_plugins() {
        use std::sync::Arc;

        let ctx = Arc::new(RuntimeContext::default());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let ctx = ctx.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let name = format!("plugin_{t}_{i}");
                        ctx.paths()
                            .register(name.as_str(), format!("/plugins/{t}/{i}"))
                            .unwrap();
                        ctx.session_types().register(&name, "sessions/plugin.rs", None);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(ctx.paths().len(), 800);
        assert_eq!(ctx.session_types().len(), 800);
        for t in 0..8 {
            for i in 0..100 {
                let name = format!("plugin_{t}_{i}");
                assert_eq!(
                    ctx.paths().directory_for(name.as_str()).unwrap(),
                    PathBuf::from(format!("/plugins/{t}/{i}"))
                );
                assert!(ctx.session_types().contains(&name));
            }
        }
    }

    #[test]
    fn test_framework_root_is_this_crate() {
        assert!(RuntimeContext::framework_root().join("Cargo.toml").exists());
    }

    #[test]
    fn test_freeze_is_one_way_and_idempotent() {
        let ctx = RuntimeContext::default();
        assert!(!ctx.is_frozen());
        ctx.freeze();
        ctx.freeze();
        assert!(ctx.is_frozen());
    }

    #[test]
    fn test_generator_scope_appends_in_order() {
        let ctx = RuntimeContext::default();
        assert_eq!(ctx.generator_scope(), DEFAULT_GENERATOR_SCOPE);

        ctx.push_generator_scope("plugin");
        ctx.push_generator_scope("webcore");
        assert_eq!(
            ctx.generator_scope(),
            ["webcore_default", "webcore", "tests", "plugin", "webcore"]
        );
    }

    #[test]
    fn test_environment_defaults_from_config() {
        let ctx = RuntimeContext::default();
        assert_eq!(ctx.environment(), "development");
        ctx.set_environment("production");
        assert_eq!(ctx.environment(), "production");
    }

    #[test]
    fn test_flat_clears_layout_and_prepares_router() {
        let ctx = RuntimeContext::default();
        ctx.paths().register("view", "app/views").unwrap();
        let router = Router::new();

        ctx.flat(&router, |r| {
            r.prefix("api", "/api");
        });

        assert!(ctx.is_flat());
        assert!(ctx.paths().is_empty());
        assert!(ctx.config().framework.is_empty());
        assert_eq!(router.route_names(), ["api", "default"]);
    }
}
