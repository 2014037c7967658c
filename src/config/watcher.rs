//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::args::ConfigResolver;
use crate::config::loader::load_config;
use crate::config::shared::SharedConfig;

/// Watches the configuration file and swaps reloaded contents into a
/// [`SharedConfig`].
pub struct ConfigWatcher<R> {
    path: PathBuf,
    shared: SharedConfig,
    overrides: R,
}

impl<R> ConfigWatcher<R>
where
    R: ConfigResolver + Send + 'static,
{
    /// `overrides` are re-applied on every reload so command-line flags keep
    /// winning over the file.
    pub fn new(path: &Path, shared: SharedConfig, overrides: R) -> Self {
        Self {
            path: path.to_path_buf(),
            shared,
            overrides,
        }
    }

    /// Start watching the file in a background thread.
    ///
    /// Watching stops when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            shared,
            overrides,
        } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Config file change detected, reloading...");
                        match load_config(&path) {
                            Ok(mut new_config) => {
                                overrides.apply(&mut new_config);
                                shared.store(new_config);
                            }
                            Err(e) => {
                                tracing::error!(
                                    "Failed to reload config: {}. Keeping current configuration.",
                                    e
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watched, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?watched, "Config watcher started");
        Ok(watcher)
    }
}
