//! Atomically swappable configuration handle.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::AppConfig;

/// Shared, hot-swappable configuration.
///
/// Readers take a snapshot with [`SharedConfig::load`]; writers replace the
/// whole configuration. Clones share the same underlying slot.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<ArcSwap<AppConfig>>,
}

impl SharedConfig {
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// Snapshot of the current configuration.
    pub fn load(&self) -> Arc<AppConfig> {
        self.inner.load_full()
    }

    /// Replace the configuration.
    pub fn store(&self, config: AppConfig) {
        self.inner.store(Arc::new(config));
    }

    /// Copy, modify and swap in the configuration.
    ///
    /// `f` may run more than once if another writer races this one.
    pub fn update(&self, f: impl Fn(&mut AppConfig)) {
        self.inner.rcu(|current| {
            let mut next = AppConfig::clone(current);
            f(&mut next);
            next
        });
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_observe_updates() {
        let shared = SharedConfig::default();
        let reader = shared.clone();

        shared.update(|c| c.port = 9999);
        assert_eq!(reader.load().port, 9999);

        let mut replacement = AppConfig::default();
        replacement.environment = "production".into();
        shared.store(replacement);
        assert_eq!(reader.load().environment, "production");
        assert_eq!(reader.load().port, 4000);
    }
}
