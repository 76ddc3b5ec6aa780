//! Configuration service implementation.
//!
//! Loads [`PagebarConfig`] from `config.toml` (by default
//! `~/.config/pagebar/config.toml`) and caches it.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use pagebar_core::config::PagebarConfig;
use pagebar_core::error::Result;
use pagebar_core::sidebar::SidebarId;

use crate::paths::PagebarPaths;
use crate::storage::AtomicTomlFile;

/// Configuration service that loads and caches the application configuration.
///
/// A missing file yields the defaults and is not created.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<PagebarConfig>>,
    /// Cached configuration, filled on first access.
    config: Arc<RwLock<Option<PagebarConfig>>>,
}

impl ConfigService {
    /// Creates a service over the default config file.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(PagebarPaths::config_file()?))
    }

    /// Creates a service over a custom config file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading it from file if not cached.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub fn get_config(&self) -> Result<PagebarConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = match self.file.load()? {
            Some(config) => {
                tracing::debug!(path = ?self.file.path(), "Loaded config");
                config
            }
            None => {
                tracing::debug!(path = ?self.file.path(), "No config file, using defaults");
                PagebarConfig::default()
            }
        };

        {
            let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    /// Writes `config` and refreshes the cache.
    pub fn save_config(&self, config: &PagebarConfig) -> Result<()> {
        self.file.save(config)?;
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = Some(config.clone());
        Ok(())
    }

    /// Sidebar store location: the configured path or the platform default.
    pub fn store_path(&self) -> Result<PathBuf> {
        match self.get_config()?.storage.path {
            Some(path) => Ok(path),
            None => PagebarPaths::store_file(),
        }
    }

    /// The host default sidebar id.
    pub fn default_sidebar(&self) -> Result<SidebarId> {
        Ok(SidebarId::new(self.get_config()?.render.default_sidebar))
    }
}
