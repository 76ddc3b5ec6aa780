//! Path management for pagebar files.
//!
//! ```text
//! ~/.config/pagebar/
//! ├── config.toml      # Application configuration
//! └── sidebars.toml    # Sidebar store
//! ```

use std::path::PathBuf;

use pagebar_core::error::{PagebarError, Result};

/// Directory name under the platform config directory.
pub const APP_DIR: &str = "pagebar";

pub struct PagebarPaths;

impl PagebarPaths {
    /// Returns the pagebar configuration directory (e.g. `~/.config/pagebar/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| PagebarError::config("Cannot find config directory"))
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default sidebar store path.
    pub fn store_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("sidebars.toml"))
    }
}
