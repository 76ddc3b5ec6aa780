//! Application configuration model.
//!
//! Every section and field has a default so a partial (or missing)
//! `config.toml` still loads.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Host default sidebar used when nothing is configured.
pub const DEFAULT_SIDEBAR_ID: &str = "default-sidebar";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PagebarConfig {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub debug: DebugSettings,
}

/// Where the sidebar store lives.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSettings {
    /// Store file; the platform config directory is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Sidebar shown when no configured sidebar claims the viewed page.
    #[serde(default = "default_sidebar_id")]
    pub default_sidebar: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            default_sidebar: default_sidebar_id(),
        }
    }
}

fn default_sidebar_id() -> String {
    DEFAULT_SIDEBAR_ID.to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DebugSettings {
    /// `tracing` filter directive, e.g. `info` or `pagebar_core=debug`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: PagebarConfig = toml::from_str("").unwrap();
        assert_eq!(config, PagebarConfig::default());
        assert_eq!(config.render.default_sidebar, "default-sidebar");
        assert_eq!(config.debug.log_level, "warn");
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config: PagebarConfig = toml::from_str(
            r#"
            [render]
            default_sidebar = "primary"

            [storage]
            path = "/srv/site/sidebars.toml"
            "#,
        )
        .unwrap();

        assert_eq!(config.render.default_sidebar, "primary");
        assert_eq!(
            config.storage.path,
            Some(PathBuf::from("/srv/site/sidebars.toml"))
        );
        assert_eq!(config.debug.log_level, "warn");
    }
}
