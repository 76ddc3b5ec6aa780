pub mod migrate;
pub mod resolve;
pub mod sidebar;

use std::path::PathBuf;
use std::sync::Arc;

use pagebar_core::SidebarService;
use pagebar_core::sidebar::SidebarId;
use pagebar_infrastructure::TomlSidebarRepository;

/// Everything a command needs: the store and the host default sidebar.
pub struct Context {
    pub repository: Arc<TomlSidebarRepository>,
    pub service: SidebarService,
    pub default_sidebar: SidebarId,
}

impl Context {
    pub fn new(store_path: PathBuf, default_sidebar: SidebarId) -> Self {
        let repository = Arc::new(TomlSidebarRepository::with_path(store_path));
        let service = SidebarService::new(repository.clone());
        Self {
            repository,
            service,
            default_sidebar,
        }
    }

    /// The `--default` override, or the configured default.
    pub fn default_or(&self, explicit: Option<String>) -> SidebarId {
        explicit
            .map(SidebarId::new)
            .unwrap_or_else(|| self.default_sidebar.clone())
    }
}
