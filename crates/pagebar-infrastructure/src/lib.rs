pub mod config_service;
pub mod content_catalog;
pub mod dto;
pub mod memory_repository;
pub mod paths;
pub mod storage;
pub mod toml_sidebar_repository;

pub use crate::config_service::ConfigService;
pub use crate::content_catalog::ContentCatalog;
pub use crate::memory_repository::InMemorySidebarRepository;
pub use crate::paths::PagebarPaths;
pub use crate::toml_sidebar_repository::TomlSidebarRepository;
