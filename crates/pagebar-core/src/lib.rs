//! Pagebar core: per-page sidebar placement.
//!
//! - [`sidebar`]: the sidebar store snapshot, id allocation and legacy normalization
//! - [`placement`]: resolving the sidebar for a viewed page
//! - [`submission`]: applying settings submissions to a snapshot
//! - [`service`]: a facade wiring those to a repository and a content source

pub mod config;
pub mod content;
pub mod error;
pub mod placement;
pub mod service;
pub mod sidebar;
pub mod submission;

// Re-export common error type
pub use error::PagebarError;
pub use service::SidebarService;
