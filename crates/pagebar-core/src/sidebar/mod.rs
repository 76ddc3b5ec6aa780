//! Sidebar domain module.
//!
//! # Module Structure
//!
//! - `model`: ids, definitions, entries and host registrations
//! - `legacy`: loose persisted records and [`normalize_legacy`]
//! - `store`: the [`SidebarStore`] snapshot (create, delete, id allocation)
//! - `repository`: persistence trait for snapshots

mod legacy;
mod model;
mod repository;
mod store;

pub use legacy::{ItemSet, LEGACY_PAGE_TYPE, SidebarRecord, normalize_legacy};
pub use model::{
    ItemId, Locations, SIDEBAR_ID_PREFIX, SidebarDefinition, SidebarEntry, SidebarId,
    SidebarRegistration,
};
pub use repository::SidebarRepository;
pub use store::{SidebarStore, escape_html};
