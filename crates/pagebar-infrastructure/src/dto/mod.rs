//! Data Transfer Objects (DTOs) for persistence.
//!
//! These structures are versioned on disk and convert into the
//! version-agnostic domain models in `pagebar_core`.

mod sidebar;

pub use sidebar::{
    CURRENT_SCHEMA_VERSION, DecodedStore, LEGACY_SCHEMA_VERSION, LegacySidebarEntryV1_0_0,
    SCHEMA_VERSION_KEY, SIDEBAR_STORE_ENTITY, SidebarEntryV2_0_0, SidebarStoreDTO,
    SidebarStoreV1_0_0, SidebarStoreV2_0_0, create_sidebar_store_migrator, decode_store,
    encode_store, persisted_counter,
};
