//! Sidebar store DTOs and migrations.
//!
//! ## Version History
//! - **1.0.0**: Loose records. May carry `pages` / `location`, `children` as
//!   `"on"`/`"off"`, and may lack `last_allocated_id`. Files without a
//!   `schema_version` key are read as this version.
//! - **2.0.0**: Normalized records with typed `locations` and a bool `children`.
//!
//! The version lives in the top-level `schema_version` key, so both store
//! versions are loaded flat through [`create_sidebar_store_migrator`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use version_migrate::{IntoDomain, MigratesTo, Migrator, Versioned};

use pagebar_core::error::{PagebarError, Result};
use pagebar_core::sidebar::{
    ItemId, SidebarDefinition, SidebarEntry, SidebarId, SidebarRecord, SidebarStore,
    normalize_legacy,
};

/// Key holding the layout version at the top of the store file.
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Layout version written by this build.
pub const CURRENT_SCHEMA_VERSION: &str = "2.0.0";

/// Layout version assumed when the key is missing.
pub const LEGACY_SCHEMA_VERSION: &str = "1.0.0";

/// Entity name the store's migration path is registered under.
pub const SIDEBAR_STORE_ENTITY: &str = "sidebar_store";

// ============================================================================
// V1.0.0
// ============================================================================

/// One legacy sidebar record with its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacySidebarEntryV1_0_0 {
    pub id: String,
    #[serde(flatten)]
    pub record: SidebarRecord,
}

/// Sidebar store V1.0.0 (legacy record shapes).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0", version_key = "schema_version")]
pub struct SidebarStoreV1_0_0 {
    /// Absent in the oldest files; bootstrapped from the ids on load.
    #[serde(default)]
    pub last_allocated_id: Option<u64>,
    #[serde(default)]
    pub sidebars: Vec<LegacySidebarEntryV1_0_0>,
}

// ============================================================================
// V2.0.0
// ============================================================================

/// One normalized sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Versioned)]
#[versioned(version = "2.0.0")]
pub struct SidebarEntryV2_0_0 {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub before_title: String,
    #[serde(default)]
    pub after_title: String,
    #[serde(default)]
    pub before_widget: String,
    #[serde(default)]
    pub after_widget: String,
    /// Cascade to direct children.
    #[serde(default)]
    pub children: bool,
    #[serde(default)]
    pub locations: BTreeMap<String, BTreeSet<ItemId>>,
}

/// Sidebar store V2.0.0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Versioned)]
#[versioned(version = "2.0.0", version_key = "schema_version")]
pub struct SidebarStoreV2_0_0 {
    #[serde(default)]
    pub last_allocated_id: Option<u64>,
    #[serde(default)]
    pub sidebars: Vec<SidebarEntryV2_0_0>,
}

/// Type alias for the latest store version.
pub type SidebarStoreDTO = SidebarStoreV2_0_0;

impl Default for SidebarStoreV2_0_0 {
    fn default() -> Self {
        Self {
            last_allocated_id: Some(0),
            sidebars: Vec::new(),
        }
    }
}

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from SidebarStoreV1_0_0 to SidebarStoreV2_0_0.
/// Folds `pages` into `locations["page"]` and drops stray keys.
impl MigratesTo<SidebarStoreV2_0_0> for SidebarStoreV1_0_0 {
    fn migrate(self) -> SidebarStoreV2_0_0 {
        let sidebars = self
            .sidebars
            .into_iter()
            .map(|legacy| {
                let id = SidebarId::new(legacy.id);
                let definition = normalize_legacy(&id, legacy.record);
                SidebarEntryV2_0_0::from(&SidebarEntry::new(id, definition))
            })
            .collect();

        SidebarStoreV2_0_0 {
            last_allocated_id: self.last_allocated_id,
            sidebars,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

/// Convert SidebarEntryV2_0_0 DTO to domain model.
impl IntoDomain<SidebarEntry> for SidebarEntryV2_0_0 {
    fn into_domain(self) -> SidebarEntry {
        SidebarEntry::new(
            self.id,
            SidebarDefinition {
                name: self.name,
                description: self.description,
                before_title: self.before_title,
                after_title: self.after_title,
                before_widget: self.before_widget,
                after_widget: self.after_widget,
                cascade_to_children: self.children,
                locations: self.locations,
            },
        )
    }
}

/// Convert domain model to SidebarEntryV2_0_0 DTO for persistence.
impl From<&SidebarEntry> for SidebarEntryV2_0_0 {
    fn from(entry: &SidebarEntry) -> Self {
        let def = &entry.definition;
        SidebarEntryV2_0_0 {
            id: entry.id.to_string(),
            name: def.name.clone(),
            description: def.description.clone(),
            before_title: def.before_title.clone(),
            after_title: def.after_title.clone(),
            before_widget: def.before_widget.clone(),
            after_widget: def.after_widget.clone(),
            children: def.cascade_to_children,
            locations: def.locations.clone(),
        }
    }
}

/// The migration path ends at the latest DTO. Building the domain snapshot can
/// fail, so it happens afterwards in [`SidebarStoreV2_0_0::into_store`].
impl IntoDomain<SidebarStoreV2_0_0> for SidebarStoreV2_0_0 {
    fn into_domain(self) -> SidebarStoreV2_0_0 {
        self
    }
}

impl From<&SidebarStore> for SidebarStoreV2_0_0 {
    fn from(store: &SidebarStore) -> Self {
        SidebarStoreV2_0_0 {
            last_allocated_id: Some(store.last_allocated_id()),
            sidebars: store.iter().map(SidebarEntryV2_0_0::from).collect(),
        }
    }
}

impl SidebarStoreV2_0_0 {
    /// Builds the domain snapshot, running the counter bootstrap.
    ///
    /// # Errors
    ///
    /// `DuplicateSidebar` if the file lists an id twice.
    pub fn into_store(self) -> Result<SidebarStore> {
        let entries = self
            .sidebars
            .into_iter()
            .map(IntoDomain::into_domain)
            .collect();
        SidebarStore::load(entries, self.last_allocated_id)
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for the sidebar store.
///
/// # Migration Path
///
/// - V1.0.0 → V2.0.0: Folds `pages` into `locations["page"]`, parses `children`
/// - V2.0.0 → SidebarStoreDTO: The latest DTO, checked by `into_store`
pub fn create_sidebar_store_migrator() -> Result<Migrator> {
    let mut migrator = Migrator::builder().build();

    let store_path = Migrator::define(SIDEBAR_STORE_ENTITY)
        .from::<SidebarStoreV1_0_0>()
        .step::<SidebarStoreV2_0_0>()
        .into::<SidebarStoreDTO>();

    migrator.register(store_path).map_err(|e| {
        PagebarError::migration(format!("Failed to register sidebar store migration path: {e}"))
    })?;

    Ok(migrator)
}

// ============================================================================
// Version detection
// ============================================================================

/// A store file decoded into the latest DTO.
#[derive(Debug, Clone)]
pub struct DecodedStore {
    pub dto: SidebarStoreDTO,
    /// Version found on disk, before any migration.
    pub source_version: String,
}

impl DecodedStore {
    /// Returns true if the file is older than the current layout.
    pub fn was_migrated(&self) -> bool {
        self.source_version != CURRENT_SCHEMA_VERSION
    }
}

/// Decodes a store file's top-level table, migrating older layouts.
///
/// An empty table (missing or blank file) decodes to an empty current store.
/// A table without `schema_version` is read as the legacy layout.
pub fn decode_store(mut table: toml::Table) -> Result<DecodedStore> {
    if table.is_empty() {
        return Ok(DecodedStore {
            dto: SidebarStoreDTO::default(),
            source_version: CURRENT_SCHEMA_VERSION.to_string(),
        });
    }

    let source_version = match table.get(SCHEMA_VERSION_KEY) {
        None => {
            table.insert(
                SCHEMA_VERSION_KEY.to_string(),
                toml::Value::String(LEGACY_SCHEMA_VERSION.to_string()),
            );
            LEGACY_SCHEMA_VERSION.to_string()
        }
        Some(toml::Value::String(version)) => version.clone(),
        Some(other) => {
            return Err(PagebarError::migration(format!(
                "'{SCHEMA_VERSION_KEY}' must be a string, found {}",
                other.type_str()
            )));
        }
    };

    // Unknown versions would otherwise fall through to the latest DTO unchanged
    if source_version != CURRENT_SCHEMA_VERSION && source_version != LEGACY_SCHEMA_VERSION {
        return Err(PagebarError::migration(format!(
            "Unsupported sidebar store version '{source_version}'"
        )));
    }

    if source_version == LEGACY_SCHEMA_VERSION {
        tracing::info!(
            from = LEGACY_SCHEMA_VERSION,
            to = CURRENT_SCHEMA_VERSION,
            "Migrating sidebar store"
        );
    }

    let dto: SidebarStoreDTO = create_sidebar_store_migrator()?
        .load_flat_from(SIDEBAR_STORE_ENTITY, toml::Value::Table(table))
        .map_err(|e| {
            PagebarError::migration(format!(
                "Failed to load sidebar store version {source_version}: {e}"
            ))
        })?;

    Ok(DecodedStore {
        dto,
        source_version,
    })
}

/// Encodes a snapshot as the current layout's top-level table.
pub fn encode_store(store: &SidebarStore) -> Result<toml::Table> {
    match toml::Value::try_from(SidebarStoreDTO::from(store))? {
        toml::Value::Table(mut table) => {
            table.insert(
                SCHEMA_VERSION_KEY.to_string(),
                toml::Value::String(SidebarStoreDTO::VERSION.to_string()),
            );
            Ok(table)
        }
        other => Err(PagebarError::internal(format!(
            "sidebar store encoded as {} instead of a table",
            other.type_str()
        ))),
    }
}

/// Reads the counter a store table would load with, without failing.
///
/// Used to keep a save from moving the persisted counter backwards. A table
/// that cannot be decoded contributes nothing.
pub fn persisted_counter(table: &toml::Table) -> u64 {
    match decode_store(table.clone()).and_then(|decoded| decoded.dto.into_store()) {
        Ok(store) => store.last_allocated_id(),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read counter from existing sidebar store");
            0
        }
    }
}
