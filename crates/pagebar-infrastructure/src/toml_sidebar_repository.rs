//! TOML-based SidebarRepository implementation

use std::path::{Path, PathBuf};

use pagebar_core::error::{PagebarError, Result};
use pagebar_core::sidebar::{SidebarRepository, SidebarStore};

use crate::dto::{
    CURRENT_SCHEMA_VERSION, DecodedStore, decode_store, encode_store, persisted_counter,
};
use crate::paths::PagebarPaths;
use crate::storage::AtomicTomlFile;

/// A repository storing the sidebar snapshot in one TOML file.
///
/// Responsibilities:
/// - Detect the on-disk layout version and migrate older files in memory
/// - Convert between DTOs and the domain snapshot
/// - Write the current layout atomically, under an exclusive file lock
///
/// Legacy files are only rewritten by the next save (or [`Self::upgrade`]).
/// No write ever lowers the persisted id counter.
pub struct TomlSidebarRepository {
    file: AtomicTomlFile<toml::Table>,
}

impl TomlSidebarRepository {
    /// Creates a repository at the default path (~/.config/pagebar/sidebars.toml)
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(PagebarPaths::store_file()?))
    }

    /// Creates a repository at a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Rewrites a legacy file in the current layout.
    ///
    /// Returns the version the file had before, or `None` when it was already
    /// current (or missing) and nothing needed rewriting. The decode and the
    /// rewrite happen under one lock, so concurrent writers are not lost.
    pub fn upgrade(&self) -> Result<Option<String>> {
        if !self.read()?.was_migrated() {
            tracing::debug!(path = ?self.path(), "Sidebar store already current");
            return Ok(None);
        }

        let source_version = self.file.update(toml::Table::new(), |table| {
            let decoded = decode_store(std::mem::take(table))?;
            let store = decoded.dto.into_store()?;
            *table = encode_store(&store)?;
            Ok::<_, PagebarError>(decoded.source_version)
        })?;

        if source_version == CURRENT_SCHEMA_VERSION {
            tracing::debug!(path = ?self.path(), "Sidebar store upgraded by another writer");
            return Ok(None);
        }

        tracing::info!(
            path = ?self.path(),
            from = %source_version,
            "Upgraded sidebar store file"
        );
        Ok(Some(source_version))
    }

    fn read(&self) -> Result<DecodedStore> {
        let table = self.file.load()?.unwrap_or_default();
        decode_store(table)
    }
}

impl SidebarRepository for TomlSidebarRepository {
    fn load(&self) -> Result<SidebarStore> {
        self.read()?.dto.into_store()
    }

    fn save(&self, store: &SidebarStore) -> Result<()> {
        self.file.update(toml::Table::new(), |table| {
            let floor = persisted_counter(table);
            if floor > store.last_allocated_id() {
                tracing::warn!(
                    on_disk = floor,
                    saved = store.last_allocated_id(),
                    "Keeping persisted sidebar counter ahead of a stale snapshot"
                );
            }
            let next = store.clone().with_counter_at_least(floor);
            *table = encode_store(&next)?;
            Ok(())
        })
    }

    fn transact(
        &self,
        update: &mut dyn FnMut(&SidebarStore) -> Result<SidebarStore>,
    ) -> Result<SidebarStore> {
        self.file.update(toml::Table::new(), |table| {
            let current = decode_store(std::mem::take(table))?.dto.into_store()?;
            let floor = current.last_allocated_id();
            let next = update(&current)?.with_counter_at_least(floor);
            *table = encode_store(&next)?;
            Ok(next)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagebar_core::sidebar::SidebarId;
    use std::fs;
    use tempfile::TempDir;

    fn repository(temp_dir: &TempDir) -> TomlSidebarRepository {
        TomlSidebarRepository::with_path(temp_dir.path().join("sidebars.toml"))
    }

    #[test]
    fn test_missing_file_loads_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = repository(&temp_dir).load().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.last_allocated_id(), 0);
    }

    #[test]
    fn test_rejected_transaction_keeps_file() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        let (store, _) = SidebarStore::new().create_sidebar("Kept").unwrap();
        repo.save(&store).unwrap();
        let before = fs::read_to_string(repo.path()).unwrap();

        let err = repo
            .transact(&mut |current: &SidebarStore| {
                current.create_sidebar("  ").map(|(next, _)| next)
            })
            .unwrap_err();

        assert!(matches!(err, PagebarError::InvalidName(_)));
        assert_eq!(fs::read_to_string(repo.path()).unwrap(), before);
    }

    #[test]
    fn test_upgrade_keeps_counter_and_entries() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        fs::write(
            repo.path(),
            r#"
                last_allocated_id = 9

                [[sidebars]]
                id = "ups-sidebar-2"
                name = "Old"
                children = "on"
                pages = [3]
            "#,
        )
        .unwrap();

        assert_eq!(repo.upgrade().unwrap().as_deref(), Some("1.0.0"));
        assert_eq!(repo.upgrade().unwrap(), None);

        let written = fs::read_to_string(repo.path()).unwrap();
        assert!(written.contains("schema_version = \"2.0.0\""));
        assert!(written.contains("last_allocated_id = 9"));

        let store = repo.load().unwrap();
        let old = store.get(&SidebarId::new("ups-sidebar-2")).unwrap();
        assert!(old.cascade_to_children);
        assert!(old.is_assigned("page", 3));
    }

    #[test]
    fn test_transaction_cannot_lower_counter() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        let (store, _) = SidebarStore::new().create_sidebar("One").unwrap();
        let (store, _) = store.create_sidebar("Two").unwrap();
        repo.save(&store).unwrap();

        let next = repo
            .transact(&mut |_: &SidebarStore| Ok(SidebarStore::new()))
            .unwrap();

        assert!(next.is_empty());
        assert_eq!(next.last_allocated_id(), 2);
        assert_eq!(repo.load().unwrap().last_allocated_id(), 2);
    }

    #[test]
    fn test_upgrade_is_noop_for_current_file() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        repo.save(&SidebarStore::new()).unwrap();

        assert_eq!(repo.upgrade().unwrap(), None);
    }
}
