//! Sidebar repository trait.

use super::store::SidebarStore;
use crate::error::Result;

/// Persistence of the sidebar store snapshot and its id counter.
///
/// Implementations own concurrency control: `transact` must run its closure
/// against the latest persisted snapshot and persist the result without
/// another writer interleaving.
pub trait SidebarRepository: Send + Sync {
    /// Loads the current snapshot. A missing store loads as empty.
    fn load(&self) -> Result<SidebarStore>;

    /// Replaces the persisted snapshot.
    fn save(&self, store: &SidebarStore) -> Result<()>;

    /// Read-modify-write under the repository's lock.
    ///
    /// If `update` fails nothing is written and the error is returned.
    fn transact(
        &self,
        update: &mut dyn FnMut(&SidebarStore) -> Result<SidebarStore>,
    ) -> Result<SidebarStore>;
}
