//! In-memory SidebarRepository, for hosts that persist elsewhere and for tests.

use std::sync::{Mutex, MutexGuard};

use pagebar_core::error::{PagebarError, Result};
use pagebar_core::sidebar::{SidebarRepository, SidebarStore};

#[derive(Debug, Default)]
pub struct InMemorySidebarRepository {
    store: Mutex<SidebarStore>,
}

impl InMemorySidebarRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing snapshot.
    pub fn with_store(store: SidebarStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SidebarStore>> {
        self.store
            .lock()
            .map_err(|_| PagebarError::internal("sidebar store lock poisoned"))
    }
}

impl SidebarRepository for InMemorySidebarRepository {
    fn load(&self) -> Result<SidebarStore> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, store: &SidebarStore) -> Result<()> {
        let mut guard = self.lock()?;
        let floor = guard.last_allocated_id();
        *guard = store.clone().with_counter_at_least(floor);
        Ok(())
    }

    fn transact(
        &self,
        update: &mut dyn FnMut(&SidebarStore) -> Result<SidebarStore>,
    ) -> Result<SidebarStore> {
        let mut guard = self.lock()?;
        let next = update(&*guard)?.with_counter_at_least(guard.last_allocated_id());
        *guard = next.clone();
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagebar_core::submission::Submission;
    use pagebar_core::SidebarService;
    use std::sync::Arc;

    #[test]
    fn test_service_over_memory_repository() {
        let repo = Arc::new(InMemorySidebarRepository::new());
        let service = SidebarService::new(repo.clone());

        let first = service.add_sidebar("First").unwrap();
        service.submit(Submission::add("Second")).unwrap();

        let store = repo.load().unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.ids().next(), Some(&first));
        assert_eq!(store.last_allocated_id(), 2);
    }

    #[test]
    fn test_failed_update_keeps_snapshot() {
        let (seed, _) = SidebarStore::new().create_sidebar("Only").unwrap();
        let repo = InMemorySidebarRepository::with_store(seed.clone());

        let result = repo.transact(&mut |_: &SidebarStore| Err(PagebarError::NoActivePage));

        assert!(result.is_err());
        assert_eq!(repo.load().unwrap(), seed);
    }

    #[test]
    fn test_stale_save_keeps_counter() {
        let (seed, _) = SidebarStore::new().create_sidebar("Only").unwrap();
        let repo = InMemorySidebarRepository::with_store(seed);

        repo.save(&SidebarStore::new()).unwrap();

        let store = repo.load().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.last_allocated_id(), 1);
        let (_, next) = store.create_sidebar("Again").unwrap();
        assert_eq!(next.as_str(), "ups-sidebar-2");
    }
}
