//! The sidebar store snapshot.
//!
//! A [`SidebarStore`] is an immutable-by-convention value: every mutating
//! operation returns a new snapshot and leaves the receiver untouched, so a
//! rejected operation can never leak a half-applied change.

use std::collections::HashSet;

use super::model::{SidebarDefinition, SidebarEntry, SidebarId, SidebarRegistration};
use crate::content::{ChecklistItem, ContentItem};
use crate::error::{PagebarError, Result};

/// Ordered sidebar definitions plus the id allocator's counter.
///
/// Declaration order is significant: it is the tie-break when two sidebars
/// claim the same page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidebarStore {
    entries: Vec<SidebarEntry>,
    last_allocated_id: u64,
}

impl SidebarStore {
    /// Creates an empty store whose next allocation is `ups-sidebar-1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from persisted parts.
    ///
    /// Runs the one-shot counter bootstrap: without a `seed` the counter starts
    /// at the highest numeric suffix among `entries` (0 when there is none).
    /// With a seed the counter is never lower than that suffix either.
    ///
    /// # Errors
    ///
    /// `DuplicateSidebar` if two entries share an id.
    pub fn load(entries: Vec<SidebarEntry>, seed: Option<u64>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(&entry.id) {
                return Err(PagebarError::DuplicateSidebar(entry.id.to_string()));
            }
        }

        let highest = highest_suffix(&entries);
        let last_allocated_id = match seed {
            Some(seed) if seed >= highest => seed,
            Some(seed) => {
                tracing::warn!(
                    seed,
                    highest,
                    "Stored sidebar counter is behind existing ids, advancing it"
                );
                highest
            }
            None => {
                tracing::info!(highest, "Bootstrapping sidebar counter from existing ids");
                highest
            }
        };

        Ok(Self {
            entries,
            last_allocated_id,
        })
    }

    /// The most recently allocated numeric suffix.
    pub fn last_allocated_id(&self) -> u64 {
        self.last_allocated_id
    }

    pub fn entries(&self) -> &[SidebarEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<SidebarEntry> {
        self.entries
    }

    /// Iterates entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SidebarEntry> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SidebarId> {
        self.entries.iter().map(|entry| &entry.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &SidebarId) -> Option<&SidebarDefinition> {
        self.entries
            .iter()
            .find(|entry| &entry.id == id)
            .map(|entry| &entry.definition)
    }

    pub fn contains(&self, id: &SidebarId) -> bool {
        self.get(id).is_some()
    }

    /// Allocates the next id and appends a blank sidebar under it.
    ///
    /// The name is trimmed and HTML-escaped before it is stored.
    ///
    /// # Errors
    ///
    /// `InvalidName` when `name` is empty or only whitespace.
    /// `CounterExhausted` when the counter is already at `u64::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagebar_core::sidebar::SidebarStore;
    ///
    /// let (store, id) = SidebarStore::new().create_sidebar("First Sidebar").unwrap();
    /// assert_eq!(id.as_str(), "ups-sidebar-1");
    /// assert_eq!(store.last_allocated_id(), 1);
    /// ```
    pub fn create_sidebar(&self, name: &str) -> Result<(SidebarStore, SidebarId)> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PagebarError::InvalidName(name.to_string()));
        }

        let next = self
            .last_allocated_id
            .checked_add(1)
            .ok_or(PagebarError::CounterExhausted(self.last_allocated_id))?;
        let id = SidebarId::allocated(next);

        let mut next_store = self.clone();
        next_store.last_allocated_id = next;
        next_store.entries.push(SidebarEntry::new(
            id.clone(),
            SidebarDefinition::named(escape_html(trimmed)),
        ));

        tracing::debug!(sidebar = %id, "Created sidebar");
        Ok((next_store, id))
    }

    /// Raises the counter to `floor` if it is behind. The counter never moves back.
    pub fn with_counter_at_least(mut self, floor: u64) -> SidebarStore {
        self.last_allocated_id = self.last_allocated_id.max(floor);
        self
    }

    /// Returns a snapshot without `id`. Unknown ids are a no-op.
    pub fn delete_sidebar(&self, id: &SidebarId) -> SidebarStore {
        let mut next_store = self.clone();
        next_store.remove(id);
        next_store
    }

    /// Removes `id` in place, returning its definition if it existed.
    pub(crate) fn remove(&mut self, id: &SidebarId) -> Option<SidebarDefinition> {
        let position = self.entries.iter().position(|entry| &entry.id == id)?;
        tracing::debug!(sidebar = %id, "Deleted sidebar");
        Some(self.entries.remove(position).definition)
    }

    /// Widget-area registrations for the host, in declaration order.
    pub fn registrations(&self) -> Vec<SidebarRegistration> {
        self.entries.iter().map(SidebarRegistration::from).collect()
    }

    /// Pairs each item with whether it is assigned to `id` under `content_type`.
    ///
    /// This is the state an admin checklist renders.
    pub fn checklist(
        &self,
        id: &SidebarId,
        content_type: &str,
        items: Vec<ContentItem>,
    ) -> Result<Vec<ChecklistItem>> {
        let definition = self
            .get(id)
            .ok_or_else(|| PagebarError::not_found("sidebar", id.as_str()))?;

        Ok(items
            .into_iter()
            .map(|item| ChecklistItem {
                checked: definition.is_assigned(content_type, item.id),
                item,
            })
            .collect())
    }
}

fn highest_suffix(entries: &[SidebarEntry]) -> u64 {
    entries
        .iter()
        .filter_map(|entry| entry.id.numeric_suffix())
        .max()
        .unwrap_or(0)
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(ids: &[&str]) -> SidebarStore {
        let entries = ids
            .iter()
            .map(|id| SidebarEntry::new(*id, SidebarDefinition::named(*id)))
            .collect();
        SidebarStore::load(entries, None).unwrap()
    }

    #[test]
    fn test_create_first_and_second_sidebar() {
        let store = SidebarStore::new();

        let (store, first) = store.create_sidebar("First Sidebar").unwrap();
        assert_eq!(first.as_str(), "ups-sidebar-1");
        assert_eq!(store.last_allocated_id(), 1);
        assert_eq!(
            store.get(&first),
            Some(&SidebarDefinition {
                name: "First Sidebar".to_string(),
                description: String::new(),
                before_title: String::new(),
                after_title: String::new(),
                before_widget: String::new(),
                after_widget: String::new(),
                cascade_to_children: false,
                locations: Default::default(),
            })
        );

        let (store, second) = store.create_sidebar("Second Sidebar").unwrap();
        assert_eq!(second.as_str(), "ups-sidebar-2");
        assert_eq!(store.last_allocated_id(), 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_same_name_twice_yields_distinct_increasing_ids() {
        let (store, a) = SidebarStore::new().create_sidebar("Twin").unwrap();
        let (store, b) = store.create_sidebar("Twin").unwrap();

        assert_ne!(a, b);
        assert!(b.numeric_suffix() > a.numeric_suffix());
        assert_eq!(Some(store.last_allocated_id()), b.numeric_suffix());
    }

    #[test]
    fn test_blank_name_is_rejected_without_mutation() {
        let (store, _) = SidebarStore::new().create_sidebar("Kept").unwrap();

        for name in ["", "   ", "\t\n"] {
            let err = store.create_sidebar(name).unwrap_err();
            assert!(matches!(err, PagebarError::InvalidName(_)));
        }
        assert_eq!(store.len(), 1);
        assert_eq!(store.last_allocated_id(), 1);
    }

    #[test]
    fn test_name_is_escaped() {
        let (store, id) = SidebarStore::new()
            .create_sidebar("  Tips & <Tricks>  ")
            .unwrap();
        assert_eq!(store.get(&id).unwrap().name, "Tips &amp; &lt;Tricks&gt;");
    }

    #[test]
    fn test_delete_keeps_counter() {
        let (store, first) = SidebarStore::new().create_sidebar("One").unwrap();
        let (store, _) = store.create_sidebar("Two").unwrap();

        let store = store.delete_sidebar(&first);
        assert!(!store.contains(&first));
        assert_eq!(store.last_allocated_id(), 2);

        let (_, third) = store.create_sidebar("Three").unwrap();
        assert_eq!(third.as_str(), "ups-sidebar-3");
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let store = store_with(&["ups-sidebar-1"]);
        let after = store.delete_sidebar(&SidebarId::new("ups-sidebar-42"));
        assert_eq!(after, store);
    }

    #[test]
    fn test_counter_is_monotonic_across_operations() {
        let mut store = SidebarStore::new();
        let mut last = store.last_allocated_id();
        for round in 0..5 {
            let (next, id) = store.create_sidebar(&format!("S{round}")).unwrap();
            store = if round % 2 == 0 { next.delete_sidebar(&id) } else { next };
            assert!(store.last_allocated_id() >= last);
            last = store.last_allocated_id();
        }
        assert_eq!(last, 5);
    }

    #[test]
    fn test_bootstrap_from_existing_ids() {
        let store = store_with(&["ups-sidebar-2", "ups-sidebar-7", "default-sidebar"]);
        assert_eq!(store.last_allocated_id(), 7);

        let (_, id) = store.create_sidebar("Next").unwrap();
        assert_eq!(id.as_str(), "ups-sidebar-8");
    }

    #[test]
    fn test_stale_seed_never_reuses_an_id() {
        let entries = vec![SidebarEntry::new("ups-sidebar-4", SidebarDefinition::named("x"))];
        let store = SidebarStore::load(entries, Some(1)).unwrap();
        assert_eq!(store.last_allocated_id(), 4);
    }

    #[test]
    fn test_seed_ahead_of_ids_is_kept() {
        let entries = vec![SidebarEntry::new("ups-sidebar-1", SidebarDefinition::named("x"))];
        let store = SidebarStore::load(entries, Some(9)).unwrap();
        assert_eq!(store.last_allocated_id(), 9);
    }

    #[test]
    fn test_exhausted_counter_is_an_error_not_a_wrap() {
        let entries = vec![SidebarEntry::new(
            "ups-sidebar-18446744073709551615",
            SidebarDefinition::named("Last"),
        )];
        let store = SidebarStore::load(entries, None).unwrap();
        assert_eq!(store.last_allocated_id(), u64::MAX);

        let err = store.create_sidebar("Next").unwrap_err();

        assert_eq!(err, PagebarError::CounterExhausted(u64::MAX));
        assert_eq!(store.len(), 1);
        assert_eq!(store.last_allocated_id(), u64::MAX);
    }

    #[test]
    fn test_counter_floor_only_moves_forward() {
        let (store, _) = SidebarStore::new().create_sidebar("One").unwrap();

        assert_eq!(store.clone().with_counter_at_least(5).last_allocated_id(), 5);
        assert_eq!(store.with_counter_at_least(0).last_allocated_id(), 1);
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let entries = vec![
            SidebarEntry::new("ups-sidebar-1", SidebarDefinition::named("a")),
            SidebarEntry::new("ups-sidebar-1", SidebarDefinition::named("b")),
        ];
        let err = SidebarStore::load(entries, None).unwrap_err();
        assert_eq!(err, PagebarError::DuplicateSidebar("ups-sidebar-1".into()));
    }

    #[test]
    fn test_registrations_follow_declaration_order() {
        let store = store_with(&["ups-sidebar-3", "ups-sidebar-1"]);
        let ids: Vec<_> = store
            .registrations()
            .into_iter()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(ids, ["ups-sidebar-3", "ups-sidebar-1"]);
    }

    #[test]
    fn test_checklist_marks_assigned_items() {
        let mut def = SidebarDefinition::named("Docs");
        def.assign("page", 2);
        let store =
            SidebarStore::load(vec![SidebarEntry::new("ups-sidebar-1", def)], Some(1)).unwrap();

        let items = vec![ContentItem::new(1, "Home"), ContentItem::new(2, "About")];
        let checklist = store
            .checklist(&SidebarId::new("ups-sidebar-1"), "page", items)
            .unwrap();

        assert!(!checklist[0].checked);
        assert!(checklist[1].checked);
        assert_eq!(checklist[1].item.id, 2);

        let missing = store.checklist(&SidebarId::new("nope"), "page", Vec::new());
        assert!(missing.unwrap_err().is_not_found());
    }
}
