//! Validation/merge pipeline for settings submissions.

use crate::error::Result;
use crate::sidebar::SidebarStore;
use crate::submission::Submission;

/// Computes the snapshot that should be persisted after `input`.
///
/// 1. A non-blank `add_sidebar` creates a sidebar on the stored snapshot and
///    discards any edits in the same submission. A blank one counts as no add.
/// 2. Otherwise the edited `sidebars`, if any, become the working snapshot.
///    The stored counter is carried over and can only move forward.
/// 3. Every id in `delete` is removed from the working snapshot.
///
/// `store` itself is never modified; on error the caller keeps it as-is.
///
/// # Errors
///
/// `DuplicateSidebar` if the edited snapshot repeats an id.
/// `CounterExhausted` if an add finds no id left to allocate.
pub fn apply_submission(store: &SidebarStore, input: Submission) -> Result<SidebarStore> {
    let Submission {
        add_sidebar,
        delete,
        sidebars,
    } = input;

    let add_sidebar = add_sidebar.filter(|name| {
        let blank = name.trim().is_empty();
        if blank {
            tracing::debug!("Ignoring add request with a blank name");
        }
        !blank
    });

    let mut working = match add_sidebar {
        Some(name) => {
            if sidebars.is_some() {
                tracing::debug!("Discarding field edits submitted with an add request");
            }
            let (created, id) = store.create_sidebar(&name)?;
            tracing::info!(sidebar = %id, "Added sidebar from submission");
            created
        }
        None => match sidebars {
            Some(edited) => SidebarStore::load(edited, Some(store.last_allocated_id()))?,
            None => store.clone(),
        },
    };

    for id in &delete {
        if working.remove(id).is_none() {
            tracing::debug!(sidebar = %id, "Delete requested for unknown sidebar");
        }
    }

    Ok(working)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PagebarError;
    use crate::sidebar::{SidebarDefinition, SidebarEntry, SidebarId};

    fn two_sidebars() -> SidebarStore {
        let (store, _) = SidebarStore::new().create_sidebar("One").unwrap();
        let (store, _) = store.create_sidebar("Two").unwrap();
        store
    }

    #[test]
    fn test_add_creates_on_stored_snapshot() {
        let store = two_sidebars();
        let mut input = Submission::add("Three");
        input.sidebars = Some(Vec::new());

        let next = apply_submission(&store, input).unwrap();

        assert_eq!(next.len(), 3);
        assert!(next.contains(&SidebarId::new("ups-sidebar-3")));
        assert_eq!(next.last_allocated_id(), 3);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_blank_add_is_ignored() {
        let store = two_sidebars();
        let next = apply_submission(&store, Submission::add("  ")).unwrap();
        assert_eq!(next, store);
    }

    #[test]
    fn test_blank_add_keeps_edits_and_deletes() {
        let store = two_sidebars();
        let mut edited: Vec<SidebarEntry> = store.entries().to_vec();
        edited[1].definition.name = "Renamed".to_string();
        let input = Submission {
            add_sidebar: Some("   ".to_string()),
            delete: vec![SidebarId::new("ups-sidebar-1")],
            sidebars: Some(edited),
        };

        let next = apply_submission(&store, input).unwrap();

        assert_eq!(next.len(), 1);
        assert_eq!(next.entries()[0].definition.name, "Renamed");
        assert_eq!(next.last_allocated_id(), 2);
    }

    #[test]
    fn test_add_after_edit_to_highest_id_fails_cleanly() {
        let store = two_sidebars();
        let edited = vec![SidebarEntry::new(
            "ups-sidebar-18446744073709551615",
            SidebarDefinition::named("Last"),
        )];
        let edited_store = apply_submission(&store, Submission::edit(edited)).unwrap();
        assert_eq!(edited_store.last_allocated_id(), u64::MAX);

        let err = apply_submission(&edited_store, Submission::add("Next")).unwrap_err();

        assert_eq!(err, PagebarError::CounterExhausted(u64::MAX));
        assert_eq!(edited_store.len(), 1);
    }

    #[test]
    fn test_delete_removes_entry_and_keeps_counter() {
        let store = two_sidebars();

        let next = apply_submission(&store, Submission::delete(["ups-sidebar-1"])).unwrap();

        assert!(!next.contains(&SidebarId::new("ups-sidebar-1")));
        assert!(next.contains(&SidebarId::new("ups-sidebar-2")));
        assert_eq!(next.last_allocated_id(), 2);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let store = two_sidebars();
        let next = apply_submission(&store, Submission::delete(["ups-sidebar-9"])).unwrap();
        assert_eq!(next, store);
    }

    #[test]
    fn test_add_then_delete_in_one_submission() {
        let store = two_sidebars();
        let input = Submission {
            add_sidebar: Some("Three".to_string()),
            delete: vec![SidebarId::new("ups-sidebar-3")],
            sidebars: None,
        };

        let next = apply_submission(&store, input).unwrap();

        assert_eq!(next.len(), 2);
        assert_eq!(next.last_allocated_id(), 3);
    }

    #[test]
    fn test_edits_pass_through() {
        let store = two_sidebars();
        let mut edited: Vec<SidebarEntry> = store.entries().to_vec();
        edited[0].definition.description = "Shown on docs".to_string();
        edited[0].definition.assign("page", 12);
        edited[1].definition.cascade_to_children = true;

        let next = apply_submission(&store, Submission::edit(edited.clone())).unwrap();

        assert_eq!(next.entries(), edited.as_slice());
        assert_eq!(next.last_allocated_id(), 2);
    }

    #[test]
    fn test_edits_with_delete_drop_the_deleted_entry() {
        let store = two_sidebars();
        let mut edited: Vec<SidebarEntry> = store.entries().to_vec();
        edited[1].definition.name = "Renamed".to_string();
        let input = Submission {
            delete: vec![SidebarId::new("ups-sidebar-1")],
            ..Submission::edit(edited)
        };

        let next = apply_submission(&store, input).unwrap();

        assert_eq!(next.len(), 1);
        assert_eq!(next.entries()[0].definition.name, "Renamed");
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let store = two_sidebars();
        let edited = vec![
            SidebarEntry::new("ups-sidebar-1", SidebarDefinition::named("a")),
            SidebarEntry::new("ups-sidebar-1", SidebarDefinition::named("b")),
        ];

        let err = apply_submission(&store, Submission::edit(edited)).unwrap_err();

        assert!(err.is_validation());
        assert!(matches!(err, PagebarError::DuplicateSidebar(_)));
        assert_eq!(store.len(), 2);
    }
}
