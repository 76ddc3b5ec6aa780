//! Sidebar service.
//!
//! Wires the store, resolver and submission pipeline to an injected
//! [`SidebarRepository`]. Hosts construct one per site and hand it to
//! whatever renders pages or handles the settings form.

use std::sync::Arc;

use crate::content::{ChecklistItem, ContentSource};
use crate::error::{PagebarError, Result};
use crate::placement::resolve_sidebar;
use crate::sidebar::{
    ItemId, SidebarEntry, SidebarId, SidebarRegistration, SidebarRepository, SidebarStore,
};
use crate::submission::{Submission, apply_submission};

#[derive(Clone)]
pub struct SidebarService {
    repository: Arc<dyn SidebarRepository>,
}

impl SidebarService {
    pub fn new(repository: Arc<dyn SidebarRepository>) -> Self {
        Self { repository }
    }

    /// The current snapshot.
    pub fn sidebars(&self) -> Result<SidebarStore> {
        self.repository.load()
    }

    /// Sidebar to render for the host's current page.
    ///
    /// Screens without a viewed item get `default_id` and the resolver is not
    /// consulted.
    pub fn display_sidebar(
        &self,
        content: &dyn ContentSource,
        default_id: &SidebarId,
    ) -> Result<SidebarId> {
        let Some(page) = content.current_viewed_page() else {
            tracing::debug!("No viewed page, using default sidebar");
            return Ok(default_id.clone());
        };

        let store = self.repository.load()?;
        resolve_sidebar(&store, default_id, Some(&page))
    }

    /// Applies a settings submission and persists the result.
    pub fn submit(&self, submission: Submission) -> Result<SidebarStore> {
        self.repository
            .transact(&mut |store: &SidebarStore| {
                apply_submission(store, submission.clone())
            })
    }

    /// Creates a sidebar directly (the admin "add sidebar" action).
    ///
    /// Unlike a form submission, a blank name is reported as `InvalidName`.
    pub fn add_sidebar(&self, name: &str) -> Result<SidebarId> {
        let mut created = None;
        self.repository.transact(&mut |store: &SidebarStore| {
            let (next, id) = store.create_sidebar(name)?;
            created = Some(id);
            Ok(next)
        })?;
        created.ok_or_else(|| PagebarError::internal("sidebar creation produced no id"))
    }

    /// Deletes a sidebar. Unknown ids are a no-op.
    pub fn delete_sidebar(&self, id: &SidebarId) -> Result<SidebarStore> {
        self.submit(Submission::delete([id.clone()]))
    }

    /// Deletes every listed sidebar in one transaction.
    ///
    /// Returns how many of `ids` existed, counted against the snapshot the
    /// transaction actually replaced.
    pub fn delete_sidebars(&self, ids: &[SidebarId]) -> Result<usize> {
        let mut removed = 0;
        self.repository.transact(&mut |store: &SidebarStore| {
            let next = apply_submission(store, Submission::delete(ids.iter().cloned()))?;
            removed = store.len().saturating_sub(next.len());
            Ok(next)
        })?;
        Ok(removed)
    }

    /// Assigns or unassigns one item, going through the edit path of the pipeline.
    pub fn set_assignment(
        &self,
        id: &SidebarId,
        content_type: &str,
        item: ItemId,
        assigned: bool,
    ) -> Result<SidebarStore> {
        self.edit(id, |entry| {
            if assigned {
                entry.definition.assign(content_type, item);
            } else {
                entry.definition.unassign(content_type, item);
            }
        })
    }

    /// Turns child-page inheritance on or off for one sidebar.
    pub fn set_cascade(&self, id: &SidebarId, cascade: bool) -> Result<SidebarStore> {
        self.edit(id, |entry| entry.definition.cascade_to_children = cascade)
    }

    /// Registration arguments for every sidebar.
    pub fn registrations(&self) -> Result<Vec<SidebarRegistration>> {
        Ok(self.repository.load()?.registrations())
    }

    /// Checklist rows for one sidebar and content type.
    pub fn checklist(
        &self,
        content: &dyn ContentSource,
        id: &SidebarId,
        content_type: &str,
    ) -> Result<Vec<ChecklistItem>> {
        let items = content.list_content_items(content_type);
        self.repository.load()?.checklist(id, content_type, items)
    }

    fn edit<F>(&self, id: &SidebarId, change: F) -> Result<SidebarStore>
    where
        F: Fn(&mut SidebarEntry),
    {
        self.repository.transact(&mut |store: &SidebarStore| {
            let mut edited = store.entries().to_vec();
            let entry = edited
                .iter_mut()
                .find(|entry| &entry.id == id)
                .ok_or_else(|| PagebarError::not_found("sidebar", id.as_str()))?;
            change(entry);
            apply_submission(store, Submission::edit(edited))
        })
    }
}
