//! Linear-scan placement resolver.

use crate::error::{PagebarError, Result};
use crate::placement::ViewedPage;
use crate::sidebar::{SidebarDefinition, SidebarId, SidebarStore};

/// Returns the id of the first sidebar, in declaration order, that claims `page`.
///
/// A sidebar claims a page when the page id is in its location set for the
/// page's content type, or, with cascading on, when the page's parent is.
/// Falls back to `default_id` when no sidebar claims the page.
///
/// # Errors
///
/// `NoActivePage` when `page` is `None`. Callers are expected to skip
/// resolution entirely on screens without a viewed item.
///
/// # Examples
///
/// ```
/// use pagebar_core::placement::{ViewedPage, resolve_sidebar};
/// use pagebar_core::sidebar::{SidebarId, SidebarStore};
///
/// let store = SidebarStore::new();
/// let default = SidebarId::new("default-sidebar");
/// let page = ViewedPage::new(5, "page");
/// assert_eq!(resolve_sidebar(&store, &default, Some(&page)).unwrap(), default);
/// ```
pub fn resolve_sidebar(
    store: &SidebarStore,
    default_id: &SidebarId,
    page: Option<&ViewedPage>,
) -> Result<SidebarId> {
    let page = page.ok_or(PagebarError::NoActivePage)?;

    let matched = store
        .iter()
        .filter(|entry| entry.definition.has_locations())
        .find(|entry| claims(&entry.definition, page));

    match matched {
        Some(entry) => {
            tracing::debug!(sidebar = %entry.id, page = page.id, "Resolved sidebar");
            Ok(entry.id.clone())
        }
        None => Ok(default_id.clone()),
    }
}

fn claims(definition: &SidebarDefinition, page: &ViewedPage) -> bool {
    let Some(ids) = definition.location_set(&page.content_type) else {
        return false;
    };
    if ids.contains(&page.id) {
        return true;
    }
    definition.cascade_to_children && page.parent().is_some_and(|parent| ids.contains(&parent))
}
