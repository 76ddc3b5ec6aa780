//! Sidebar domain models.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Prefix of every id handed out by the store's allocator.
pub const SIDEBAR_ID_PREFIX: &str = "ups-sidebar-";

/// Identifier of a content item (page, post, custom type entry).
pub type ItemId = u64;

/// Content-type name → ids of the items assigned to a sidebar.
pub type Locations = BTreeMap<String, BTreeSet<ItemId>>;

/// Opaque sidebar identifier.
///
/// Ids allocated by the store look like `ups-sidebar-<N>`. Host-provided ids
/// (e.g. a theme's `default-sidebar`) are accepted as-is and simply have no
/// numeric suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SidebarId(String);

impl SidebarId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the id for the `n`th allocation.
    pub fn allocated(n: u64) -> Self {
        Self(format!("{SIDEBAR_ID_PREFIX}{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number after the last `-`, if there is one.
    ///
    /// ```
    /// use pagebar_core::sidebar::SidebarId;
    ///
    /// assert_eq!(SidebarId::new("ups-sidebar-12").numeric_suffix(), Some(12));
    /// assert_eq!(SidebarId::new("default-sidebar").numeric_suffix(), None);
    /// ```
    pub fn numeric_suffix(&self) -> Option<u64> {
        self.0.rsplit('-').next()?.parse().ok()
    }
}

impl fmt::Display for SidebarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SidebarId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SidebarId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SidebarId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One configured sidebar.
///
/// This is a version-agnostic domain model. Legacy persisted shapes are
/// converted into it by [`super::normalize_legacy`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarDefinition {
    /// Display label
    pub name: String,
    pub description: String,
    /// Markup emitted before each widget title
    pub before_title: String,
    /// Markup emitted after each widget title
    pub after_title: String,
    /// Markup emitted before each widget
    pub before_widget: String,
    /// Markup emitted after each widget
    pub after_widget: String,
    /// When set, direct children of an assigned item inherit this sidebar.
    #[serde(rename = "children", alias = "cascade_to_children")]
    pub cascade_to_children: bool,
    /// Items explicitly assigned to this sidebar, partitioned by content type.
    pub locations: Locations,
}

impl SidebarDefinition {
    /// Creates a definition with every fragment empty and no locations.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns true if at least one content type has an assignment set.
    pub fn has_locations(&self) -> bool {
        !self.locations.is_empty()
    }

    /// Returns the assigned ids for a content type.
    pub fn location_set(&self, content_type: &str) -> Option<&BTreeSet<ItemId>> {
        self.locations.get(content_type)
    }

    /// Returns true if `item` is explicitly assigned under `content_type`.
    pub fn is_assigned(&self, content_type: &str, item: ItemId) -> bool {
        self.location_set(content_type)
            .is_some_and(|ids| ids.contains(&item))
    }

    /// Assigns an item to this sidebar.
    pub fn assign(&mut self, content_type: impl Into<String>, item: ItemId) {
        self.locations
            .entry(content_type.into())
            .or_default()
            .insert(item);
    }

    /// Removes an item assignment, dropping the content type once it is empty.
    pub fn unassign(&mut self, content_type: &str, item: ItemId) -> bool {
        let Some(ids) = self.locations.get_mut(content_type) else {
            return false;
        };
        let removed = ids.remove(&item);
        if ids.is_empty() {
            self.locations.remove(content_type);
        }
        removed
    }
}

/// A sidebar id paired with its definition, as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarEntry {
    pub id: SidebarId,
    #[serde(flatten)]
    pub definition: SidebarDefinition,
}

impl SidebarEntry {
    pub fn new(id: impl Into<SidebarId>, definition: SidebarDefinition) -> Self {
        Self {
            id: id.into(),
            definition,
        }
    }
}

/// Arguments handed to the host when it registers a widget area.
///
/// Location and legacy page data never leave the store through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarRegistration {
    pub id: SidebarId,
    pub name: String,
    pub description: String,
    pub before_title: String,
    pub after_title: String,
    pub before_widget: String,
    pub after_widget: String,
}

impl From<&SidebarEntry> for SidebarRegistration {
    fn from(entry: &SidebarEntry) -> Self {
        let def = &entry.definition;
        SidebarRegistration {
            id: entry.id.clone(),
            name: def.name.clone(),
            description: def.description.clone(),
            before_title: def.before_title.clone(),
            after_title: def.after_title.clone(),
            before_widget: def.before_widget.clone(),
            after_widget: def.after_widget.clone(),
        }
    }
}
