//! Reverse placement index.

use std::collections::HashMap;

use crate::error::{PagebarError, Result};
use crate::placement::ViewedPage;
use crate::sidebar::{ItemId, SidebarId, SidebarStore};

/// content type → item → position of the first sidebar claiming it
type PositionMap = HashMap<String, HashMap<ItemId, usize>>;

/// `(content type, item) → sidebar` lookup built from one snapshot.
///
/// Entries are indexed in declaration order and never overwritten, so the
/// earliest sidebar keeps every claim. Resolving takes the earliest of the
/// direct claim on the page and the cascading claim on its parent, which is
/// exactly what [`super::resolve_sidebar`] returns.
#[derive(Debug, Clone, Default)]
pub struct PlacementIndex {
    ids: Vec<SidebarId>,
    direct: PositionMap,
    cascade: PositionMap,
}

impl PlacementIndex {
    pub fn build(store: &SidebarStore) -> Self {
        let mut index = Self::default();

        for (position, entry) in store.iter().enumerate() {
            index.ids.push(entry.id.clone());
            let definition = &entry.definition;

            for (content_type, items) in &definition.locations {
                for &item in items {
                    claim(&mut index.direct, content_type, item, position);
                    if definition.cascade_to_children {
                        claim(&mut index.cascade, content_type, item, position);
                    }
                }
            }
        }

        tracing::debug!(
            sidebars = index.ids.len(),
            content_types = index.direct.len(),
            "Built placement index"
        );
        index
    }

    /// Same contract as [`super::resolve_sidebar`].
    pub fn resolve(&self, default_id: &SidebarId, page: Option<&ViewedPage>) -> Result<SidebarId> {
        let page = page.ok_or(PagebarError::NoActivePage)?;
        let content_type = page.content_type.as_str();

        let direct = lookup(&self.direct, content_type, page.id);
        let inherited = page
            .parent()
            .and_then(|parent| lookup(&self.cascade, content_type, parent));

        Ok(match direct.into_iter().chain(inherited).min() {
            Some(position) => self.ids[position].clone(),
            None => default_id.clone(),
        })
    }

    /// Number of sidebars the index was built from.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn claim(map: &mut PositionMap, content_type: &str, item: ItemId, position: usize) {
    map.entry(content_type.to_string())
        .or_default()
        .entry(item)
        .or_insert(position);
}

fn lookup(map: &PositionMap, content_type: &str, item: ItemId) -> Option<usize> {
    map.get(content_type)?.get(&item).copied()
}
