//! Viewed page context.

use serde::{Deserialize, Serialize};

use crate::sidebar::ItemId;

/// The content item being rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewedPage {
    pub id: ItemId,
    /// Parent item; `None` or `Some(0)` for top-level items.
    #[serde(default)]
    pub parent_id: Option<ItemId>,
    pub content_type: String,
}

impl ViewedPage {
    pub fn new(id: ItemId, content_type: impl Into<String>) -> Self {
        Self {
            id,
            parent_id: None,
            content_type: content_type.into(),
        }
    }

    pub fn with_parent(mut self, parent_id: ItemId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// The parent id, with the host's `0` sentinel mapped to `None`.
    pub fn parent(&self) -> Option<ItemId> {
        self.parent_id.filter(|&parent| parent != 0)
    }
}
