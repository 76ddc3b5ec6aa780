//! Content collaborator models and trait.
//!
//! The host owns pages, posts and custom content. Pagebar only needs to know
//! which item is being viewed and, for admin checklists, which items exist.

use serde::{Deserialize, Serialize};

use crate::placement::ViewedPage;
use crate::sidebar::ItemId;

/// A content item as listed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ItemId,
    pub title: String,
}

impl ContentItem {
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// One row of a sidebar's assignment checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub item: ContentItem,
    /// Whether the item is assigned to the sidebar being edited.
    pub checked: bool,
}

/// Host-side source of content information.
pub trait ContentSource: Send + Sync {
    /// The page currently being rendered, if any.
    ///
    /// Returns `None` on screens that show no content item.
    fn current_viewed_page(&self) -> Option<ViewedPage>;

    /// All items of a content type, in the order the host lists them.
    fn list_content_items(&self, content_type: &str) -> Vec<ContentItem>;
}
