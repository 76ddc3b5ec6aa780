//! File-backed [`ContentSource`].
//!
//! Lets the CLI (and tests) stand in for a host's content database:
//!
//! ```toml
//! [viewed]
//! id = 70
//! parent_id = 7
//! content_type = "page"
//!
//! [[items.page]]
//! id = 7
//! title = "Guides"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use pagebar_core::content::{ContentItem, ContentSource};
use pagebar_core::error::{PagebarError, Result};
use pagebar_core::placement::ViewedPage;

use crate::storage::AtomicTomlFile;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCatalog {
    /// Page being rendered, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewed: Option<ViewedPage>,
    /// Content type → items, in listing order.
    #[serde(default)]
    pub items: BTreeMap<String, Vec<ContentItem>>,
}

impl ContentCatalog {
    /// Reads a catalog file.
    pub fn from_path(path: &Path) -> Result<Self> {
        AtomicTomlFile::<ContentCatalog>::new(path.to_path_buf())
            .load()?
            .ok_or_else(|| PagebarError::not_found("content catalog", path.display().to_string()))
    }

    /// Replaces the viewed page.
    pub fn with_viewed(mut self, viewed: Option<ViewedPage>) -> Self {
        self.viewed = viewed;
        self
    }
}

impl ContentSource for ContentCatalog {
    fn current_viewed_page(&self) -> Option<ViewedPage> {
        self.viewed.clone()
    }

    fn list_content_items(&self, content_type: &str) -> Vec<ContentItem> {
        self.items.get(content_type).cloned().unwrap_or_default()
    }
}
