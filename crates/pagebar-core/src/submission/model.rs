//! Submission model.

use serde::{Deserialize, Serialize};

use crate::sidebar::{SidebarEntry, SidebarId};

/// One settings form submission.
///
/// `add_sidebar` and `delete` are the form's action fields. `sidebars` is the
/// full edited snapshot the form layer produced; `None` means the form sent
/// no edits (e.g. the standalone "add sidebar" form).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_sidebar: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delete: Vec<SidebarId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebars: Option<Vec<SidebarEntry>>,
}

impl Submission {
    /// A submission that only asks for a new sidebar.
    pub fn add(name: impl Into<String>) -> Self {
        Self {
            add_sidebar: Some(name.into()),
            ..Self::default()
        }
    }

    /// A submission that only deletes sidebars.
    pub fn delete<I>(ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SidebarId>,
    {
        Self {
            delete: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// A submission carrying an edited snapshot.
    pub fn edit(sidebars: Vec<SidebarEntry>) -> Self {
        Self {
            sidebars: Some(sidebars),
            ..Self::default()
        }
    }
}
