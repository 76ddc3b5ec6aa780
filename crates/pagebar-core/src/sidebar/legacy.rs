//! Loose persisted sidebar records and their normalization.
//!
//! Older stores kept a flat `pages` list instead of typed `locations`, wrote
//! the cascade flag as `"on"`/`"off"`, and sometimes left a singular
//! `location` key behind. [`SidebarRecord`] accepts all of those shapes;
//! [`normalize_legacy`] turns one into a [`SidebarDefinition`].

use serde::de::{self, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::model::{ItemId, Locations, SidebarDefinition, SidebarId};
use crate::error::PagebarError;

/// Content type that legacy `pages` lists are filed under.
pub const LEGACY_PAGE_TYPE: &str = "page";

/// A set of content item ids as found on disk.
///
/// Accepts a plain list (`[3, 4]`) or the older id → title table
/// (`{ "3" = "About", "4" = "Team" }`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ItemSet(pub BTreeSet<ItemId>);

impl<'de> Deserialize<'de> for ItemSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            List(Vec<ItemId>),
            Titled(BTreeMap<String, IgnoredAny>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::List(ids) => Ok(ItemSet(ids.into_iter().collect())),
            Repr::Titled(titled) => titled
                .keys()
                .map(|key| {
                    key.parse::<ItemId>().map_err(|_| {
                        de::Error::custom(format!("invalid content item id '{key}'"))
                    })
                })
                .collect::<Result<BTreeSet<_>, _>>()
                .map(ItemSet),
        }
    }
}

/// One sidebar as persisted, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SidebarRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_widget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_widget: Option<String>,
    /// Cascade flag; `true`/`false` or the legacy `"on"`/`"off"`.
    #[serde(
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub children: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<BTreeMap<String, ItemSet>>,
    /// Pre-`locations` page list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<ItemSet>,
    /// Stray artifact of an old admin form. Read so it can be reported, never written.
    #[serde(default, skip_serializing)]
    pub location: Option<IgnoredAny>,
}

impl SidebarRecord {
    /// Returns true if the record still carries keys that are no longer persisted.
    pub fn has_legacy_keys(&self) -> bool {
        self.pages.is_some() || self.location.is_some()
    }
}

impl From<&SidebarDefinition> for SidebarRecord {
    fn from(def: &SidebarDefinition) -> Self {
        SidebarRecord {
            name: Some(def.name.clone()),
            description: Some(def.description.clone()),
            before_title: Some(def.before_title.clone()),
            after_title: Some(def.after_title.clone()),
            before_widget: Some(def.before_widget.clone()),
            after_widget: Some(def.after_widget.clone()),
            children: Some(def.cascade_to_children),
            locations: Some(
                def.locations
                    .iter()
                    .map(|(content_type, ids)| (content_type.clone(), ItemSet(ids.clone())))
                    .collect(),
            ),
            pages: None,
            location: None,
        }
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        None => None,
        Some(Flag::Bool(on)) => Some(on),
        Some(Flag::Text(text)) => {
            let text = text.trim();
            Some(text.eq_ignore_ascii_case("on") || text.eq_ignore_ascii_case("true") || text == "1")
        }
    })
}

/// Converts a persisted record into the current definition shape.
///
/// - `pages` is folded into `locations["page"]` unless that entry already exists.
/// - `pages` and `location` are dropped.
/// - A record with neither `pages` nor `locations` is malformed; it is logged
///   and loaded with empty locations.
pub fn normalize_legacy(id: &SidebarId, record: SidebarRecord) -> SidebarDefinition {
    if record.location.is_some() {
        tracing::debug!(sidebar = %id, "Dropping stray 'location' key");
    }

    let mut locations: Locations = match record.locations {
        Some(typed) => typed
            .into_iter()
            .map(|(content_type, ItemSet(ids))| (content_type, ids))
            .collect(),
        None if record.pages.is_none() => {
            let err = PagebarError::MalformedLegacyRecord { id: id.to_string() };
            tracing::warn!(error = %err, "Treating sidebar as having no locations");
            Locations::new()
        }
        None => Locations::new(),
    };

    if let Some(ItemSet(pages)) = record.pages {
        if !locations.contains_key(LEGACY_PAGE_TYPE) {
            tracing::debug!(
                sidebar = %id,
                pages = pages.len(),
                "Migrating legacy page list into locations"
            );
            locations.insert(LEGACY_PAGE_TYPE.to_string(), pages);
        }
    }

    SidebarDefinition {
        name: record.name.unwrap_or_default(),
        description: record.description.unwrap_or_default(),
        before_title: record.before_title.unwrap_or_default(),
        after_title: record.after_title.unwrap_or_default(),
        before_widget: record.before_widget.unwrap_or_default(),
        after_widget: record.after_widget.unwrap_or_default(),
        cascade_to_children: record.children.unwrap_or(false),
        locations,
    }
}
