//! Collection configuration.
//!
//! A collection is defined by a YAML file under `<user>/collections/`. Its
//! `identifications` and `tags` lists are allow-lists applied to the
//! collection's aggregate view; they never mutate member items.

use serde::{Deserialize, Serialize};

/// One entry in a collection's `identifications` allow-list: either a bare
/// species name or a name with extra tags to contribute to matching items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdentificationRule {
    Name(String),
    Detailed {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
    },
}

impl IdentificationRule {
    pub fn name(&self) -> &str {
        match self {
            IdentificationRule::Name(name) => name,
            IdentificationRule::Detailed { name, .. } => name,
        }
    }

    /// Tags this rule contributes to items carrying its identification.
    pub fn extra_tags(&self) -> &[String] {
        match self {
            IdentificationRule::Name(_) => &[],
            IdentificationRule::Detailed { tags, .. } => tags,
        }
    }
}

/// Collection metadata as authored in `<user>/collections/<name>.yaml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    /// Hidden collections are excluded from roll-up indexes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifications: Option<Vec<IdentificationRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Item paths (`user/items/...`) manually added to the collection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_items: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admins: Vec<String>,
}

impl CollectionConfig {
    pub fn is_hidden(&self) -> bool {
        self.hide.unwrap_or(false)
    }

    /// Display title: the configured one, else the name with underscores as
    /// spaces and the first letter upper-cased.
    pub fn display_title(&self, name: &str) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| default_collection_title(name))
    }
}

/// Default display title for a collection name: `frog_ponds` → `Frog ponds`.
pub fn default_collection_title(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}

/// Directory name for a collection: lower-cased, whitespace as underscores.
pub fn collection_dir(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}
