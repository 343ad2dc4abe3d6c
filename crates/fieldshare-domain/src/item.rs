//! The canonical observation record.
//!
//! One item is one YAML file in the per-user store. Field names and order
//! here are the store contract: serialization preserves declaration order
//! and omits empty fields, keeping diffs minimal across re-imports.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::location::Location;
use crate::media::{merge_media, Media};

/// One identification entry (a species name and who proposed it).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by: Vec<String>,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Provenance entry: which provider this item was observed on.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// A comment attached to an item. Comments are append-only; `ref` is the
/// identity key when merging.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

fn is_true(v: &bool) -> bool {
    *v
}

fn default_true() -> bool {
    true
}

/// One canonical observation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Identifications, stored under the `id` key.
    #[serde(rename = "id", default, skip_serializing_if = "Vec::is_empty")]
    pub identifications: Vec<Identification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<DateTime<FixedOffset>>,
    /// True when the provider's capture time was the selected `datetime`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_datetime_used: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<Media>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<Media>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audio: Vec<Media>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<SourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    #[serde(
        rename = "allowComments",
        default = "default_true",
        skip_serializing_if = "is_true"
    )]
    pub allow_comments: bool,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            identifications: Vec::new(),
            datetime: None,
            photo_datetime_used: None,
            location_name: None,
            latitude: None,
            longitude: None,
            accuracy: None,
            description: None,
            tags: Vec::new(),
            collections: Vec::new(),
            photos: Vec::new(),
            videos: Vec::new(),
            audio: Vec::new(),
            license: None,
            source: Vec::new(),
            created_at: None,
            updated_at: None,
            comments: Vec::new(),
            allow_comments: true,
        }
    }
}

fn drop_empty(value: &mut Option<String>) {
    if value.as_deref().is_some_and(|s| s.trim().is_empty()) {
        *value = None;
    }
}

impl Item {
    /// Normalize the record before validation or persistence: blank strings
    /// become absent, an incomplete or zero location is dropped entirely,
    /// media lists are deduplicated and sorted by id.
    pub fn clean(&mut self) {
        drop_empty(&mut self.location_name);
        drop_empty(&mut self.description);
        drop_empty(&mut self.license);

        match Location::from_pair(self.latitude, self.longitude) {
            Some(loc) => {
                self.latitude = Some(loc.latitude);
                self.longitude = Some(loc.longitude);
            }
            None => {
                self.latitude = None;
                self.longitude = None;
                self.accuracy = None;
            }
        }

        self.tags.retain(|t| !t.is_empty());
        self.collections.retain(|c| !c.is_empty());
        self.identifications.retain(|i| !i.name.trim().is_empty());
        self.source.retain(|s| !s.name.is_empty());

        self.photos = merge_media(&self.photos, &[]);
        self.videos = merge_media(&self.videos, &[]);
        self.audio = merge_media(&self.audio, &[]);
    }

    /// The item's validated location, if any.
    pub fn location(&self) -> Option<Location> {
        Location::from_pair(self.latitude, self.longitude)
    }

    pub fn has_media(&self) -> bool {
        !self.photos.is_empty() || !self.videos.is_empty() || !self.audio.is_empty()
    }

    /// Unique identification names, trimmed and sorted.
    pub fn id_names(&self) -> Vec<String> {
        self.identifications
            .iter()
            .map(|i| i.name.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Merge comment lists, append-only: existing entries keep their order,
/// unseen incoming entries (by `ref`) are appended.
pub fn merge_comments(existing: &[Comment], incoming: &[Comment]) -> Vec<Comment> {
    let mut merged = existing.to_vec();
    let seen: BTreeSet<&str> = existing.iter().map(|c| c.reference.as_str()).collect();
    for comment in incoming {
        if !seen.contains(comment.reference.as_str()) {
            merged.push(comment.clone());
        }
    }
    merged
}
