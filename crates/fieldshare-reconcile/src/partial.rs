//! User-authored partial items.

use chrono::{DateTime, FixedOffset};
use fieldshare_domain::{Identification, Location};
use serde::{Deserialize, Serialize};

/// A fragment of the item schema authored by the user, usually embedded in
/// a caption or description on the provider side. Explicit user annotation
/// beats automatic provider metadata during reconciliation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialItem {
    #[serde(rename = "id", default, skip_serializing_if = "Vec::is_empty")]
    pub identifications: Vec<Identification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<DateTime<FixedOffset>>,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(
        rename = "allowComments",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub allow_comments: Option<bool>,
}

impl PartialItem {
    /// The user-authored location override, when valid.
    pub fn location(&self) -> Option<Location> {
        Location::from_pair(self.latitude, self.longitude)
    }

    pub fn is_empty(&self) -> bool {
        *self == PartialItem::default()
    }
}
