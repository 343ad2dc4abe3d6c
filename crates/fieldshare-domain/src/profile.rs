//! User profile metadata.

use serde::{Deserialize, Serialize};

/// `<user>/profile.yaml` — the users index input. Users without a profile
/// are skipped by the index builder.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Year the user joined, e.g. `"2019"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined: Option<String>,
}

impl Profile {
    /// Year joined, when present and parseable.
    pub fn joined_year(&self) -> Option<i32> {
        self.joined.as_deref()?.trim().parse().ok()
    }
}
