//! Media attachments (photos, videos, audio).

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One media attachment on an item. Identity is `id`, unique per item per
/// media kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

/// Merge two media lists: union by `id`, the incoming entry wins on a
/// collision, result sorted ascending by `id`. Entries without an id are
/// dropped. Deterministic regardless of fetch order, which matters because
/// ordering feeds primary-image selection downstream.
pub fn merge_media(existing: &[Media], incoming: &[Media]) -> Vec<Media> {
    let mut by_id: BTreeMap<String, Media> = BTreeMap::new();
    for media in existing.iter().chain(incoming) {
        if media.id.is_empty() {
            continue;
        }
        by_id.insert(media.id.clone(), media.clone());
    }
    by_id.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(id: &str) -> Media {
        Media {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn merge_sorts_by_id() {
        let existing = vec![media("b"), media("a")];
        let merged = merge_media(&existing, &[]);
        assert_eq!(merged[0].id, "a");
        assert_eq!(merged[1].id, "b");
    }

    #[test]
    fn incoming_wins_on_collision() {
        let existing = vec![media("b"), media("a")];
        let incoming = vec![Media {
            id: "a".to_string(),
            width: Some(99),
            ..Default::default()
        }];
        let merged = merge_media(&existing, &incoming);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "a");
        assert_eq!(merged[0].width, Some(99));
        assert_eq!(merged[1].id, "b");
    }

    #[test]
    fn missing_id_is_dropped() {
        let merged = merge_media(&[media("")], &[media("x")]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "x");
    }
}
