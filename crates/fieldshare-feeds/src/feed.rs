//! JSONFeed-shaped structures.
//!
//! Field names and the `_geo`/`_meta` extensions are the wire contract
//! consumed by the content site; serde renames keep the Rust names
//! idiomatic.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub const JSONFEED_VERSION: &str = "https://jsonfeed.org/version/1";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// `_geo` extension on a feed item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// GeoJSON order: `[longitude, latitude]`.
    pub coordinates: [f64; 2],
}

/// `_meta` extension on a feed item.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedItemMeta {
    /// Observation date, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "itemCount", default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u64>,
    #[serde(rename = "imageCount", default, skip_serializing_if = "Option::is_none")]
    pub image_count: Option<u64>,
    #[serde(rename = "videoCount", default, skip_serializing_if = "Option::is_none")]
    pub video_count: Option<u64>,
    #[serde(rename = "audioCount", default, skip_serializing_if = "Option::is_none")]
    pub audio_count: Option<u64>,
    #[serde(rename = "idCount", default, skip_serializing_if = "Option::is_none")]
    pub id_count: Option<u64>,
    #[serde(rename = "tagCount", default, skip_serializing_if = "Option::is_none")]
    pub tag_count: Option<u64>,
    #[serde(rename = "userCount", default, skip_serializing_if = "Option::is_none")]
    pub user_count: Option<u64>,
}

impl FeedItemMeta {
    pub fn is_empty(&self) -> bool {
        *self == FeedItemMeta::default()
    }
}

/// One entry in a feed: the projection of an item, a collection or a user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<FeedAuthor>,
    #[serde(rename = "_geo", default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoPoint>,
    #[serde(rename = "_meta", default, skip_serializing_if = "FeedItemMeta::is_empty")]
    pub meta: FeedItemMeta,
}

impl FeedItem {
    /// GeoJSON coordinates, when present.
    pub fn coordinates(&self) -> Option<[f64; 2]> {
        self.geo.as_ref().map(|g| g.coordinates)
    }
}

/// `_meta` on a feed page. `item_count` is the grand total across all
/// pages, not the page's length.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedMeta {
    #[serde(rename = "itemCount")]
    pub item_count: u64,
    #[serde(rename = "pageNumber")]
    pub page_number: u64,
    #[serde(rename = "pageCount")]
    pub page_count: u64,
}

/// One feed page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub version: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub author: FeedAuthor,
    pub home_page_url: String,
    pub feed_url: String,
    /// Always present, even on the last page: consumers treat a missing
    /// next page as end-of-feed.
    pub next_url: String,
    pub items: Vec<FeedItem>,
    #[serde(rename = "_meta")]
    pub meta: FeedMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_serializes_camel_case() {
        let meta = FeedItemMeta {
            item_count: Some(3),
            image_count: Some(1),
            ..Default::default()
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["itemCount"], 3);
        assert_eq!(json["imageCount"], 1);
        assert!(json.get("videoCount").is_none());
    }

    #[test]
    fn empty_meta_is_omitted_on_items() {
        let item = FeedItem {
            id: "x".to_string(),
            title: "T".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("_meta").is_none());
        assert!(json.get("_geo").is_none());
        assert!(json.get("tags").is_none());
    }

    #[test]
    fn feed_round_trips() {
        let feed = Feed {
            version: JSONFEED_VERSION.to_string(),
            title: "Items".to_string(),
            author: FeedAuthor {
                name: "alice".to_string(),
                url: None,
            },
            home_page_url: "https://app.example/".to_string(),
            feed_url: "https://files.example/alice/_index/items/index.json".to_string(),
            next_url: "https://files.example/alice/_index/items/index_2.json".to_string(),
            items: vec![],
            meta: FeedMeta {
                item_count: 0,
                page_number: 1,
                page_count: 1,
            },
            ..Default::default()
        };
        let json = serde_json::to_string(&feed).unwrap();
        let back: Feed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, feed);
    }
}
