//! Roll-up feeds (index of indexes).
//!
//! Given a mapping of `name -> items`, each name becomes one synthetic
//! feed entry summarizing its items; the synthetic list then goes back
//! through the normal sort/paginate path to produce feeds like "all
//! collections" or "all users".

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use crate::feed::{FeedItem, FeedItemMeta, GeoPoint};
use crate::geojson::average_coord;
use crate::sort::sort_feed_items;

fn first_image(items: &[FeedItem]) -> Option<String> {
    items.iter().find_map(|i| i.image.clone())
}

fn first_published(items: &[FeedItem]) -> Option<DateTime<FixedOffset>> {
    items.iter().find_map(|i| i.date_published)
}

fn first_modified(items: &[FeedItem]) -> Option<DateTime<FixedOffset>> {
    items.iter().find_map(|i| i.date_modified)
}

/// Build the synthetic entries for a roll-up, sorted into feed order.
/// `mixin` supplies per-entry identity and extra metadata (the id/url of
/// the underlying aggregate feed, featured flags, facet counts).
pub fn rollup_items<F>(index: &BTreeMap<String, Vec<FeedItem>>, mut mixin: F) -> Vec<FeedItem>
where
    F: FnMut(&str, &[FeedItem], FeedItem) -> FeedItem,
{
    let mut entries: Vec<FeedItem> = index
        .iter()
        .map(|(name, items)| {
            let base = FeedItem {
                id: String::new(),
                url: None,
                title: name.replace('_', " "),
                content_text: Some(format!("{} items", items.len())),
                image: first_image(items),
                date_published: first_published(items),
                date_modified: first_modified(items),
                tags: Vec::new(),
                author: None,
                geo: average_coord(items).map(|coordinates| GeoPoint { coordinates }),
                meta: FeedItemMeta {
                    item_count: Some(items.len() as u64),
                    date: first_published(items)
                        .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string()),
                    ..Default::default()
                },
            };
            mixin(name, items, base)
        })
        .collect();

    sort_feed_items(&mut entries);
    entries
}
