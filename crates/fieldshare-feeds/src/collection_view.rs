//! Collection view filtering.
//!
//! A collection's `identifications` and `tags` lists are allow-lists over
//! the facet tags of its member items. Filtering shapes the collection's
//! derived feed only; the canonical item files are never touched.

use std::collections::{BTreeMap, BTreeSet};

use fieldshare_domain::{
    id_facet, is_id_facet, is_tag_facet, merge_tags, tag_facet, CollectionConfig,
};

use crate::feed::FeedItem;
use crate::sort::sort_feed_items;

fn dedup_by_id(items: Vec<FeedItem>) -> Vec<FeedItem> {
    let mut seen = BTreeSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect()
}

/// Apply a collection's filtering rules to its gathered items and sort the
/// result into feed order.
pub fn resolve_collection_view(items: Vec<FeedItem>, config: &CollectionConfig) -> Vec<FeedItem> {
    let mut items = dedup_by_id(items);

    // Tags contributed per identification facet, e.g. id~Fox -> tag~mammal.
    let mut contributed: BTreeMap<String, Vec<String>> = BTreeMap::new();

    if let Some(rules) = &config.identifications {
        let allowed: BTreeSet<String> = rules.iter().map(|r| id_facet(r.name())).collect();

        for rule in rules {
            let extra: Vec<String> = rule.extra_tags().iter().map(|t| tag_facet(t)).collect();
            if !extra.is_empty() {
                contributed.insert(id_facet(rule.name()), extra);
            }
        }

        // Only keep items carrying an allowed identification, and hide the
        // other identifications in this view.
        items.retain(|item| item.tags.iter().any(|t| allowed.contains(t)));
        for item in &mut items {
            item.tags
                .retain(|t| !is_id_facet(t) || allowed.contains(t));

            let extras: Vec<String> = item
                .tags
                .iter()
                .filter_map(|t| contributed.get(t))
                .flatten()
                .cloned()
                .collect();
            if !extras.is_empty() {
                item.tags = merge_tags([item.tags.as_slice(), extras.as_slice()]);
            }
        }
    }

    if let Some(tags) = &config.tags {
        let mut allowed: BTreeSet<String> = tags.iter().map(|t| tag_facet(t)).collect();
        for extras in contributed.values() {
            allowed.extend(extras.iter().cloned());
        }
        for item in &mut items {
            item.tags.retain(|t| !is_tag_facet(t) || allowed.contains(t));
        }
    }

    let mut items = dedup_by_id(items);
    sort_feed_items(&mut items);
    items
}
