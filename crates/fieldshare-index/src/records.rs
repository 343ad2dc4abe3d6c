//! Typed load/save on top of the content store.
//!
//! Absent files load as `None`; unparsable files are `Malformed`, which
//! batch callers log and skip. Items are persisted as human-diffable YAML
//! in declaration order with empty fields omitted.

use fieldshare_domain::{CollectionConfig, Item, Profile};
use fieldshare_feeds::{page_file_name, render_atom, render_rss, Feed, FeedBundle};

use crate::error::IndexError;
use crate::store::ContentStore;

fn malformed<E: std::fmt::Display>(path: &str) -> impl FnOnce(E) -> IndexError + '_ {
    move |e| IndexError::malformed(path, e.to_string())
}

pub fn load_item(store: &dyn ContentStore, path: &str) -> Result<Option<Item>, IndexError> {
    match store.get(path)? {
        None => Ok(None),
        Some(raw) => serde_yaml::from_str(&raw).map(Some).map_err(malformed(path)),
    }
}

pub fn save_item(store: &dyn ContentStore, path: &str, item: &Item) -> Result<(), IndexError> {
    let yaml = serde_yaml::to_string(item)?;
    store.put(path, &yaml)?;
    Ok(())
}

pub fn load_collection_config(
    store: &dyn ContentStore,
    path: &str,
) -> Result<Option<CollectionConfig>, IndexError> {
    match store.get(path)? {
        None => Ok(None),
        Some(raw) => serde_yaml::from_str(&raw).map(Some).map_err(malformed(path)),
    }
}

pub fn load_profile(store: &dyn ContentStore, path: &str) -> Result<Option<Profile>, IndexError> {
    match store.get(path)? {
        None => Ok(None),
        Some(raw) => serde_yaml::from_str(&raw).map(Some).map_err(malformed(path)),
    }
}

pub fn load_feed_page(store: &dyn ContentStore, path: &str) -> Result<Option<Feed>, IndexError> {
    match store.get(path)? {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw).map(Some).map_err(malformed(path)),
    }
}

/// Write every page of a feed (JSON, RSS and Atom) plus the geo layer.
pub fn write_feed_bundle(
    store: &dyn ContentStore,
    dir: &str,
    bundle: &FeedBundle,
) -> Result<(), IndexError> {
    for (index, page) in bundle.pages.iter().enumerate() {
        let name = page_file_name(index + 1);
        store.put(
            &format!("{dir}/{name}.json"),
            &serde_json::to_string_pretty(page)?,
        )?;
        store.put(&format!("{dir}/{name}.rss.xml"), &render_rss(page)?)?;
        store.put(&format!("{dir}/{name}.atom.xml"), &render_atom(page)?)?;
    }
    if let Some(geo) = &bundle.geo {
        store.put(
            &format!("{dir}/index.geo.json"),
            &serde_json::to_string_pretty(geo)?,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    #[test]
    fn absent_records_load_as_none() {
        let store = MemStore::new();
        assert!(load_item(&store, "a/items/x.yaml").unwrap().is_none());
        assert!(load_profile(&store, "a/profile.yaml").unwrap().is_none());
        assert!(load_feed_page(&store, "a/_index/items/index.json")
            .unwrap()
            .is_none());
    }

    #[test]
    fn malformed_records_are_per_record_errors() {
        let store = MemStore::new();
        store.put("a/items/x.yaml", "tags: [unclosed").unwrap();
        let err = load_item(&store, "a/items/x.yaml").unwrap_err();
        assert!(err.is_per_record());
        assert!(err.to_string().contains("a/items/x.yaml"));
    }

    #[test]
    fn item_round_trip() {
        let store = MemStore::new();
        let mut item = Item {
            description: Some("A fox".to_string()),
            tags: vec!["dropbox".to_string()],
            ..Default::default()
        };
        item.clean();
        save_item(&store, "a/items/dropbox/2020/fox.yaml", &item).unwrap();
        let back = load_item(&store, "a/items/dropbox/2020/fox.yaml")
            .unwrap()
            .unwrap();
        assert_eq!(back, item);
    }
}
