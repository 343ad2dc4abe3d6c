//! Whole-pipeline tests against the in-memory store: canonical items in,
//! every derived index out.

use fieldshare_feeds::{Feed, FeedConfig};
use fieldshare_index::{
    build_all_collections, build_user_collections, build_user_items, build_users_index, ContentStore,
    MemStore, SiteConfig,
};
use url::Url;

fn config() -> SiteConfig {
    let mut cfg = SiteConfig::new(
        "/tmp/content".into(),
        FeedConfig::new(
            "Fieldshare",
            Url::parse("https://fieldshare.example.org/").unwrap(),
            Url::parse("https://files.fieldshare.example.org/").unwrap(),
        ),
    );
    cfg.min_rollup_items = 1;
    cfg
}

fn item_yaml(name: &str, created: &str, collections: &[&str]) -> String {
    let mut yaml = format!(
        "\
id:
  - name: {name}
photos:
  - source: flickr
    id: 'p-{created}'
    thumbnail_url: https://files.example/{created}.jpg
tags:
  - flickr
  - night
latitude: -37.1
longitude: 145.2
created_at: {created}T00:00:00+00:00
updated_at: {created}T12:00:00+00:00
"
    );
    if !collections.is_empty() {
        yaml.push_str("collections:\n");
        for c in collections {
            yaml.push_str(&format!("  - {c}\n"));
        }
    }
    yaml
}

fn seed(store: &MemStore) {
    store
        .put(
            "alice/items/flickr/2020/1.yaml",
            &item_yaml("Vulpes vulpes", "2020-01-03", &["foxes"]),
        )
        .unwrap();
    store
        .put(
            "alice/items/flickr/2021/2.yaml",
            &item_yaml("Tyto alba", "2021-05-01", &["foxes"]),
        )
        .unwrap();
    store
        .put(
            "bob/items/dropbox/2021/3.yaml",
            &item_yaml("Vulpes vulpes", "2021-06-01", &["foxes"]),
        )
        .unwrap();
    store
        .put("alice/profile.yaml", "name: Alice\njoined: '2019'\n")
        .unwrap();
    store
        .put("bob/profile.yaml", "name: Bob\n")
        .unwrap();
    store
        .put(
            "alice/collections/foxes.yaml",
            "\
title: Fox Watch
description: Foxes of the ranges
identifications:
  - name: Vulpes vulpes
    tags: [mammal]
members:
  - bob
",
        )
        .unwrap();
}

fn read_feed(store: &MemStore, path: &str) -> Feed {
    let raw = store.get(path).unwrap().unwrap_or_else(|| panic!("missing {path}"));
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn full_pipeline_produces_every_index() {
    let store = MemStore::new();
    let cfg = config();
    seed(&store);

    build_user_items(&store, &cfg, "alice").unwrap();
    build_user_items(&store, &cfg, "bob").unwrap();
    build_user_collections(&store, &cfg, "alice").unwrap();
    build_all_collections(&store, &cfg).unwrap();
    build_users_index(&store, &cfg).unwrap();

    // User item feed: newest first.
    let items = read_feed(&store, "alice/_index/items/index.json");
    assert_eq!(items.meta.item_count, 2);
    assert_eq!(items.items[0].title, "Tyto alba");

    // Aggregate: bob's fox joins, alice's owl is filtered out by the
    // identifications allow-list, contributed tag appears.
    let aggregate = read_feed(
        &store,
        "alice/_index/collections/foxes/aggregate/index.json",
    );
    assert_eq!(aggregate.title, "Fox Watch");
    assert_eq!(aggregate.meta.item_count, 2);
    assert!(aggregate
        .items
        .iter()
        .all(|i| i.tags.contains(&"id~Vulpes vulpes".to_string())));
    assert!(aggregate
        .items
        .iter()
        .all(|i| i.tags.contains(&"tag~mammal".to_string())));
    let authors: Vec<&str> = aggregate
        .items
        .iter()
        .filter_map(|i| i.author.as_ref().map(|a| a.name.as_str()))
        .collect();
    assert!(authors.contains(&"bob"));

    // Per-user roll-up names the collection and counts its facets.
    let rollup = read_feed(&store, "alice/_index/collections/index.json");
    assert_eq!(rollup.items.len(), 1);
    let entry = &rollup.items[0];
    assert_eq!(entry.title, "Fox Watch");
    assert_eq!(entry.meta.name.as_deref(), Some("foxes"));
    assert_eq!(entry.meta.item_count, Some(2));
    assert_eq!(entry.meta.id_count, Some(1));

    // Global roll-ups.
    let global = read_feed(&store, "_collections/foxes/index.json");
    assert_eq!(global.items.len(), 1);
    assert_eq!(global.items[0].title, "alice");

    let all = read_feed(&store, "_collections/index.json");
    assert_eq!(all.items.len(), 1);
    assert_eq!(all.items[0].meta.user_count, Some(1));

    // Users index includes both profiles.
    let users = read_feed(&store, "_users/index.json");
    assert_eq!(users.items.len(), 2);

    // Geo layer exists for the located items.
    assert!(store.get("alice/_index/items/index.geo.json").unwrap().is_some());
}

#[test]
fn rerun_is_idempotent() {
    let store = MemStore::new();
    let cfg = config();
    seed(&store);

    build_user_items(&store, &cfg, "alice").unwrap();
    build_user_collections(&store, &cfg, "alice").unwrap();
    let first = store.get("alice/_index/items/index.json").unwrap().unwrap();
    let first_rollup = store
        .get("alice/_index/collections/index.json")
        .unwrap()
        .unwrap();

    build_user_items(&store, &cfg, "alice").unwrap();
    build_user_collections(&store, &cfg, "alice").unwrap();
    assert_eq!(
        store.get("alice/_index/items/index.json").unwrap().unwrap(),
        first
    );
    assert_eq!(
        store
            .get("alice/_index/collections/index.json")
            .unwrap()
            .unwrap(),
        first_rollup
    );
}

#[test]
fn missing_collection_feeds_are_zero_items() {
    let store = MemStore::new();
    let cfg = config();
    // Config exists, but no member has indexed any matching item.
    store
        .put("carol/collections/empty.yaml", "title: Empty\n")
        .unwrap();

    build_user_collections(&store, &cfg, "carol").unwrap();
    assert!(store
        .get("carol/_index/collections/empty/aggregate/index.json")
        .unwrap()
        .is_none());
    assert!(store
        .get("carol/_index/collections/index.json")
        .unwrap()
        .is_none());
}
