//! Collection aggregation.
//!
//! For each of a user's collections: gather items from the owner's and
//! every member's per-collection feeds (plus manually listed extra items),
//! apply the collection's view filtering, write the aggregate feed, then
//! the per-user collections roll-up. A second pass rolls every user's
//! collections up into the global `_collections` indexes.

use std::collections::{BTreeMap, BTreeSet};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use fieldshare_domain::{is_id_facet, is_tag_facet, CollectionConfig, Location};
use fieldshare_feeds::{
    build_feed, page_file_name, project_item, resolve_collection_view, rollup_items,
    sort_feed_items, FeedItem, FeedOptions, GeoPoint,
};

use crate::config::SiteConfig;
use crate::error::IndexError;
use crate::paths::{
    collection_aggregate_dir, collection_config_dir, global_collection_dir,
    user_collection_index_dir, user_collections_rollup_dir, GLOBAL_COLLECTIONS_DIR,
};
use crate::records::{load_collection_config, load_feed_page, load_item, write_feed_bundle};
use crate::store::{list_users, ContentStore};

lazy_static! {
    static ref MARKUP: Regex = Regex::new(r"<[^>]*>").unwrap();
}

fn strip_markup(text: &str) -> String {
    MARKUP.replace_all(text, "").into_owned()
}

/// `frog_ponds` → `Frog Ponds`.
fn start_case(name: &str) -> String {
    name.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn file_stem(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next()?;
    name.rsplit_once('.').map(|(stem, _)| stem)
}

/// The collections a user owns or participates in, with their configs.
fn gather_collections(
    store: &dyn ContentStore,
    user: &str,
) -> Result<BTreeMap<String, CollectionConfig>, IndexError> {
    let mut collections: BTreeMap<String, CollectionConfig> = BTreeMap::new();

    for path in store.list(&collection_config_dir(user))? {
        if !path.ends_with(".yaml") {
            continue;
        }
        let Some(name) = file_stem(&path) else {
            continue;
        };
        match load_collection_config(store, &path) {
            Ok(Some(config)) => {
                collections.insert(name.to_string(), config);
            }
            Ok(None) => {}
            Err(e) if e.is_per_record() => {
                warn!(%path, error = %e, "skipping malformed collection config");
            }
            Err(e) => return Err(e),
        }
    }

    // Collections that only exist as member feeds (no config file).
    for path in store.list(&user_collections_rollup_dir(user))? {
        let rel = path
            .strip_prefix(&format!("{}/", user_collections_rollup_dir(user)))
            .unwrap_or(&path);
        let segments: Vec<&str> = rel.split('/').collect();
        if let [dir, "index.json"] = segments.as_slice() {
            collections.entry(dir.to_string()).or_default();
        }
    }

    Ok(collections)
}

/// Every page of one member's feed for a collection; a missing feed is
/// zero items, not an error.
fn member_feed_items(
    store: &dyn ContentStore,
    member: &str,
    name: &str,
) -> Result<Vec<FeedItem>, IndexError> {
    let dir = user_collection_index_dir(member, name);
    let mut items = Vec::new();
    let mut page = 1u64;
    let mut page_count = 1u64;
    while page <= page_count {
        let path = format!("{dir}/{}.json", page_file_name(page as usize));
        match load_feed_page(store, &path) {
            Ok(Some(feed)) => {
                items.extend(feed.items);
                page_count = feed.meta.page_count;
                page += 1;
            }
            Ok(None) => break,
            Err(e) if e.is_per_record() => {
                warn!(%path, error = %e, "skipping malformed feed page");
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(items)
}

fn extra_item_entries(
    store: &dyn ContentStore,
    cfg: &SiteConfig,
    config: &CollectionConfig,
) -> Result<Vec<FeedItem>, IndexError> {
    let mut entries = Vec::new();
    let unique: BTreeSet<&String> = config.extra_items.iter().collect();
    for extra in unique {
        let path = if extra.ends_with(".yaml") {
            extra.clone()
        } else {
            format!("{extra}.yaml")
        };
        let Some(owner) = path.split('/').next().map(str::to_string) else {
            continue;
        };
        match load_item(store, &path) {
            Ok(Some(item)) => {
                let mut entry = project_item(&item, &path, &cfg.feed)?;
                entry.author = Some(fieldshare_feeds::FeedAuthor {
                    name: owner.clone(),
                    url: Some(cfg.feed.user_url(&owner)?),
                });
                entries.push(entry);
            }
            Ok(None) => warn!(%path, "extra item not found"),
            Err(e) if e.is_per_record() => {
                warn!(%path, error = %e, "skipping malformed extra item");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(entries)
}

fn facet_counts(items: &[FeedItem]) -> (u64, u64) {
    let unique: BTreeSet<&String> = items.iter().flat_map(|i| &i.tags).collect();
    let ids = unique.iter().filter(|t| is_id_facet(t)).count() as u64;
    let tags = unique.iter().filter(|t| is_tag_facet(t)).count() as u64;
    (ids, tags)
}

/// Build every aggregate feed for one user's collections, then the
/// per-user collections roll-up.
pub fn build_user_collections(
    store: &dyn ContentStore,
    cfg: &SiteConfig,
    user: &str,
) -> Result<(), IndexError> {
    let collections = gather_collections(store, user)?;
    info!(user, collections = collections.len(), "building collection aggregates");

    let mut aggregated: BTreeMap<String, (CollectionConfig, Vec<FeedItem>)> = BTreeMap::new();

    for (name, config) in collections {
        let mut items = extra_item_entries(store, cfg, &config)?;

        let mut members: Vec<&str> = vec![user];
        members.extend(config.admins.iter().map(String::as_str));
        members.extend(config.members.iter().map(String::as_str));
        let members: BTreeSet<&str> = members.into_iter().collect();

        for member in members {
            items.extend(member_feed_items(store, member, &name)?);
        }

        let view = resolve_collection_view(items, &config);

        if !view.is_empty() {
            let dir = collection_aggregate_dir(user, &name);
            let bundle = build_feed(
                view.clone(),
                &FeedOptions {
                    dir: dir.clone(),
                    title: config.display_title(&name),
                    description: config.description.as_deref().map(strip_markup),
                    author_name: user.to_string(),
                    author_url: Some(cfg.feed.user_url(user)?),
                    home_page_url: None,
                },
                &cfg.feed,
            )?;
            write_feed_bundle(store, &dir, &bundle)?;
        }

        aggregated.insert(name, (config, view));
    }

    // Roll-up of this user's visible, non-empty collections. Built after
    // aggregation so the counts reflect what was actually written.
    let visible: BTreeMap<String, Vec<FeedItem>> = aggregated
        .iter()
        .filter(|(_, (config, items))| !config.is_hidden() && !items.is_empty())
        .map(|(name, (_, items))| (name.clone(), items.clone()))
        .collect();

    let entries = rollup_items(&visible, |name, items, mut base| {
        let (config, _) = &aggregated[name];
        let aggregate_url = cfg
            .feed
            .content_url(&format!("{}/index.json", collection_aggregate_dir(user, name)));
        if let Ok(url) = aggregate_url {
            base.url = Some(cfg.feed.view_url(&url));
            base.id = url.to_string();
        }
        base.title = config.display_title(name);
        if let Some(loc) = Location::from_pair(config.latitude, config.longitude) {
            base.geo = Some(GeoPoint {
                coordinates: loc.geo_coordinates(),
            });
        }
        let (id_count, tag_count) = facet_counts(items);
        base.meta.name = Some(name.to_string());
        base.meta.featured = config.featured.filter(|f| *f);
        base.meta.id_count = Some(id_count);
        base.meta.tag_count = Some(tag_count);
        base
    });

    if !entries.is_empty() {
        let dir = user_collections_rollup_dir(user);
        let bundle = build_feed(
            entries,
            &FeedOptions {
                dir: dir.clone(),
                title: "Collections".to_string(),
                description: None,
                author_name: user.to_string(),
                author_url: Some(cfg.feed.user_url(user)?),
                home_page_url: None,
            },
            &cfg.feed,
        )?;
        write_feed_bundle(store, &dir, &bundle)?;
    }

    Ok(())
}

/// Build `_collections/<name>` for every collection seen in any user's
/// roll-up, then the global `_collections` index of sufficiently large
/// collections.
pub fn build_all_collections(store: &dyn ContentStore, cfg: &SiteConfig) -> Result<(), IndexError> {
    let mut index: BTreeMap<String, Vec<FeedItem>> = BTreeMap::new();

    for user in list_users(store)? {
        let path = format!("{}/index.json", user_collections_rollup_dir(&user));
        let feed = match load_feed_page(store, &path) {
            Ok(Some(feed)) => feed,
            Ok(None) => continue,
            Err(e) if e.is_per_record() => {
                warn!(%path, error = %e, "skipping malformed roll-up");
                continue;
            }
            Err(e) => return Err(e),
        };
        for entry in feed.items {
            let Some(name) = entry.meta.name.clone() else {
                continue;
            };
            index.entry(name).or_default().push(FeedItem {
                title: user.clone(),
                ..entry
            });
        }
    }

    info!(collections = index.len(), "building global collection indexes");

    for (name, entries) in &mut index {
        sort_feed_items(entries);
        let dir = global_collection_dir(name);
        let bundle = build_feed(
            entries.clone(),
            &FeedOptions {
                dir: dir.clone(),
                title: start_case(name),
                description: Some(format!("All users for [{name}]")),
                author_name: "All Collections".to_string(),
                author_url: Some(format!("{}collections", cfg.feed.app_host)),
                home_page_url: None,
            },
            &cfg.feed,
        )?;
        write_feed_bundle(store, &dir, &bundle)?;
    }

    // The global index keeps only collections that reached the size
    // threshold for at least one user.
    let max_counts: BTreeMap<&String, u64> = index
        .iter()
        .map(|(name, entries)| {
            let max = entries
                .iter()
                .filter_map(|e| e.meta.item_count)
                .max()
                .unwrap_or(0);
            (name, max)
        })
        .collect();

    let featured_index: BTreeMap<String, Vec<FeedItem>> = index
        .iter()
        .filter(|(name, _)| max_counts[*name] >= cfg.min_rollup_items)
        .map(|(name, entries)| (name.clone(), entries.clone()))
        .collect();

    let entries = rollup_items(&featured_index, |name, entries, mut base| {
        base.id = if entries.len() == 1 {
            entries[0].id.clone()
        } else {
            cfg.feed
                .content_url(&format!("{}/index.json", global_collection_dir(name)))
                .map(|u| u.to_string())
                .unwrap_or_default()
        };
        base.url = Some(format!(
            "{}items?i={}",
            cfg.feed.app_host,
            urlencoding::encode(&base.id)
        ));
        base.title = start_case(name);
        base.meta.featured = Some(false);
        base.meta.item_count = Some(max_counts[&name.to_string()]);
        base.meta.user_count = Some(entries.len() as u64);
        base
    });

    if !entries.is_empty() {
        let bundle = build_feed(
            entries,
            &FeedOptions {
                dir: GLOBAL_COLLECTIONS_DIR.to_string(),
                title: "All Collections".to_string(),
                description: None,
                author_name: "All Collections".to_string(),
                author_url: Some(format!("{}collections", cfg.feed.app_host)),
                home_page_url: None,
            },
            &cfg.feed,
        )?;
        write_feed_bundle(store, GLOBAL_COLLECTIONS_DIR, &bundle)?;
    }

    Ok(())
}
