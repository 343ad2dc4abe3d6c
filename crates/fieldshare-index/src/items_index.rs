//! Per-user item indexing.
//!
//! Walks a user's canonical items, projects them into feed entries and
//! writes the user's item feed plus one member feed per collection named
//! on the items. Malformed item files are logged and skipped; the rest of
//! the batch continues.

use std::collections::BTreeMap;

use tracing::{info, warn};

use fieldshare_domain::default_collection_title;
use fieldshare_feeds::{build_feed, project_item, FeedAuthor, FeedItem, FeedOptions};

use crate::config::SiteConfig;
use crate::error::IndexError;
use crate::paths::{items_dir, user_collection_index_dir, user_items_index_dir};
use crate::records::{load_item, write_feed_bundle};
use crate::store::ContentStore;

/// Build `<user>/_index/items` and the user's per-collection member feeds.
/// Returns the number of items indexed.
pub fn build_user_items(
    store: &dyn ContentStore,
    cfg: &SiteConfig,
    user: &str,
) -> Result<usize, IndexError> {
    let mut feed_items: Vec<FeedItem> = Vec::new();
    let mut collections: BTreeMap<String, Vec<FeedItem>> = BTreeMap::new();

    let author_url = cfg.feed.user_url(user)?;

    for path in store.list(&items_dir(user))? {
        if !path.ends_with(".yaml") {
            continue;
        }
        let item = match load_item(store, &path) {
            Ok(Some(item)) => item,
            Ok(None) => continue,
            Err(e) if e.is_per_record() => {
                warn!(%path, error = %e, "skipping malformed item");
                continue;
            }
            Err(e) => return Err(e),
        };

        let entry = project_item(&item, &path, &cfg.feed)?;
        feed_items.push(entry.clone());

        for name in &item.collections {
            let mut member_entry = entry.clone();
            member_entry.author = Some(FeedAuthor {
                name: user.to_string(),
                url: Some(author_url.clone()),
            });
            collections.entry(name.clone()).or_default().push(member_entry);
        }
    }

    let indexed = feed_items.len();
    info!(user, items = indexed, "building item feed");

    let bundle = build_feed(
        feed_items,
        &FeedOptions {
            dir: user_items_index_dir(user),
            title: "Items".to_string(),
            description: None,
            author_name: user.to_string(),
            author_url: Some(author_url.clone()),
            home_page_url: None,
        },
        &cfg.feed,
    )?;
    write_feed_bundle(store, &user_items_index_dir(user), &bundle)?;

    for (name, items) in collections {
        if items.is_empty() {
            continue;
        }
        let dir = user_collection_index_dir(user, &name);
        let bundle = build_feed(
            items,
            &FeedOptions {
                dir: dir.clone(),
                title: default_collection_title(&name),
                description: None,
                author_name: user.to_string(),
                author_url: Some(author_url.clone()),
                home_page_url: None,
            },
            &cfg.feed,
        )?;
        write_feed_bundle(store, &dir, &bundle)?;
    }

    Ok(indexed)
}
