//! The users roll-up.
//!
//! One synthetic feed entry per user with a profile, enriched from the
//! first page of their item feed when one exists. A prior feed's
//! `itemCount` is only a display figure here; the per-user builders always
//! recompute their own totals.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use tracing::{info, warn};

use fieldshare_feeds::{average_coord, build_feed, FeedItem, FeedItemMeta, FeedOptions, GeoPoint};

use crate::config::SiteConfig;
use crate::error::IndexError;
use crate::paths::{profile_file, user_items_index_dir, USERS_INDEX_DIR};
use crate::records::{load_feed_page, load_profile, write_feed_bundle};
use crate::store::{list_users, ContentStore};

const BIO_LIMIT: usize = 255;

fn joined_date(year: i32) -> Option<DateTime<FixedOffset>> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .map(|dt| dt.fixed_offset())
}

/// Build `_users/index[_N].*` across every user directory.
pub fn build_users_index(store: &dyn ContentStore, cfg: &SiteConfig) -> Result<(), IndexError> {
    let mut entries: Vec<FeedItem> = Vec::new();

    for user in list_users(store)? {
        let profile = match load_profile(store, &profile_file(&user)) {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                warn!(%user, "profile not found, skipping user");
                continue;
            }
            Err(e) if e.is_per_record() => {
                warn!(%user, error = %e, "skipping malformed profile");
                continue;
            }
            Err(e) => return Err(e),
        };

        let feed_url = cfg
            .feed
            .content_url(&format!("{}/index.json", user_items_index_dir(&user)))?;

        let mut date_published = profile.joined_year().and_then(joined_date);
        let mut date_modified = date_published;
        let mut image = None;
        let mut item_count = 0u64;
        let mut coordinates = None;

        let index_path = format!("{}/index.json", user_items_index_dir(&user));
        match load_feed_page(store, &index_path) {
            Ok(Some(feed)) => {
                if let Some(first) = feed.items.first() {
                    date_published = first.date_published;
                    date_modified = first.date_modified;
                }
                image = feed.items.iter().find_map(|i| i.image.clone());
                item_count = feed.meta.item_count;
                coordinates = average_coord(&feed.items);
            }
            Ok(None) => {}
            Err(e) if e.is_per_record() => {
                warn!(%user, error = %e, "ignoring malformed item feed");
            }
            Err(e) => return Err(e),
        }

        let bio = profile.bio.as_deref().unwrap_or("-");
        let content_text: String = bio.chars().take(BIO_LIMIT).collect();

        entries.push(FeedItem {
            id: feed_url.to_string(),
            url: Some(cfg.feed.view_url(&feed_url)),
            title: profile.name.clone().unwrap_or_else(|| user.clone()),
            content_text: Some(content_text),
            image,
            date_published,
            date_modified,
            tags: Vec::new(),
            author: None,
            geo: coordinates.map(|c| GeoPoint { coordinates: c }),
            meta: FeedItemMeta {
                item_count: (item_count > 0).then_some(item_count),
                date: date_modified.map(|dt| dt.date_naive().format("%Y-%m-%d").to_string()),
                ..Default::default()
            },
        });
    }

    info!(users = entries.len(), "building users index");

    if entries.is_empty() {
        return Ok(());
    }

    let bundle = build_feed(
        entries,
        &FeedOptions {
            dir: USERS_INDEX_DIR.to_string(),
            title: cfg.feed.app_name.clone(),
            description: None,
            author_name: "All Users".to_string(),
            author_url: Some(cfg.feed.app_host.to_string()),
            home_page_url: Some(cfg.feed.app_host.to_string()),
        },
        &cfg.feed,
    )?;
    write_feed_bundle(store, USERS_INDEX_DIR, &bundle)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use fieldshare_feeds::FeedConfig;
    use url::Url;

    fn config() -> SiteConfig {
        SiteConfig::new(
            "/tmp/content".into(),
            FeedConfig::new(
                "Fieldshare",
                Url::parse("https://fieldshare.example.org/").unwrap(),
                Url::parse("https://files.fieldshare.example.org/").unwrap(),
            ),
        )
    }

    #[test]
    fn users_without_profile_are_skipped() {
        let store = MemStore::new();
        store.put("alice/profile.yaml", "name: Alice\njoined: '2019'\n").unwrap();
        store.put("bob/items/flickr/2020/x.yaml", "datetime: 2020-01-01T00:00:00+00:00\n").unwrap();

        build_users_index(&store, &config()).unwrap();

        let feed = store.get("_users/index.json").unwrap().expect("users feed");
        let feed: fieldshare_feeds::Feed = serde_json::from_str(&feed).unwrap();
        assert_eq!(feed.title, "Fieldshare");
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.items[0].title, "Alice");
        assert_eq!(
            feed.items[0].date_published.unwrap().to_rfc3339(),
            "2019-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn item_feed_enriches_the_entry() {
        let store = MemStore::new();
        store.put("alice/profile.yaml", "name: Alice\n").unwrap();
        let item_feed = serde_json::json!({
            "version": "https://jsonfeed.org/version/1",
            "title": "Items",
            "author": { "name": "alice" },
            "home_page_url": "https://fieldshare.example.org/",
            "feed_url": "https://files.fieldshare.example.org/alice/_index/items/index.json",
            "next_url": "https://files.fieldshare.example.org/alice/_index/items/index_2.json",
            "items": [{
                "id": "https://files.fieldshare.example.org/alice/items/flickr/2020/1.yaml",
                "title": "Fox",
                "image": "https://files.example/t.jpg",
                "date_published": "2020-01-03T00:00:00+00:00",
                "date_modified": "2020-01-04T00:00:00+00:00",
                "_geo": { "coordinates": [145.2, -37.1] }
            }],
            "_meta": { "itemCount": 12, "pageNumber": 1, "pageCount": 1 }
        });
        store
            .put(
                "alice/_index/items/index.json",
                &serde_json::to_string(&item_feed).unwrap(),
            )
            .unwrap();

        build_users_index(&store, &config()).unwrap();

        let feed = store.get("_users/index.json").unwrap().expect("users feed");
        let feed: fieldshare_feeds::Feed = serde_json::from_str(&feed).unwrap();
        let entry = &feed.items[0];
        assert_eq!(entry.meta.item_count, Some(12));
        assert_eq!(entry.image.as_deref(), Some("https://files.example/t.jpg"));
        assert_eq!(entry.geo.as_ref().unwrap().coordinates, [145.2, -37.1]);
        assert_eq!(entry.meta.date.as_deref(), Some("2020-01-04"));
    }
}
