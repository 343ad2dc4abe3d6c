//! Projection of a canonical item into a feed entry.

use fieldshare_domain::{id_facet, tag_facet, Item, Location, Media};

use crate::config::FeedConfig;
use crate::feed::{FeedItem, FeedItemMeta, GeoPoint};
use crate::validate::FeedError;

const TITLE_LIMIT: usize = 64;
const UNIDENTIFIED: &str = "Unidentified";

fn truncate_title(title: String) -> String {
    if title.chars().count() <= TITLE_LIMIT {
        return title;
    }
    let mut out: String = title.chars().take(TITLE_LIMIT - 3).collect();
    out.push_str("...");
    out
}

/// Title from the identification names: a comma-joined list, or a count
/// when there are more than two.
fn item_title(names: &[String]) -> String {
    if names.is_empty() {
        return UNIDENTIFIED.to_string();
    }
    if names.len() > 2 {
        return format!("{} ids", names.len());
    }
    truncate_title(names.join(", "))
}

/// The feed image: the photo marked primary, else the first by id order.
fn feed_image(photos: &[Media]) -> Option<String> {
    photos
        .iter()
        .find(|p| p.primary == Some(true))
        .or_else(|| photos.first())
        .and_then(|p| p.thumbnail_url.clone())
}

fn count(len: usize) -> Option<u64> {
    if len == 0 {
        None
    } else {
        Some(len as u64)
    }
}

/// Project one canonical item into a feed entry. `item_path` is the
/// store-relative YAML path; its content URL is the item's feed identity.
pub fn project_item(item: &Item, item_path: &str, cfg: &FeedConfig) -> Result<FeedItem, FeedError> {
    let id_url = cfg.content_url(item_path)?;
    let url = cfg.item_view_url(&id_url);

    let names = item.id_names();

    let mut tags: Vec<String> = if names.is_empty() {
        vec![id_facet(UNIDENTIFIED)]
    } else {
        names.iter().map(|n| id_facet(n)).collect()
    };
    let mut free: Vec<&String> = item.tags.iter().collect();
    free.sort();
    free.dedup();
    tags.extend(free.into_iter().map(|t| tag_facet(t)));

    Ok(FeedItem {
        id: id_url.to_string(),
        url: Some(url),
        title: item_title(&names),
        content_text: Some(item.description.clone().unwrap_or_else(|| "-".to_string())),
        image: feed_image(&item.photos),
        date_published: item.created_at,
        date_modified: item.updated_at,
        tags,
        author: None,
        geo: item
            .location()
            .map(|loc: Location| GeoPoint {
                coordinates: loc.geo_coordinates(),
            }),
        meta: FeedItemMeta {
            date: item
                .datetime
                .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string()),
            image_count: count(item.photos.len()),
            video_count: count(item.videos.len()),
            audio_count: count(item.audio.len()),
            ..Default::default()
        },
    })
}
