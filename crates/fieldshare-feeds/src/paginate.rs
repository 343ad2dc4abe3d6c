//! Sorted, paginated feed construction.

use crate::config::FeedConfig;
use crate::feed::{Feed, FeedAuthor, FeedItem, FeedMeta, JSONFEED_VERSION};
use crate::geojson::{build_geo, FeatureCollection};
use crate::sort::sort_feed_items;
use crate::validate::{ensure_valid_feed, ensure_valid_geo, FeedError};

/// Where a feed lives and how it presents itself.
#[derive(Clone, Debug)]
pub struct FeedOptions {
    /// Store-relative output directory, e.g. `alice/_index/items`.
    pub dir: String,
    pub title: String,
    pub description: Option<String>,
    /// Feed author: the owning user or a synthetic scope name.
    pub author_name: String,
    /// Author link; defaults to the view URL of the feed itself.
    pub author_url: Option<String>,
    /// Home page; defaults to the view URL of the feed itself.
    pub home_page_url: Option<String>,
}

/// A fully built aggregation unit: the pages plus the geo layer.
#[derive(Clone, Debug)]
pub struct FeedBundle {
    pub pages: Vec<Feed>,
    /// Absent when the feed has no items.
    pub geo: Option<FeatureCollection>,
}

/// File name stem for a page: `index`, `index_2`, `index_3`, ...
pub fn page_file_name(page: usize) -> String {
    if page == 1 {
        "index".to_string()
    } else {
        format!("index_{page}")
    }
}

/// Sort and paginate items into feed pages and a geo layer.
///
/// Page 1 and the geo layer are schema-validated; a failure there is a
/// logic bug in the aggregator and aborts this unit. An empty item list
/// yields no pages and no geo layer.
pub fn build_feed(
    mut items: Vec<FeedItem>,
    opts: &FeedOptions,
    cfg: &FeedConfig,
) -> Result<FeedBundle, FeedError> {
    sort_feed_items(&mut items);

    let feed_url = cfg.content_url(&format!("{}/index.json", opts.dir))?;
    let view_url = cfg.view_url(&feed_url);
    let author = FeedAuthor {
        name: opts.author_name.clone(),
        url: Some(opts.author_url.clone().unwrap_or_else(|| view_url.clone())),
    };
    let home_page_url = opts.home_page_url.clone().unwrap_or(view_url);

    let per_page = cfg.per_page.max(1);
    let page_count = items.len().div_ceil(per_page);
    let mut pages = Vec::with_capacity(page_count);

    for page in 1..=page_count {
        let next_url = cfg.content_url(&format!("{}/index_{}.json", opts.dir, page + 1))?;
        let page_items: Vec<FeedItem> = items
            .iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();

        let feed = Feed {
            version: JSONFEED_VERSION.to_string(),
            title: opts.title.clone(),
            description: opts.description.clone(),
            author: author.clone(),
            home_page_url: home_page_url.clone(),
            feed_url: feed_url.to_string(),
            next_url: next_url.to_string(),
            items: page_items,
            meta: FeedMeta {
                item_count: items.len() as u64,
                page_number: page as u64,
                page_count: page_count as u64,
            },
        };

        if page == 1 {
            ensure_valid_feed(&feed)?;
        }
        pages.push(feed);
    }

    let geo = if items.is_empty() {
        None
    } else {
        let geo = build_geo(&items);
        ensure_valid_geo(&geo)?;
        Some(geo)
    };

    Ok(FeedBundle { pages, geo })
}
