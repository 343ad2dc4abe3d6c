//! fieldshare-feeds: derived, disposable feed artifacts
//!
//! Aggregates projected items into sorted, paginated JSONFeed pages with
//! RSS/Atom renderings and a GeoJSON layer, applies collection view
//! filtering, and builds roll-up (index-of-indexes) feeds. Everything here
//! is a pure function over in-memory data; feeds are recomputed wholesale
//! on every run and never patched in place.

pub mod collection_view;
pub mod config;
pub mod feed;
pub mod geojson;
pub mod paginate;
pub mod project;
pub mod render;
pub mod rollup;
pub mod sort;
pub mod validate;

pub use collection_view::resolve_collection_view;
pub use config::FeedConfig;
pub use feed::{Feed, FeedAuthor, FeedItem, FeedItemMeta, FeedMeta, GeoPoint, JSONFEED_VERSION};
pub use geojson::{average_coord, build_geo, Feature, FeatureCollection};
pub use paginate::{build_feed, page_file_name, FeedBundle, FeedOptions};
pub use project::project_item;
pub use render::{render_atom, render_rss};
pub use rollup::rollup_items;
pub use sort::sort_feed_items;
pub use validate::{ensure_valid_feed, ensure_valid_geo, validate_feed, validate_geo, FeedError};
