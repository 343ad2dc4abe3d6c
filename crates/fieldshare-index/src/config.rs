//! Site configuration.
//!
//! Built once at process start (from CLI flags or environment) and passed
//! by reference into every builder. No component reads ambient state.

use std::path::PathBuf;

use fieldshare_feeds::FeedConfig;

/// Minimum per-user item count for a collection to appear in the global
/// collections roll-up.
pub const DEFAULT_MIN_ROLLUP_ITEMS: u64 = 10;

#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Root of the content store on disk.
    pub content_dir: PathBuf,
    pub feed: FeedConfig,
    pub min_rollup_items: u64,
}

impl SiteConfig {
    pub fn new(content_dir: PathBuf, feed: FeedConfig) -> Self {
        Self {
            content_dir,
            feed,
            min_rollup_items: DEFAULT_MIN_ROLLUP_ITEMS,
        }
    }
}
