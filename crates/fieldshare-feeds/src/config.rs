//! Feed generation settings.
//!
//! Constructed once at process start and passed by reference into every
//! builder; nothing in this crate reads ambient state.

use url::Url;

/// Items per feed page.
pub const DEFAULT_PER_PAGE: usize = 1000;

#[derive(Clone, Debug)]
pub struct FeedConfig {
    /// Site name used for top-level roll-up titles.
    pub app_name: String,
    /// Web app base, e.g. `https://fieldshare.example.org/`.
    pub app_host: Url,
    /// Static content base the feed files are served from.
    pub content_host: Url,
    pub per_page: usize,
}

impl FeedConfig {
    pub fn new(app_name: impl Into<String>, app_host: Url, content_host: Url) -> Self {
        Self {
            app_name: app_name.into(),
            app_host,
            content_host,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Absolute URL of a content file, e.g. `alice/_index/items/index.json`.
    pub fn content_url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.content_host.join(path)
    }

    /// App view URL for a feed: `{app_host}items?i=<encoded feed url>`.
    pub fn view_url(&self, feed_url: &Url) -> String {
        format!(
            "{}items?i={}",
            self.app_host,
            urlencoding::encode(feed_url.as_str())
        )
    }

    /// App view URL for a single item.
    pub fn item_view_url(&self, item_url: &Url) -> String {
        format!(
            "{}item?i={}",
            self.app_host,
            urlencoding::encode(item_url.as_str())
        )
    }

    /// View URL of a user's item feed, used as the feed author link.
    pub fn user_url(&self, user: &str) -> Result<String, url::ParseError> {
        let feed = self.content_url(&format!("{user}/_index/items/index.json"))?;
        Ok(self.view_url(&feed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FeedConfig {
        FeedConfig::new(
            "Fieldshare",
            Url::parse("https://fieldshare.example.org/").unwrap(),
            Url::parse("https://files.fieldshare.example.org/").unwrap(),
        )
    }

    #[test]
    fn urls_are_joined_and_encoded() {
        let cfg = config();
        let feed = cfg.content_url("alice/_index/items/index.json").unwrap();
        assert_eq!(
            feed.as_str(),
            "https://files.fieldshare.example.org/alice/_index/items/index.json"
        );
        let view = cfg.view_url(&feed);
        assert!(view.starts_with("https://fieldshare.example.org/items?i=https%3A%2F%2F"));
    }

    #[test]
    fn user_url_points_at_item_feed() {
        let cfg = config();
        let url = cfg.user_url("alice").unwrap();
        assert!(url.contains("alice%2F_index%2Fitems%2Findex.json"));
    }
}
