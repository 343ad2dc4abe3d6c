//! Feed ordering.

use std::cmp::Ordering;

use crate::feed::FeedItem;

fn desc<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    // Descending with absent values last (None < Some, reversed).
    b.cmp(a)
}

fn desc_count(a: Option<u64>, b: Option<u64>) -> Ordering {
    b.unwrap_or(0).cmp(&a.unwrap_or(0))
}

/// The fixed feed sort: featured ascending (unfeatured first), then
/// date_published, date_modified, itemCount, imageCount, videoCount and
/// audioCount, all descending. Stable, so fully-tied items keep their
/// input order.
pub fn sort_feed_items(items: &mut [FeedItem]) {
    items.sort_by(|a, b| {
        a.meta
            .featured
            .unwrap_or(false)
            .cmp(&b.meta.featured.unwrap_or(false))
            .then_with(|| desc(&a.date_published, &b.date_published))
            .then_with(|| desc(&a.date_modified, &b.date_modified))
            .then_with(|| desc_count(a.meta.item_count, b.meta.item_count))
            .then_with(|| desc_count(a.meta.image_count, b.meta.image_count))
            .then_with(|| desc_count(a.meta.video_count, b.meta.video_count))
            .then_with(|| desc_count(a.meta.audio_count, b.meta.audio_count))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn item(id: &str) -> FeedItem {
        FeedItem {
            id: id.to_string(),
            title: id.to_string(),
            ..Default::default()
        }
    }

    fn dated(id: &str, date: &str) -> FeedItem {
        let mut i = item(id);
        i.date_published = Some(DateTime::parse_from_rfc3339(date).unwrap());
        i
    }

    #[test]
    fn unfeatured_sorts_before_featured() {
        let mut a = dated("a", "2020-06-01T00:00:00+00:00");
        a.meta.featured = Some(true);
        let b = dated("b", "2021-06-01T00:00:00+00:00");

        let mut items = vec![a, b];
        sort_feed_items(&mut items);
        assert_eq!(items[0].id, "b");
        assert_eq!(items[1].id, "a");
    }

    #[test]
    fn newer_first_within_featured_class() {
        let mut items = vec![
            dated("old", "2019-01-01T00:00:00+00:00"),
            dated("new", "2021-01-01T00:00:00+00:00"),
        ];
        sort_feed_items(&mut items);
        assert_eq!(items[0].id, "new");
    }

    #[test]
    fn missing_dates_sort_last() {
        let mut items = vec![item("undated"), dated("dated", "2020-01-01T00:00:00+00:00")];
        sort_feed_items(&mut items);
        assert_eq!(items[0].id, "dated");
    }

    #[test]
    fn count_tie_breaks() {
        let mut small = item("small");
        small.meta.item_count = Some(2);
        let mut large = item("large");
        large.meta.item_count = Some(9);
        let mut items = vec![small, large];
        sort_feed_items(&mut items);
        assert_eq!(items[0].id, "large");
    }

    #[test]
    fn full_tie_preserves_input_order() {
        let mut items = vec![item("first"), item("second")];
        sort_feed_items(&mut items);
        assert_eq!(items[0].id, "first");
        assert_eq!(items[1].id, "second");
    }
}
