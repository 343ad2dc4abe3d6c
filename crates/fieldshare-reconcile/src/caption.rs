//! Caption parsing.
//!
//! Users embed an item override in a provider caption or description as a
//! fenced YAML document:
//!
//! ```text
//! A fox crossing the track at dusk.
//! ---
//! id:
//!   - name: Vulpes vulpes
//! tags:
//!   - night
//! ---
//! ```
//!
//! The document between the first pair of `---` fences is parsed as a
//! [`PartialItem`]. A malformed document yields `None` — a bad caption must
//! not block the rest of a batch.

use crate::partial::PartialItem;

const FENCE: &str = "---";

/// Extract and parse the embedded partial item, if any.
pub fn parse_item_description(text: &str) -> Option<PartialItem> {
    let mut sections = text.splitn(3, FENCE);
    sections.next()?;
    let doc = sections.next()?;
    if doc.trim().is_empty() {
        return None;
    }
    let partial: PartialItem = serde_yaml::from_str(doc).ok()?;
    if partial.is_empty() {
        None
    } else {
        Some(partial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_document() {
        let text = "A fox at dusk.\n--- # fieldshare\ntags:\n  - night\n  - fox\n---\n";
        let partial = parse_item_description(text).unwrap();
        assert_eq!(partial.tags, vec!["night", "fox"]);
    }

    #[test]
    fn parses_identifications() {
        let text = "---\nid:\n  - name: Vulpes vulpes\n    common: Red Fox\n---";
        let partial = parse_item_description(text).unwrap();
        assert_eq!(partial.identifications[0].name, "Vulpes vulpes");
        assert_eq!(partial.identifications[0].common.as_deref(), Some("Red Fox"));
    }

    #[test]
    fn plain_caption_is_none() {
        assert_eq!(parse_item_description("Just a caption."), None);
        assert_eq!(parse_item_description(""), None);
    }

    #[test]
    fn malformed_document_is_none() {
        assert_eq!(parse_item_description("x\n---\ntags: [unclosed\n---"), None);
    }

    #[test]
    fn empty_document_is_none() {
        assert_eq!(parse_item_description("x\n---\n\n---\n"), None);
    }
}
