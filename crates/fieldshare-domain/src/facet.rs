//! Facet tag helpers.
//!
//! Tags on feed items are namespaced as `prefix~value`: `id~Vulpes vulpes`
//! for identifications and `tag~night` for free tags. Plain strings on the
//! canonical item are free tags; the feed projection adds the namespace.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

/// Separator between a facet prefix and its value.
pub const FACET_SEPARATOR: char = '~';

/// Prefix for identification facets.
pub const ID_PREFIX: &str = "id~";

/// Prefix for free-tag facets.
pub const TAG_PREFIX: &str = "tag~";

/// Build an identification facet, e.g. `id~Vulpes vulpes`.
pub fn id_facet(name: &str) -> String {
    format!("{ID_PREFIX}{name}")
}

/// Build a free-tag facet, e.g. `tag~night`.
pub fn tag_facet(value: &str) -> String {
    format!("{TAG_PREFIX}{value}")
}

pub fn is_id_facet(tag: &str) -> bool {
    tag.starts_with(ID_PREFIX)
}

pub fn is_tag_facet(tag: &str) -> bool {
    tag.starts_with(TAG_PREFIX)
}

/// Split a facet tag into `(prefix, value)`. Returns `None` for plain tags.
pub fn facet_parts(tag: &str) -> Option<(&str, &str)> {
    tag.split_once(FACET_SEPARATOR)
}

lazy_static! {
    static ref FREE_TAG_DISALLOWED: Regex = Regex::new(r"[^a-z0-9\-_.]").unwrap();
}

/// Normalize a provider-supplied free tag: lowercase, restricted to
/// `a-z 0-9 - _ .`. Returns `None` when nothing survives.
pub fn normalize_free_tag(raw: &str) -> Option<String> {
    let tag = FREE_TAG_DISALLOWED
        .replace_all(&raw.to_lowercase(), "")
        .into_owned();
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

/// Union of tag sets: empty entries dropped, deduplicated, sorted.
pub fn merge_tags<'a, I>(sources: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    sources
        .into_iter()
        .flatten()
        .filter(|t| !t.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
