//! Structural validation of generated artifacts.
//!
//! Per-record problems during import are tolerated (skip and log); a
//! malformed generated feed or geo layer indicates an aggregator bug and
//! is fatal for that aggregation unit. Both policies are explicit here:
//! `validate_*` reports, `ensure_*` enforces.

use fieldshare_domain::{ValidationError, ValidationSeverity};
use thiserror::Error;
use url::Url;

use crate::feed::{Feed, JSONFEED_VERSION};
use crate::geojson::FeatureCollection;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed failed validation: {0}")]
    Validation(String),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("xml rendering failed: {0}")]
    Xml(#[from] quick_xml::Error),
}

fn error(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
        severity: ValidationSeverity::Error,
    }
}

/// Validate one feed page.
pub fn validate_feed(feed: &Feed) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if feed.version != JSONFEED_VERSION {
        errors.push(error("version", format!("expected {JSONFEED_VERSION}")));
    }
    if feed.title.is_empty() {
        errors.push(error("title", "title is required"));
    }
    if feed.author.name.is_empty() {
        errors.push(error("author", "author name is required"));
    }
    for (field, value) in [
        ("feed_url", &feed.feed_url),
        ("next_url", &feed.next_url),
        ("home_page_url", &feed.home_page_url),
    ] {
        if Url::parse(value).is_err() {
            errors.push(error(field, format!("not an absolute url: {value}")));
        }
    }

    let meta = &feed.meta;
    if meta.page_number == 0 || meta.page_count == 0 {
        errors.push(error("_meta", "page numbering starts at 1"));
    }
    if meta.page_number > meta.page_count {
        errors.push(error("_meta", "pageNumber exceeds pageCount"));
    }
    if (meta.item_count as usize) < feed.items.len() {
        errors.push(error("_meta", "itemCount is less than the page length"));
    }

    for item in &feed.items {
        if item.id.is_empty() {
            errors.push(error("items", "feed item with empty id"));
        }
        if item.title.is_empty() {
            errors.push(error("items", format!("feed item {} has no title", item.id)));
        }
    }

    errors
}

/// Validate a geo layer.
pub fn validate_geo(geo: &FeatureCollection) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if geo.kind != "FeatureCollection" {
        errors.push(error("type", "expected FeatureCollection"));
    }
    for feature in &geo.features {
        if feature.kind != "Feature" || feature.geometry.kind != "Point" {
            errors.push(error("features", "expected Point features"));
        }
        let [lng, lat] = feature.geometry.coordinates;
        if !lng.is_finite() || !lat.is_finite() || !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat)
        {
            errors.push(error(
                "features",
                format!("coordinates out of range on {}", feature.properties.id),
            ));
        }
        if feature.properties.id.is_empty() {
            errors.push(error("features", "feature with empty id"));
        }
    }
    errors
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Enforce feed validity; a failure aborts the aggregation unit.
pub fn ensure_valid_feed(feed: &Feed) -> Result<(), FeedError> {
    let errors = validate_feed(feed);
    if errors.iter().any(|e| e.severity == ValidationSeverity::Error) {
        return Err(FeedError::Validation(summarize(&errors)));
    }
    Ok(())
}

/// Enforce geo validity; a failure aborts the aggregation unit.
pub fn ensure_valid_geo(geo: &FeatureCollection) -> Result<(), FeedError> {
    let errors = validate_geo(geo);
    if errors.iter().any(|e| e.severity == ValidationSeverity::Error) {
        return Err(FeedError::Validation(summarize(&errors)));
    }
    Ok(())
}
