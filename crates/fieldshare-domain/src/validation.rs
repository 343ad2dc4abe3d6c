//! Validation for canonical items.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::item::Item;
use crate::location::Location;
use crate::media::Media;

/// Severity of a validation finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

/// A validation error or warning, with enough context to locate the field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub severity: ValidationSeverity,
}

impl ValidationError {
    fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            severity: ValidationSeverity::Error,
        }
    }

    fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            severity: ValidationSeverity::Warning,
        }
    }
}

/// Whether an item must carry media to be considered sharable.
///
/// Photo providers require at least one photo or video; providers without
/// media (or manual records) may rely on an identification instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MediaRequirement {
    #[default]
    Required,
    Relaxed,
}

fn validate_media_list(kind: &str, list: &[Media], errors: &mut Vec<ValidationError>) {
    let mut seen = BTreeSet::new();
    for media in list {
        if media.id.is_empty() {
            errors.push(ValidationError::error(kind, "media entry is missing an id"));
        } else if !seen.insert(media.id.as_str()) {
            errors.push(ValidationError::error(
                kind,
                format!("duplicate media id: {}", media.id),
            ));
        }
        if media.source.as_deref().unwrap_or("").is_empty() {
            errors.push(ValidationError::warning(kind, "media entry has no source"));
        }
    }
}

/// Validate an item and return all findings.
pub fn validate_item(item: &Item, media: MediaRequirement) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    match (item.latitude, item.longitude) {
        (Some(_), None) | (None, Some(_)) => {
            errors.push(ValidationError::error(
                "location",
                "latitude and longitude are mutually required",
            ));
        }
        (Some(lat), Some(lng)) => {
            if Location::new(lat, lng).is_none() {
                errors.push(ValidationError::error(
                    "location",
                    "coordinates must be non-zero finite numbers",
                ));
            }
            if !(-90.0..=90.0).contains(&lat) {
                errors.push(ValidationError::error("latitude", "out of range"));
            }
            if !(-180.0..=180.0).contains(&lng) {
                errors.push(ValidationError::error("longitude", "out of range"));
            }
        }
        (None, None) => {}
    }

    for identification in &item.identifications {
        if identification.name.trim().is_empty() {
            errors.push(ValidationError::error("id", "identification has no name"));
        }
    }

    if item.tags.iter().any(|t| t.is_empty()) {
        errors.push(ValidationError::error("tags", "empty tag"));
    }
    if item.collections.iter().any(|c| c.is_empty()) {
        errors.push(ValidationError::error("collections", "empty collection name"));
    }

    validate_media_list("photos", &item.photos, &mut errors);
    validate_media_list("videos", &item.videos, &mut errors);
    validate_media_list("audio", &item.audio, &mut errors);

    match media {
        MediaRequirement::Required => {
            if !item.has_media() {
                errors.push(ValidationError::error(
                    "photos",
                    "at least one photo, video or audio entry is required",
                ));
            }
        }
        MediaRequirement::Relaxed => {
            if !item.has_media() && item.identifications.is_empty() {
                errors.push(ValidationError::error(
                    "id",
                    "an item needs media or at least one identification",
                ));
            }
        }
    }

    if let (Some(created), Some(updated)) = (item.created_at, item.updated_at) {
        if updated < created {
            errors.push(ValidationError::warning(
                "updated_at",
                "updated_at is before created_at",
            ));
        }
    }

    errors
}

/// Check whether an item is valid (no error-severity findings).
pub fn is_valid(item: &Item, media: MediaRequirement) -> bool {
    validate_item(item, media)
        .iter()
        .all(|e| e.severity != ValidationSeverity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Identification;

    fn photo(id: &str) -> Media {
        Media {
            source: Some("dropbox".to_string()),
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_item_fails_required_media() {
        let item = Item::default();
        assert!(!is_valid(&item, MediaRequirement::Required));
        let errors = validate_item(&item, MediaRequirement::Required);
        assert!(errors.iter().any(|e| e.field == "photos"));
    }

    #[test]
    fn identification_satisfies_relaxed() {
        let item = Item {
            identifications: vec![Identification {
                name: "Vulpes vulpes".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(is_valid(&item, MediaRequirement::Relaxed));
        assert!(!is_valid(&item, MediaRequirement::Required));
    }

    #[test]
    fn lone_latitude_is_an_error() {
        let item = Item {
            latitude: Some(-37.5),
            photos: vec![photo("a")],
            ..Default::default()
        };
        let errors = validate_item(&item, MediaRequirement::Required);
        assert!(errors
            .iter()
            .any(|e| e.field == "location" && e.severity == ValidationSeverity::Error));
    }

    #[test]
    fn duplicate_media_ids_are_an_error() {
        let item = Item {
            photos: vec![photo("a"), photo("a")],
            ..Default::default()
        };
        let errors = validate_item(&item, MediaRequirement::Required);
        assert!(errors.iter().any(|e| e.message.contains("duplicate media id")));
    }

    #[test]
    fn valid_photo_item_passes() {
        let item = Item {
            latitude: Some(-37.5),
            longitude: Some(145.2),
            photos: vec![photo("a")],
            ..Default::default()
        };
        assert!(is_valid(&item, MediaRequirement::Required));
    }
}
