//! The merge of an observation into an existing canonical item.

use fieldshare_domain::{
    merge_comments, merge_media, merge_tags, validate_item, Item, ValidationError,
    ValidationSeverity,
};
use thiserror::Error;

use crate::observation::Observation;

/// Reconciliation failure. An invalid result is discarded by the caller
/// (the existing on-disk item is left untouched) rather than aborting the
/// batch.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("reconciled item failed validation: {fields}")]
    Invalid {
        fields: String,
        errors: Vec<ValidationError>,
    },
}

impl ReconcileError {
    fn invalid(errors: Vec<ValidationError>) -> Self {
        let fields = errors
            .iter()
            .filter(|e| e.severity == ValidationSeverity::Error)
            .map(|e| format!("{} ({})", e.field, e.message))
            .collect::<Vec<_>>()
            .join(", ");
        ReconcileError::Invalid { fields, errors }
    }
}

/// Merge an observation into an existing item (pass `Item::default()` when
/// nothing is stored yet), producing the new canonical item.
///
/// Precedence: explicit user annotation (the caption partial) beats
/// provider metadata, which beats prior state. Set fields are unioned,
/// media lists are unioned by id with the incoming entry winning, and
/// `updated_at` never regresses.
///
/// Applying the same observation twice yields the same item as applying it
/// once.
pub fn reconcile(existing: &Item, obs: &Observation) -> Result<Item, ReconcileError> {
    let partial = obs.partial.clone().unwrap_or_default();

    // Last valid location wins: existing < provider-native < user-authored.
    let location = [existing.location(), obs.location, partial.location()]
        .into_iter()
        .flatten()
        .last();

    let datetime = partial
        .datetime
        .or(obs.datetime)
        .or(existing.datetime);
    let photo_datetime_used =
        datetime.map(|_| partial.datetime.is_none() && obs.datetime.is_some());

    let identifications = if !partial.identifications.is_empty() {
        partial.identifications.clone()
    } else if !obs.identifications.is_empty() {
        obs.identifications.clone()
    } else {
        existing.identifications.clone()
    };

    let source_tag = vec![obs.source_tag.clone()];
    let tags = merge_tags([
        existing.tags.as_slice(),
        partial.tags.as_slice(),
        obs.tags.as_slice(),
        source_tag.as_slice(),
    ]);
    let collections = merge_tags([
        existing.collections.as_slice(),
        partial.collections.as_slice(),
    ]);

    let updated_at = match (existing.updated_at, obs.updated_at) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };

    let mut item = Item {
        identifications,
        datetime,
        photo_datetime_used,
        location_name: partial
            .location_name
            .clone()
            .or_else(|| obs.location_name.clone())
            .or_else(|| existing.location_name.clone()),
        latitude: location.map(|l| l.latitude),
        longitude: location.map(|l| l.longitude),
        accuracy: partial.accuracy.or(existing.accuracy),
        description: partial
            .description
            .clone()
            .or_else(|| obs.description.clone())
            .or_else(|| existing.description.clone()),
        tags,
        collections,
        photos: merge_media(&existing.photos, &obs.photos),
        videos: merge_media(&existing.videos, &obs.videos),
        audio: merge_media(&existing.audio, &obs.audio),
        license: partial
            .license
            .clone()
            .or_else(|| obs.license.clone())
            .or_else(|| existing.license.clone()),
        source: merge_sources(existing, obs),
        // Set once on first creation, never recomputed.
        created_at: existing.created_at.or(obs.created_at).or(obs.datetime),
        updated_at,
        comments: merge_comments(&existing.comments, &[]),
        allow_comments: partial.allow_comments.unwrap_or(existing.allow_comments),
    };

    item.clean();

    let errors = validate_item(&item, obs.media_requirement);
    if errors
        .iter()
        .any(|e| e.severity == ValidationSeverity::Error)
    {
        return Err(ReconcileError::invalid(errors));
    }

    Ok(item)
}

fn merge_sources(existing: &Item, obs: &Observation) -> Vec<fieldshare_domain::SourceRef> {
    let mut merged = existing.source.clone();
    for source in &obs.source {
        if !merged.iter().any(|s| s.name == source.name) {
            merged.push(source.clone());
        }
    }
    merged
}
