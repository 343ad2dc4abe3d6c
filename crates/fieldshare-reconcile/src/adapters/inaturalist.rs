//! iNaturalist adapter.
//!
//! Consumes one observation object from the iNaturalist
//! `/v1/observations` API. Observations already linked back to a
//! fieldshare item (via an observation field value) are skipped to avoid
//! re-importing our own exports.

use fieldshare_domain::{normalize_free_tag, Identification, Location, Media, MediaRequirement, SourceRef};
use serde::Deserialize;
use serde_json::Value;

use super::{parse_datetime_opt, AdapterError, ProviderAdapter};
use crate::observation::Observation;

/// Observation field marking an observation as one of our own exports.
const LINKBACK_FIELD: &str = "Fieldshare URL";

#[derive(Deserialize)]
struct InatObservation {
    id: u64,
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    time_observed_at: Option<String>,
    #[serde(default)]
    private_location: Option<String>,
    #[serde(default)]
    place_guess: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    ofvs: Vec<InatFieldValue>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    identifications: Vec<InatIdentification>,
    #[serde(default)]
    photos: Vec<InatPhoto>,
    #[serde(default)]
    license_code: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

#[derive(Deserialize)]
struct InatFieldValue {
    name: String,
}

#[derive(Deserialize)]
struct InatIdentification {
    taxon: InatTaxon,
    #[serde(default)]
    user: Option<InatUser>,
}

#[derive(Deserialize)]
struct InatTaxon {
    name: String,
    #[serde(default)]
    preferred_common_name: Option<String>,
}

#[derive(Deserialize)]
struct InatUser {
    login: String,
}

#[derive(Deserialize)]
struct InatPhoto {
    id: u64,
    #[serde(default)]
    original_dimensions: Option<InatDimensions>,
    #[serde(default)]
    license_code: Option<String>,
}

#[derive(Deserialize)]
struct InatDimensions {
    width: u32,
    height: u32,
}

/// `cc-by-nc` → `CC BY-NC` (only the first separator becomes a space).
fn display_license(code: &str) -> String {
    code.to_uppercase().replacen('-', " ", 1)
}

pub struct InaturalistAdapter;

impl ProviderAdapter for InaturalistAdapter {
    fn source_tag(&self) -> &'static str {
        "inaturalist"
    }

    fn observation(&self, payload: &Value) -> Result<Observation, AdapterError> {
        let obs: InatObservation = serde_json::from_value(payload.clone())?;

        if obs.ofvs.iter().any(|f| f.name == LINKBACK_FIELD) {
            return Err(AdapterError::Unusable("observation is a fieldshare export"));
        }

        let location = obs.private_location.as_deref().and_then(|raw| {
            let (lat, lng) = raw.split_once(',')?;
            Location::parse(lat, lng)
        });

        let identifications = obs
            .identifications
            .iter()
            .map(|i| Identification {
                name: i.taxon.name.clone(),
                common: i.taxon.preferred_common_name.clone(),
                by: i.user.iter().map(|u| u.login.clone()).collect(),
                reference: None,
            })
            .collect();

        let photos = obs
            .photos
            .iter()
            .map(|p| Media {
                source: Some("iNaturalist".to_string()),
                id: p.id.to_string(),
                width: p.original_dimensions.as_ref().map(|d| d.width),
                height: p.original_dimensions.as_ref().map(|d| d.height),
                thumbnail_url: Some(format!(
                    "https://static.inaturalist.org/photos/{}/large.jpg",
                    p.id
                )),
                original_url: Some(format!(
                    "https://static.inaturalist.org/photos/{}/original.jpg",
                    p.id
                )),
                license: p.license_code.as_deref().map(display_license),
                ..Default::default()
            })
            .collect();

        Ok(Observation {
            source_tag: self.source_tag().to_string(),
            slug: obs.id.to_string(),
            datetime: parse_datetime_opt(obs.time_observed_at.as_deref())?,
            location,
            location_name: obs.place_guess.clone(),
            description: obs.description.clone(),
            identifications,
            tags: obs
                .tags
                .iter()
                .filter_map(|t| normalize_free_tag(t))
                .collect(),
            photos,
            license: obs.license_code.as_deref().map(display_license),
            source: vec![SourceRef {
                name: "iNaturalist".to_string(),
                href: obs
                    .uri
                    .clone()
                    .or_else(|| Some(format!("https://www.inaturalist.org/observations/{}", obs.id))),
            }],
            created_at: parse_datetime_opt(obs.created_at.as_deref())?,
            updated_at: parse_datetime_opt(obs.updated_at.as_deref())?,
            // Identification-only observations are still sharable here.
            media_requirement: MediaRequirement::Relaxed,
            ..Default::default()
        })
    }
}
