//! Dropbox adapter.
//!
//! The fetch plumbing lists a folder, downloads the sidecar caption file
//! next to each photo and resolves a public shared link, then hands the
//! combined payload to this adapter:
//!
//! ```json
//! {
//!   "name": "fox crossing.jpg",
//!   "folder": "Winter Foxes",
//!   "server_modified": "2020-01-02T03:04:05Z",
//!   "media_info": {
//!     "metadata": {
//!       "dimensions": { "width": 4032, "height": 3024 },
//!       "location": { "latitude": -37.1, "longitude": 145.2 },
//!       "time_taken": "2020-01-01T17:45:00Z"
//!     }
//!   },
//!   "shared_url": "https://www.dropbox.com/s/abc/fox.jpg?dl=0",
//!   "thumbnail_url": "https://files.example.org/u/items/dropbox/...jpg",
//!   "caption": "--- ... ---",
//!   "caption_name": "fox crossing.yaml",
//!   "caption_modified": "2020-01-02T04:00:00Z"
//! }
//! ```
//!
//! A payload whose caption carries no embedded item document is unusable:
//! the sidecar file is how Dropbox users opt a photo in.

use fieldshare_domain::{Location, Media, MediaRequirement};
use serde::Deserialize;
use serde_json::Value;

use super::{parse_datetime_opt, AdapterError, ProviderAdapter};
use crate::caption::parse_item_description;
use crate::observation::Observation;
use crate::slug::slugify;

#[derive(Deserialize)]
struct DropboxPayload {
    name: String,
    #[serde(default)]
    folder: Option<String>,
    #[serde(default)]
    server_modified: Option<String>,
    #[serde(default)]
    media_info: Option<MediaInfo>,
    #[serde(default)]
    shared_url: Option<String>,
    #[serde(default)]
    thumbnail_url: Option<String>,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    caption_name: Option<String>,
    #[serde(default)]
    caption_modified: Option<String>,
}

#[derive(Deserialize)]
struct MediaInfo {
    #[serde(default)]
    metadata: Option<MediaMetadata>,
}

#[derive(Deserialize)]
struct MediaMetadata {
    #[serde(default)]
    dimensions: Option<Dimensions>,
    #[serde(default)]
    location: Option<GpsCoordinates>,
    #[serde(default)]
    time_taken: Option<String>,
}

#[derive(Deserialize)]
struct Dimensions {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct GpsCoordinates {
    latitude: f64,
    longitude: f64,
}

fn file_stem(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

pub struct DropboxAdapter;

impl ProviderAdapter for DropboxAdapter {
    fn source_tag(&self) -> &'static str {
        "dropbox"
    }

    fn observation(&self, payload: &Value) -> Result<Observation, AdapterError> {
        let payload: DropboxPayload = serde_json::from_value(payload.clone())?;

        let partial = payload
            .caption
            .as_deref()
            .and_then(parse_item_description)
            .ok_or(AdapterError::Unusable("caption has no item document"))?;

        let metadata = payload.media_info.and_then(|m| m.metadata);
        let (dimensions, gps, time_taken) = match metadata {
            Some(m) => (m.dimensions, m.location, m.time_taken),
            None => (None, None, None),
        };

        let datetime = parse_datetime_opt(time_taken.as_deref())?;
        let server_modified = parse_datetime_opt(payload.server_modified.as_deref())?;
        let caption_modified = parse_datetime_opt(payload.caption_modified.as_deref())?;
        // Later of the photo's and the sidecar's modification time.
        let updated_at = match (server_modified, caption_modified) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };

        let slug_source = payload
            .caption_name
            .as_deref()
            .map(file_stem)
            .unwrap_or_else(|| file_stem(&payload.name));
        let mut slug = slugify(slug_source);
        if let Some(folder) = payload.folder.as_deref() {
            let folder = slugify(folder);
            if !folder.is_empty() {
                slug = format!("{folder}_{slug}");
            }
        }

        let photo = Media {
            source: Some("dropbox".to_string()),
            id: payload.name.clone(),
            href: payload.shared_url.clone(),
            datetime,
            width: dimensions.as_ref().map(|d| d.width),
            height: dimensions.as_ref().map(|d| d.height),
            thumbnail_url: payload.thumbnail_url.clone(),
            original_url: payload
                .shared_url
                .as_deref()
                .map(|url| url.replace("dl=0", "dl=1")),
            ..Default::default()
        };

        Ok(Observation {
            source_tag: self.source_tag().to_string(),
            slug,
            datetime,
            location: gps.and_then(|g| Location::new(g.latitude, g.longitude)),
            photos: vec![photo],
            created_at: datetime,
            updated_at,
            partial: Some(partial),
            media_requirement: MediaRequirement::Required,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "name": "fox crossing.jpg",
            "folder": "Winter Foxes",
            "server_modified": "2020-01-02T03:04:05Z",
            "media_info": {
                "metadata": {
                    "dimensions": { "width": 4032, "height": 3024 },
                    "location": { "latitude": -37.1, "longitude": 145.2 },
                    "time_taken": "2020-01-01T17:45:00Z"
                }
            },
            "shared_url": "https://www.dropbox.com/s/abc/fox.jpg?dl=0",
            "thumbnail_url": "https://files.example.org/u/items/dropbox/fox.jpg",
            "caption": "---\ntags:\n  - night\n---\n",
            "caption_name": "fox crossing.yaml",
            "caption_modified": "2020-01-02T04:00:00Z"
        })
    }

    #[test]
    fn builds_observation() {
        let obs = DropboxAdapter.observation(&payload()).unwrap();
        assert_eq!(obs.source_tag, "dropbox");
        assert_eq!(obs.slug, "winter_foxes_fox_crossing");
        assert_eq!(obs.photos.len(), 1);
        assert_eq!(obs.photos[0].width, Some(4032));
        assert_eq!(
            obs.photos[0].original_url.as_deref(),
            Some("https://www.dropbox.com/s/abc/fox.jpg?dl=1")
        );
        assert_eq!(obs.location.unwrap().latitude, -37.1);
        // Sidecar modification is later than the photo's.
        assert_eq!(
            obs.updated_at.unwrap().to_rfc3339(),
            "2020-01-02T04:00:00+00:00"
        );
        assert_eq!(obs.partial.as_ref().unwrap().tags, vec!["night"]);
    }

    #[test]
    fn caption_without_document_is_unusable() {
        let mut p = payload();
        p["caption"] = json!("just a plain caption");
        let err = DropboxAdapter.observation(&p).unwrap_err();
        assert!(matches!(err, AdapterError::Unusable(_)));
    }

    #[test]
    fn gps_zero_is_dropped() {
        let mut p = payload();
        p["media_info"]["metadata"]["location"] = json!({ "latitude": 0.0, "longitude": 0.0 });
        let obs = DropboxAdapter.observation(&p).unwrap();
        assert_eq!(obs.location, None);
    }
}
