//! Flickr adapter.
//!
//! Consumes one photo object from the Flickr people.getPhotos response
//! (with `description`, `date_upload`, `last_update`, `geo`, `tags`,
//! `url_m`, `url_o`, `media` extras requested by the fetch plumbing).
//! Numeric fields arrive as numbers or strings depending on the endpoint;
//! both are accepted.

use chrono::NaiveDateTime;
use fieldshare_domain::{Location, Media, MediaRequirement};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::{from_unix, value_f64, value_i64, value_u32, AdapterError, ProviderAdapter};
use crate::caption::parse_item_description;
use crate::observation::Observation;

#[derive(Deserialize)]
struct FlickrPhoto {
    id: String,
    owner: String,
    #[serde(default)]
    description: Option<FlickrContent>,
    #[serde(default)]
    datetaken: Option<String>,
    #[serde(default)]
    datetakenunknown: Option<Value>,
    #[serde(default)]
    dateupload: Option<Value>,
    #[serde(default)]
    lastupdate: Option<Value>,
    #[serde(default)]
    tags: Option<String>,
    #[serde(default)]
    latitude: Option<Value>,
    #[serde(default)]
    longitude: Option<Value>,
    #[serde(default)]
    width_o: Option<Value>,
    #[serde(default)]
    height_o: Option<Value>,
    #[serde(default)]
    url_m: Option<String>,
    #[serde(default)]
    url_o: Option<String>,
    #[serde(default)]
    media: Option<String>,
    #[serde(default)]
    media_status: Option<String>,
}

#[derive(Deserialize)]
struct FlickrContent {
    #[serde(rename = "_content", default)]
    content: Option<String>,
}

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

fn strip_tags(html: &str) -> String {
    HTML_TAG.replace_all(html, "").into_owned()
}

/// `datetaken` is camera-local without an offset, e.g. `2020-01-02 17:45:00`.
fn parse_date_taken(raw: &str) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

pub struct FlickrAdapter;

impl ProviderAdapter for FlickrAdapter {
    fn source_tag(&self) -> &'static str {
        "flickr"
    }

    fn observation(&self, payload: &Value) -> Result<Observation, AdapterError> {
        let photo: FlickrPhoto = serde_json::from_value(payload.clone())?;

        if photo.media_status.as_deref().is_some_and(|s| s != "ready") {
            return Err(AdapterError::Unusable("media is not ready"));
        }

        let date_taken_known = value_i64(photo.datetakenunknown.as_ref()) == Some(0);
        let datetime = if date_taken_known {
            photo.datetaken.as_deref().and_then(parse_date_taken)
        } else {
            None
        };

        let partial = photo
            .description
            .as_ref()
            .and_then(|d| d.content.as_deref())
            .and_then(|content| parse_item_description(&strip_tags(content)));

        let href = format!("https://www.flickr.com/photos/{}/{}", photo.owner, photo.id);
        let media = Media {
            source: Some("flickr".to_string()),
            id: photo.id.clone(),
            href: Some(href),
            datetime,
            width: value_u32(photo.width_o.as_ref()),
            height: value_u32(photo.height_o.as_ref()),
            thumbnail_url: photo.url_m.clone(),
            original_url: photo.url_o.clone(),
            ..Default::default()
        };

        // Videos keep the photo entry (the poster frame) and add a video
        // entry without a direct original URL.
        let videos = if photo.media.as_deref() == Some("video") {
            vec![Media {
                original_url: None,
                ..media.clone()
            }]
        } else {
            Vec::new()
        };

        let tags = photo
            .tags
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
            .map(str::to_string)
            .collect();

        Ok(Observation {
            source_tag: self.source_tag().to_string(),
            slug: photo.id.clone(),
            datetime,
            location: match (
                value_f64(photo.latitude.as_ref()),
                value_f64(photo.longitude.as_ref()),
            ) {
                (Some(lat), Some(lng)) => Location::new(lat, lng),
                _ => None,
            },
            tags,
            photos: vec![media],
            videos,
            created_at: value_i64(photo.dateupload.as_ref()).and_then(from_unix),
            updated_at: value_i64(photo.lastupdate.as_ref()).and_then(from_unix),
            partial,
            media_requirement: MediaRequirement::Required,
            ..Default::default()
        })
    }
}
