//! GeoJSON layer derived from a feed.

use fieldshare_domain::Location;
use serde::{Deserialize, Serialize};

use crate::feed::FeedItem;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`.
    pub coordinates: [f64; 2],
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

/// Build the map layer for a feed: one Point feature per located item;
/// items without coordinates are left out. Not paginated.
pub fn build_geo(items: &[FeedItem]) -> FeatureCollection {
    FeatureCollection {
        kind: "FeatureCollection".to_string(),
        features: items
            .iter()
            .filter_map(|item| {
                let coordinates = item.coordinates()?;
                Some(Feature {
                    kind: "Feature".to_string(),
                    geometry: Geometry {
                        kind: "Point".to_string(),
                        coordinates,
                    },
                    properties: FeatureProperties {
                        id: item.id.clone(),
                        url: item.url.clone(),
                        date: item.meta.date.clone(),
                        title: Some(item.title.clone()),
                        image: item.image.clone(),
                    },
                })
            })
            .collect(),
    }
}

/// Arithmetic mean of the present coordinates, rounded to 6 decimals.
/// `None` when no item is located, or when the mean collapses onto a zero
/// coordinate (which the location rules treat as invalid).
pub fn average_coord(items: &[FeedItem]) -> Option<[f64; 2]> {
    let coords: Vec<[f64; 2]> = items.iter().filter_map(FeedItem::coordinates).collect();
    if coords.is_empty() {
        return None;
    }
    let n = coords.len() as f64;
    let lng = coords.iter().map(|c| c[0]).sum::<f64>() / n;
    let lat = coords.iter().map(|c| c[1]).sum::<f64>() / n;
    Location::new(lat, lng).map(|loc| loc.geo_coordinates())
}
