//! Provider adapters.
//!
//! An adapter maps one raw provider payload (as fetched by the network
//! plumbing) onto an [`Observation`]. All provider-specific knowledge lives
//! here; the merge/validate/persist path is shared and provider-agnostic.

mod dropbox;
mod flickr;
mod inaturalist;

pub use dropbox::DropboxAdapter;
pub use flickr::FlickrAdapter;
pub use inaturalist::InaturalistAdapter;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::observation::Observation;

/// Adapter failure for one payload. Unusable payloads are a per-record
/// condition: the import driver logs and moves on.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("payload is missing required field: {0}")]
    MissingField(&'static str),
    #[error("unrecognised timestamp: {0}")]
    Timestamp(String),
    #[error("payload skipped: {0}")]
    Unusable(&'static str),
}

/// Maps raw provider payloads onto observations.
pub trait ProviderAdapter {
    /// Set tag recorded on imported items, e.g. `"flickr"`.
    fn source_tag(&self) -> &'static str;

    /// Build an observation from one payload.
    fn observation(&self, payload: &Value) -> Result<Observation, AdapterError>;
}

pub(crate) fn parse_datetime(raw: &str) -> Result<DateTime<FixedOffset>, AdapterError> {
    DateTime::parse_from_rfc3339(raw).map_err(|_| AdapterError::Timestamp(raw.to_string()))
}

pub(crate) fn parse_datetime_opt(
    raw: Option<&str>,
) -> Result<Option<DateTime<FixedOffset>>, AdapterError> {
    raw.map(parse_datetime).transpose()
}

pub(crate) fn from_unix(secs: i64) -> Option<DateTime<FixedOffset>> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.fixed_offset())
}

/// Numeric coercion for payload fields that arrive as either numbers or
/// numeric strings (Flickr does both).
pub(crate) fn value_u32(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn value_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn value_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coercion_accepts_numbers_and_strings() {
        assert_eq!(value_u32(Some(&json!(640))), Some(640));
        assert_eq!(value_u32(Some(&json!("640"))), Some(640));
        assert_eq!(value_u32(Some(&json!(null))), None);
        assert_eq!(value_f64(Some(&json!("-37.5"))), Some(-37.5));
        assert_eq!(value_i64(Some(&json!("1577836800"))), Some(1_577_836_800));
    }

    #[test]
    fn unix_conversion() {
        let dt = from_unix(1_577_836_800).unwrap();
        assert_eq!(dt.to_rfc3339(), "2020-01-01T00:00:00+00:00");
    }
}
