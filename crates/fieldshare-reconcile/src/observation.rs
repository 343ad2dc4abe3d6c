//! Provider-native observations.

use chrono::{DateTime, FixedOffset};
use fieldshare_domain::{Identification, Location, Media, MediaRequirement, SourceRef};

use crate::partial::PartialItem;

/// Everything a provider adapter extracted from one payload: the
/// provider-native metadata plus the optional user-authored override.
///
/// This is the single input shape to [`crate::reconcile`]; the adapters in
/// [`crate::adapters`] are the only provider-specific code.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Observation {
    /// Set tag recorded on the item, e.g. `"dropbox"`.
    pub source_tag: String,
    /// File name stem for the canonical item path.
    pub slug: String,
    /// Capture time reported by the provider (EXIF or equivalent).
    pub datetime: Option<DateTime<FixedOffset>>,
    /// GPS position reported by the provider.
    pub location: Option<Location>,
    pub location_name: Option<String>,
    pub description: Option<String>,
    pub identifications: Vec<Identification>,
    pub tags: Vec<String>,
    pub photos: Vec<Media>,
    pub videos: Vec<Media>,
    pub audio: Vec<Media>,
    pub license: Option<String>,
    pub source: Vec<SourceRef>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub updated_at: Option<DateTime<FixedOffset>>,
    /// User-authored override parsed from a caption, when present.
    pub partial: Option<PartialItem>,
    /// Whether this provider requires media on the reconciled item.
    pub media_requirement: MediaRequirement,
}

impl Observation {
    /// Year segment of the canonical item path, from the provider's
    /// creation time (falling back to the capture time).
    pub fn year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.created_at.or(self.datetime).map(|dt| dt.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_prefers_created_at() {
        let obs = Observation {
            created_at: Some(DateTime::parse_from_rfc3339("2019-05-01T00:00:00+00:00").unwrap()),
            datetime: Some(DateTime::parse_from_rfc3339("2018-05-01T00:00:00+00:00").unwrap()),
            ..Default::default()
        };
        assert_eq!(obs.year(), Some(2019));
    }

    #[test]
    fn year_absent_without_timestamps() {
        assert_eq!(Observation::default().year(), None);
    }
}
