//! Shared data model for the Storymap pipeline.
//!
//! Candidates flow out of the extractors, get merged into canonical places,
//! and pick up coordinates from the geocoder. Only geocoded places are
//! persisted.

use serde::{Deserialize, Serialize};

/// Sentiment attached to a place mention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

/// Travel mode for directions requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Transit,
    Bicycling,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Transit => "transit",
            TravelMode::Bicycling => "bicycling",
        }
    }
}

/// A raw place mention produced by one extractor. Ephemeral, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    /// Location type as reported by the extractor (country, city, landmark...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    /// Byte offset of the mention in the source text, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl PlaceCandidate {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            sentiment: None,
            start: None,
            end: None,
        }
    }
}

/// The merged, deduplicated representation of one real-world place.
/// Names are unique case-insensitively within one merge result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPlace {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sentiment: Sentiment,
    /// Total occurrences across both extractors.
    pub mentions: u32,
}

/// A canonical place resolved to coordinates by the geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPlace {
    pub name: String,
    #[serde(rename = "type", default = "unknown_kind")]
    pub kind: String,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default = "one")]
    pub mentions: u32,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Category tags, used by the tag-colored rendering variant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

fn unknown_kind() -> String {
    "Unknown".to_string()
}

fn one() -> u32 {
    1
}

impl GeocodedPlace {
    /// Both coordinates, or nothing. A place missing a finite lat/lng pair is
    /// excluded from map centers, marker sets, and routing.
    pub fn coords(&self) -> Option<(f64, f64)> {
        if self.lat.is_finite() && self.lng.is_finite() {
            Some((self.lat, self.lng))
        } else {
            None
        }
    }
}

/// One instruction in a computed route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub instruction: String,
    pub distance: String,
    pub duration: String,
}

/// A computed route between two geocoded places. Derived state, not
/// persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub distance: String,
    pub duration: String,
    pub start_address: String,
    pub end_address: String,
    pub steps: Vec<RouteStep>,
    /// Encoded overview polyline, exactly as the provider returned it.
    pub polyline: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_wire_format_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&Sentiment::Negative).unwrap(),
            "\"negative\""
        );
        let s: Sentiment = serde_json::from_str("\"positive\"").unwrap();
        assert_eq!(s, Sentiment::Positive);
    }

    #[test]
    fn geocoded_place_deserializes_with_minimal_fields() {
        let place: GeocodedPlace =
            serde_json::from_str(r#"{"name": "Paris", "lat": 48.85, "lng": 2.35}"#).unwrap();
        assert_eq!(place.kind, "Unknown");
        assert_eq!(place.sentiment, Sentiment::Neutral);
        assert_eq!(place.mentions, 1);
        assert_eq!(place.coords(), Some((48.85, 2.35)));
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let mut place: GeocodedPlace =
            serde_json::from_str(r#"{"name": "x", "lat": 1.0, "lng": 2.0}"#).unwrap();
        place.lat = f64::NAN;
        assert_eq!(place.coords(), None);
    }

    #[test]
    fn candidate_type_field_round_trips_as_type() {
        let c: PlaceCandidate =
            serde_json::from_str(r#"{"name": "Rome", "type": "city"}"#).unwrap();
        assert_eq!(c.kind.as_deref(), Some("city"));
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"type\":\"city\""));
    }
}
