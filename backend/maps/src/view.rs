//! Deterministic map view computation.
//!
//! Everything the HTML renderers need — center, zoom, colored markers,
//! decoded route path — is computed here from the geocoded place list, so
//! both back-ends draw the same map and the logic stays unit-testable.

use serde::Serialize;
use tracing::warn;

use storymap_core::{GeocodedPlace, Route, Sentiment};

use crate::polyline;

/// How marker colors are assigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorScheme {
    /// positive → green, negative → red, neutral → blue.
    #[default]
    Sentiment,
    /// First tag through the fixed tag palette, blue default.
    Tags,
}

/// One renderable marker.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub color: &'static str,
    pub selected: bool,
    pub address: String,
    pub kind: String,
    pub sentiment: Sentiment,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

/// A decoded route path plus its hover text.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePath {
    pub points: Vec<(f64, f64)>,
    pub tooltip: String,
}

/// The complete renderable map state.
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom: u8,
    pub markers: Vec<Marker>,
    pub route: Option<RoutePath>,
}

impl MapView {
    /// Build the view. Places without a full coordinate pair are excluded
    /// from both the marker set and the center mean. Empty input falls back
    /// to center (0,0), zoom 2.
    pub fn build(
        places: &[GeocodedPlace],
        selected: &[String],
        route: Option<&Route>,
        scheme: ColorScheme,
    ) -> Self {
        let coords: Vec<(f64, f64)> = places.iter().filter_map(|p| p.coords()).collect();

        let (center, zoom) = if coords.is_empty() {
            ((0.0, 0.0), 2)
        } else {
            let n = coords.len() as f64;
            let center = (
                coords.iter().map(|c| c.0).sum::<f64>() / n,
                coords.iter().map(|c| c.1).sum::<f64>() / n,
            );
            let lat_span = span(coords.iter().map(|c| c.0));
            let lng_span = span(coords.iter().map(|c| c.1));
            (center, zoom_for_span(lat_span.max(lng_span)))
        };

        let markers = places
            .iter()
            .filter_map(|place| {
                let (lat, lng) = place.coords()?;
                Some(Marker {
                    name: place.name.clone(),
                    lat,
                    lng,
                    color: match scheme {
                        ColorScheme::Sentiment => sentiment_color(place.sentiment),
                        ColorScheme::Tags => tag_color(&place.tags),
                    },
                    selected: selected.iter().any(|s| s == &place.name),
                    address: place.formatted_address.clone(),
                    kind: place.kind.clone(),
                    sentiment: place.sentiment,
                    notes: place.notes.clone(),
                    tags: place.tags.clone(),
                })
            })
            .collect();

        let route = route.and_then(|r| match polyline::decode(&r.polyline) {
            Ok(points) if !points.is_empty() => Some(RoutePath {
                points,
                tooltip: format!("{} - {}", r.distance, r.duration),
            }),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Route polyline failed to decode; dropping path");
                None
            }
        });

        Self {
            center,
            zoom,
            markers,
            route,
        }
    }
}

fn span(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
    let min = values.fold(f64::INFINITY, f64::min);
    max - min
}

/// Fixed zoom table over the larger coordinate span. Thresholds are strict:
/// a span of exactly 10.0 takes the next branch down.
pub fn zoom_for_span(span: f64) -> u8 {
    if span > 20.0 {
        4
    } else if span > 10.0 {
        6
    } else if span > 5.0 {
        8
    } else if span > 1.0 {
        10
    } else {
        12
    }
}

pub fn sentiment_color(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "green",
        Sentiment::Negative => "red",
        Sentiment::Neutral => "blue",
    }
}

/// Fixed tag palette for the tag-colored variant.
pub fn tag_color(tags: &[String]) -> &'static str {
    let Some(first) = tags.first() else {
        return "blue";
    };
    match first.to_lowercase().as_str() {
        "landmark" => "red",
        "accommodation" => "blue",
        "eating" | "restaurant" => "orange",
        "drinking" | "bar" => "purple",
        "snacks" => "pink",
        "groceries" => "darkgreen",
        "cafe" => "beige",
        "nightlife" => "darkpurple",
        "attraction" => "darkred",
        "viewpoint" => "lightred",
        "concert" => "cadetblue",
        "shopping" => "lightblue",
        "transportation" => "gray",
        "natural" => "green",
        "cultural" => "darkblue",
        _ => "blue",
    }
}
