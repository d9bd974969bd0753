//! Directions adapter over the Google Maps Directions API.
//!
//! Waypoint order is optimized by the provider. Only the first leg of the
//! first route is surfaced; multi-destination itineraries are out of scope.

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use storymap_core::{GeocodedPlace, Route, RouteStep, StorymapError, TravelMode};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Google Maps directions client.
pub struct Directions {
    client: Client,
    api_key: String,
    base_url: String,
}

impl Directions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Compute a route. `Ok(None)` means the provider could not produce one
    /// (no route between the points, unsupported mode for the region, ...).
    pub async fn route(
        &self,
        origin: &GeocodedPlace,
        destination: &GeocodedPlace,
        waypoints: &[GeocodedPlace],
        mode: TravelMode,
    ) -> Result<Option<Route>> {
        let Some((olat, olng)) = origin.coords() else {
            bail!("origin {:?} has no coordinates", origin.name);
        };
        let Some((dlat, dlng)) = destination.coords() else {
            bail!("destination {:?} has no coordinates", destination.name);
        };

        let mut query = vec![
            ("origin", format!("{olat},{olng}")),
            ("destination", format!("{dlat},{dlng}")),
            ("mode", mode.as_str().to_string()),
            ("key", self.api_key.clone()),
        ];

        let waypoint_coords: Vec<String> = waypoints
            .iter()
            .filter_map(|w| w.coords())
            .map(|(lat, lng)| format!("{lat},{lng}"))
            .collect();
        if !waypoint_coords.is_empty() {
            query.push((
                "waypoints",
                format!("optimize:true|{}", waypoint_coords.join("|")),
            ));
        }

        debug!(
            origin = %origin.name,
            destination = %destination.name,
            waypoints = waypoints.len(),
            mode = mode.as_str(),
            "Requesting directions"
        );

        let response = self
            .client
            .get(format!("{}/directions/json", self.base_url))
            .query(&query)
            .send()
            .await
            .context("directions request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorymapError::provider("directions", status.to_string()).into());
        }

        let data: DirectionsResponse = response
            .json()
            .await
            .context("failed to parse directions response")?;

        if data.status != "OK" {
            warn!(status = %data.status, "Directions returned no route");
            return Ok(None);
        }

        Ok(route_from_response(data))
    }
}

/// First route, first leg. Step order is the provider's.
fn route_from_response(data: DirectionsResponse) -> Option<Route> {
    let provider_route = data.routes.into_iter().next()?;
    let leg = provider_route.legs.into_iter().next()?;

    Some(Route {
        distance: leg.distance.text,
        duration: leg.duration.text,
        start_address: leg.start_address,
        end_address: leg.end_address,
        steps: leg
            .steps
            .into_iter()
            .map(|s| RouteStep {
                instruction: s.html_instructions,
                distance: s.distance.text,
                duration: s.duration.text,
            })
            .collect(),
        polyline: provider_route.overview_polyline.points,
    })
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<ProviderRoute>,
}

#[derive(Debug, Deserialize)]
struct ProviderRoute {
    legs: Vec<ProviderLeg>,
    overview_polyline: OverviewPolyline,
}

#[derive(Debug, Deserialize)]
struct OverviewPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct ProviderLeg {
    distance: TextValue,
    duration: TextValue,
    start_address: String,
    end_address: String,
    #[serde(default)]
    steps: Vec<ProviderStep>,
}

#[derive(Debug, Deserialize)]
struct ProviderStep {
    html_instructions: String,
    distance: TextValue,
    duration: TextValue,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "status": "OK",
        "routes": [{
            "overview_polyline": {"points": "_p~iF~ps|U_ulLnnqC"},
            "legs": [{
                "distance": {"text": "12.4 km"},
                "duration": {"text": "24 mins"},
                "start_address": "Paris, France",
                "end_address": "Versailles, France",
                "steps": [
                    {
                        "html_instructions": "Head <b>south</b>",
                        "distance": {"text": "300 m"},
                        "duration": {"text": "1 min"}
                    },
                    {
                        "html_instructions": "Merge onto <b>A13</b>",
                        "distance": {"text": "12.1 km"},
                        "duration": {"text": "23 mins"}
                    }
                ]
            }]
        }]
    }"#;

    #[test]
    fn surfaces_first_leg_with_step_order_preserved() {
        let data: DirectionsResponse = serde_json::from_str(SAMPLE).unwrap();
        let route = route_from_response(data).unwrap();
        assert_eq!(route.distance, "12.4 km");
        assert_eq!(route.start_address, "Paris, France");
        assert_eq!(route.end_address, "Versailles, France");
        assert_eq!(route.steps.len(), 2);
        assert_eq!(route.steps[0].instruction, "Head <b>south</b>");
        assert_eq!(route.polyline, "_p~iF~ps|U_ulLnnqC");
    }

    #[test]
    fn not_found_status_has_no_routes() {
        let data: DirectionsResponse =
            serde_json::from_str(r#"{"status": "NOT_FOUND", "routes": []}"#).unwrap();
        assert_eq!(data.status, "NOT_FOUND");
        assert!(route_from_response(data).is_none());
    }

    #[tokio::test]
    async fn origin_without_coordinates_is_rejected() {
        let directions = Directions::new("k").with_base_url("http://directions.invalid");
        let mut origin: GeocodedPlace =
            serde_json::from_str(r#"{"name": "a", "lat": 1.0, "lng": 2.0}"#).unwrap();
        let destination: GeocodedPlace =
            serde_json::from_str(r#"{"name": "b", "lat": 3.0, "lng": 4.0}"#).unwrap();
        origin.lat = f64::NAN;

        let err = directions
            .route(&origin, &destination, &[], TravelMode::Driving)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no coordinates"));
    }
}
