//! Geocoding adapter over the Google Maps Geocoding API.
//!
//! Zero results or a non-OK provider status is "not found", reported as
//! `Ok(None)` so the caller can skip the place; only transport and parse
//! problems are errors. The batch form paces calls with a fixed delay to
//! respect the provider rate limit.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use storymap_core::{CanonicalPlace, GeocodedPlace, StorymapError};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
const DEFAULT_PACE: Duration = Duration::from_millis(200);

/// Google Maps geocoding client.
pub struct Geocoder {
    client: Client,
    api_key: String,
    base_url: String,
    pace: Duration,
}

impl Geocoder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            pace: DEFAULT_PACE,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    /// Resolve one canonical place to coordinates. `Ok(None)` means the
    /// provider had no answer for this name.
    pub async fn geocode(&self, place: &CanonicalPlace) -> Result<Option<GeocodedPlace>> {
        debug!(place = %place.name, "Geocoding");

        let response = self
            .client
            .get(format!("{}/geocode/json", self.base_url))
            .query(&[
                ("address", place.name.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("geocoding request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorymapError::provider("geocoding", status.to_string()).into());
        }

        let data: GeocodeResponse = response
            .json()
            .await
            .context("failed to parse geocoding response")?;

        if data.status != "OK" {
            warn!(place = %place.name, status = %data.status, "Geocoding returned no result");
            return Ok(None);
        }
        let Some(result) = data.results.into_iter().next() else {
            warn!(place = %place.name, "Geocoding returned an empty result set");
            return Ok(None);
        };

        Ok(Some(geocoded_from_result(place, result)))
    }

    /// Geocode a whole merged list, sequentially, with the fixed inter-call
    /// delay. Failed or unresolvable places are skipped. Progress is reported
    /// after each place as a fraction in (0, 1].
    pub async fn geocode_all(
        &self,
        places: &[CanonicalPlace],
        mut on_progress: impl FnMut(f64) + Send,
    ) -> Vec<GeocodedPlace> {
        let total = places.len();
        let mut out = Vec::with_capacity(total);

        for (i, place) in places.iter().enumerate() {
            match self.geocode(place).await {
                Ok(Some(geocoded)) => out.push(geocoded),
                Ok(None) => {}
                Err(e) => {
                    warn!(place = %place.name, error = %e, "Geocoding failed; skipping place");
                }
            }
            on_progress((i + 1) as f64 / total as f64);
            if i + 1 < total {
                tokio::time::sleep(self.pace).await;
            }
        }

        out
    }
}

/// Carry the canonical fields over and attach the provider's resolution.
fn geocoded_from_result(place: &CanonicalPlace, result: GeocodeResult) -> GeocodedPlace {
    GeocodedPlace {
        name: place.name.clone(),
        kind: place.kind.clone(),
        sentiment: place.sentiment,
        mentions: place.mentions,
        lat: result.geometry.location.lat,
        lng: result.geometry.location.lng,
        formatted_address: result.formatted_address,
        place_id: result.place_id,
        notes: None,
        tags: Vec::new(),
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
    place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}
