//! Shareable Google Maps directions deep link.

use storymap_core::GeocodedPlace;

/// Build a directions URL covering up to the first 10 geocoded points: the
/// first place becomes the destination, the next nine become waypoints.
/// Returns `None` when no place has coordinates.
pub fn directions_url(places: &[GeocodedPlace]) -> Option<String> {
    let mut coords = places.iter().filter_map(|p| p.coords());
    let (dest_lat, dest_lng) = coords.next()?;

    let waypoints: Vec<String> = coords
        .take(9)
        .map(|(lat, lng)| format!("{lat},{lng}"))
        .collect();

    let mut url =
        format!("https://www.google.com/maps/dir/?api=1&destination={dest_lat},{dest_lng}");
    if !waypoints.is_empty() {
        url.push_str("&waypoints=");
        url.push_str(&urlencoding::encode(&waypoints.join("|")));
    }
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, lat: f64, lng: f64) -> GeocodedPlace {
        serde_json::from_str(&format!(
            r#"{{"name": "{name}", "lat": {lat}, "lng": {lng}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn single_place_is_destination_only() {
        let url = directions_url(&[place("a", 1.5, 2.5)]).unwrap();
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&destination=1.5,2.5"
        );
    }

    #[test]
    fn later_places_become_waypoints() {
        let url =
            directions_url(&[place("a", 1.0, 2.0), place("b", 3.0, 4.0), place("c", 5.0, 6.0)])
                .unwrap();
        assert!(url.contains("destination=1,2"));
        assert!(url.contains("waypoints=3%2C4%7C5%2C6"));
    }

    #[test]
    fn caps_at_ten_points() {
        let places: Vec<_> = (0..15).map(|i| place("p", i as f64, i as f64)).collect();
        let url = directions_url(&places).unwrap();
        // Destination plus nine waypoints; the encoded separator count tells.
        assert_eq!(url.matches("%7C").count(), 8);
    }

    #[test]
    fn no_coordinates_means_no_link() {
        assert!(directions_url(&[]).is_none());
    }
}
