//! Google Maps JavaScript rendering back-end.
//!
//! Same embedded-view approach as the Leaflet renderer; markers use the
//! classic colored-dot icons, with a pushpin plus bounce animation for
//! selected places.

use crate::render::{escape_html, escape_json_island};
use crate::view::MapView;

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>__TITLE__</title>
    <style>
        html, body { height: 100%; margin: 0; padding: 0; }
        #map { height: 100%; width: 100%; }
        .info-window { max-width: 300px; }
    </style>
</head>
<body>
    <div id="map"></div>
    <script>
        const view = __VIEW__;

        // The dot icon set only ships a handful of colors.
        const ICON_COLORS = {
            "green": "green", "red": "red", "blue": "blue",
            "orange": "orange", "purple": "purple", "pink": "pink",
            "lightblue": "ltblue", "cadetblue": "ltblue",
            "darkgreen": "green", "darkred": "red", "darkblue": "blue",
            "darkpurple": "purple", "lightred": "pink", "beige": "yellow",
            "gray": "yellow"
        };
        const iconFor = (m) => {
            const color = ICON_COLORS[m.color] || "blue";
            const shape = m.selected ? "pushpin" : "dot";
            return `http://maps.google.com/mapfiles/ms/icons/${color}-${shape}.png`;
        };

        const escapeHtml = (s) => String(s ?? "")
            .replaceAll("&", "&amp;").replaceAll("<", "&lt;")
            .replaceAll(">", "&gt;").replaceAll('"', "&quot;");

        function initMap() {
            const map = new google.maps.Map(document.getElementById("map"), {
                zoom: view.zoom,
                center: { lat: view.center[0], lng: view.center[1] }
            });
            const infoWindow = new google.maps.InfoWindow();

            for (const m of view.markers) {
                const marker = new google.maps.Marker({
                    position: { lat: m.lat, lng: m.lng },
                    map,
                    title: m.name,
                    icon: iconFor(m),
                    animation: m.selected ? google.maps.Animation.BOUNCE : null
                });
                marker.addListener("click", () => {
                    let html = `<div class="info-window"><h3>${escapeHtml(m.name)}</h3>`;
                    if (m.address) html += `<p>${escapeHtml(m.address)}</p>`;
                    html += `<p><strong>Type:</strong> ${escapeHtml(m.kind)}</p>`;
                    html += `<p><strong>Sentiment:</strong> ${escapeHtml(m.sentiment)}</p>`;
                    if (m.notes) html += `<p><strong>Notes:</strong> ${escapeHtml(m.notes)}</p>`;
                    html += "</div>";
                    infoWindow.setContent(html);
                    infoWindow.open(map, marker);
                });
            }

            if (view.route) {
                const path = new google.maps.Polyline({
                    path: view.route.points.map((p) => ({ lat: p[0], lng: p[1] })),
                    geodesic: true,
                    strokeColor: "#0000FF",
                    strokeOpacity: 0.7,
                    strokeWeight: 5
                });
                path.setMap(map);
                const routeInfo = new google.maps.InfoWindow({
                    content: escapeHtml(view.route.tooltip)
                });
                google.maps.event.addListener(path, "click", (event) => {
                    routeInfo.setPosition(event.latLng);
                    routeInfo.open(map);
                });
            }
        }
    </script>
    <script src="https://maps.googleapis.com/maps/api/js?key=__API_KEY__&callback=initMap&v=weekly" async defer></script>
</body>
</html>
"##;

/// Render the view as a Google Maps HTML document. Requires the maps key the
/// browser will use to load the JS API.
pub fn render(view: &MapView, title: &str, api_key: &str) -> String {
    let view_json = serde_json::to_string(view)
        .unwrap_or_else(|_| r#"{"center":[0,0],"zoom":2,"markers":[],"route":null}"#.to_string());
    TEMPLATE
        .replace("__TITLE__", &escape_html(title))
        .replace("__VIEW__", &escape_json_island(&view_json))
        .replace("__API_KEY__", &escape_html(api_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ColorScheme;
    use storymap_core::GeocodedPlace;

    #[test]
    fn embeds_key_and_markers() {
        let place: GeocodedPlace =
            serde_json::from_str(r#"{"name": "Rome", "lat": 41.9, "lng": 12.5}"#).unwrap();
        let view = MapView::build(&[place], &[], None, ColorScheme::Sentiment);
        let html = render(&view, "trip", "test-maps-key");
        assert!(html.contains("key=test-maps-key"));
        assert!(html.contains("\"name\":\"Rome\""));
        assert!(html.contains("initMap"));
        // The route stroke color literal and everything after it must survive.
        assert!(html.contains("#0000FF"));
        assert!(html.contains("</html>"));
    }

    #[test]
    fn hostile_place_name_cannot_break_out_of_the_script_block() {
        let place: GeocodedPlace = serde_json::from_str(
            r#"{"name": "</script><script>alert(1)//", "lat": 1.0, "lng": 2.0}"#,
        )
        .unwrap();
        let view = MapView::build(&[place], &[], None, ColorScheme::Sentiment);
        let html = render(&view, "t", "k");
        assert!(!html.contains("</script><script>alert(1)//"));
        assert!(html.contains(r#"<\/script><script>alert(1)//"#));
    }
}
