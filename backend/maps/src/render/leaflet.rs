//! Leaflet/OpenStreetMap rendering back-end.
//!
//! The view is embedded as a JSON island and all drawing happens client-side,
//! so the artifact is a single self-contained HTML file (plus CDN assets).

use crate::render::{escape_html, escape_json_island};
use crate::view::MapView;

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>__TITLE__</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
    <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css">
    <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css">
    <style>
        html, body { height: 100%; margin: 0; padding: 0; }
        #map { height: 100%; width: 100%; }
        .popup { max-width: 300px; }
    </style>
</head>
<body>
    <div id="map"></div>
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"></script>
    <script>
        const view = __VIEW__;

        // Palette names that are not valid CSS colors.
        const CSS_COLORS = {
            "lightred": "#ff8a80",
            "darkpurple": "#5b2c6f",
            "cadetblue": "cadetblue",
            "darkgreen": "darkgreen",
            "darkred": "darkred",
            "darkblue": "darkblue",
            "lightblue": "lightblue"
        };
        const cssColor = (name) => CSS_COLORS[name] || name;

        const escapeHtml = (s) => String(s ?? "")
            .replaceAll("&", "&amp;").replaceAll("<", "&lt;")
            .replaceAll(">", "&gt;").replaceAll('"', "&quot;");

        const popupHtml = (m) => {
            let html = `<div class="popup"><b>${escapeHtml(m.name)}</b><br>`;
            if (m.address) html += `${escapeHtml(m.address)}<br>`;
            html += `Type: ${escapeHtml(m.kind)}<br>`;
            html += `Sentiment: ${escapeHtml(m.sentiment)}<br>`;
            if (m.tags.length) html += `Tags: ${escapeHtml(m.tags.join(", "))}<br>`;
            if (m.notes) html += `Notes: ${escapeHtml(m.notes)}<br>`;
            return html + "</div>";
        };

        const map = L.map("map").setView(view.center, view.zoom);
        L.tileLayer("https://tile.openstreetmap.org/{z}/{x}/{y}.png", {
            attribution: "&copy; OpenStreetMap contributors"
        }).addTo(map);

        const cluster = L.markerClusterGroup();
        for (const m of view.markers) {
            const marker = L.circleMarker([m.lat, m.lng], {
                radius: m.selected ? 12 : 8,
                color: cssColor(m.color),
                fillColor: cssColor(m.color),
                fillOpacity: m.selected ? 0.9 : 0.6,
                weight: m.selected ? 3 : 1
            });
            marker.bindPopup(popupHtml(m));
            cluster.addLayer(marker);
        }
        map.addLayer(cluster);

        if (view.route) {
            L.polyline(view.route.points, { color: "blue", weight: 5, opacity: 0.7 })
                .bindTooltip(view.route.tooltip)
                .addTo(map);
        }
    </script>
</body>
</html>
"##;

/// Render the view as a self-contained Leaflet HTML document.
pub fn render(view: &MapView, title: &str) -> String {
    let view_json =
        serde_json::to_string(view).unwrap_or_else(|_| r#"{"center":[0,0],"zoom":2,"markers":[],"route":null}"#.to_string());
    TEMPLATE
        .replace("__TITLE__", &escape_html(title))
        .replace("__VIEW__", &escape_json_island(&view_json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ColorScheme;
    use storymap_core::GeocodedPlace;

    #[test]
    fn embeds_view_json_and_title() {
        let place: GeocodedPlace = serde_json::from_str(
            r#"{"name": "Paris", "lat": 48.85, "lng": 2.35, "formatted_address": "Paris, France"}"#,
        )
        .unwrap();
        let view = MapView::build(&[place], &[], None, ColorScheme::Sentiment);
        let html = render(&view, "My <Trip>");
        assert!(html.contains("My &lt;Trip&gt;"));
        assert!(html.contains("\"name\":\"Paris\""));
        assert!(html.contains("leaflet.markercluster"));
    }

    #[test]
    fn empty_view_renders_world_fallback() {
        let view = MapView::build(&[], &[], None, ColorScheme::Sentiment);
        let html = render(&view, "empty");
        assert!(html.contains("\"zoom\":2"));
        assert!(html.contains("\"markers\":[]"));
    }

    #[test]
    fn template_survives_past_hex_color_literals() {
        let view = MapView::build(&[], &[], None, ColorScheme::Sentiment);
        let html = render(&view, "t");
        // The palette table and everything after it must be present.
        assert!(html.contains("#ff8a80"));
        assert!(html.contains("</html>"));
    }

    #[test]
    fn hostile_place_name_cannot_break_out_of_the_script_block() {
        let place: GeocodedPlace = serde_json::from_str(
            r#"{"name": "</script><script>alert(1)//", "lat": 1.0, "lng": 2.0}"#,
        )
        .unwrap();
        let view = MapView::build(&[place], &[], None, ColorScheme::Sentiment);
        let html = render(&view, "t");
        assert!(!html.contains("</script><script>alert(1)//"));
        assert!(html.contains(r#"<\/script><script>alert(1)//"#));
    }
}
