//! Interchangeable HTML rendering back-ends over [`crate::view::MapView`].

pub mod google;
pub mod leaflet;

/// Minimal HTML escaping for text interpolated outside of JSON islands.
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Make serialized JSON safe to embed inside a `<script>` block. The HTML
/// parser ends a script element at the first `</`, regardless of JSON string
/// context, so a place name containing `</script>` would otherwise break out
/// of the island. `<\/` is identical JSON after string unescaping.
pub(crate) fn escape_json_island(json: &str) -> String {
    json.replace("</", "<\\/")
}
