use storymap_core::{CanonicalPlace, GeocodedPlace, Route};

/// Mutable per-server working state. One instance lives behind a mutex in
/// `AppState`; every handler mutation happens while the lock is held, so the
/// fields are always consistent with each other.
#[derive(Debug, Default)]
pub struct Session {
    /// The text the extractors operate on.
    pub input_text: String,
    /// Merged extraction output for the current text.
    pub places: Vec<CanonicalPlace>,
    /// Geocoded subset of `places`, in place order. This is what gets
    /// rendered and saved.
    pub geocoded: Vec<GeocodedPlace>,
    /// The most recent computed route, if any.
    pub route: Option<Route>,
    /// Names of the places highlighted on the map (route endpoints).
    pub selected: Vec<String>,
    /// Name of the saved map this session was loaded from or saved as.
    pub map_name: Option<String>,
}

impl Session {
    /// Replace the working text. Extraction results belong to the old text,
    /// so everything derived is dropped.
    pub fn set_text(&mut self, text: String) {
        self.input_text = text;
        self.clear_derived();
    }

    /// Install a fresh extraction result, dropping route and selection.
    pub fn set_places(&mut self, places: Vec<CanonicalPlace>, geocoded: Vec<GeocodedPlace>) {
        self.places = places;
        self.geocoded = geocoded;
        self.route = None;
        self.selected.clear();
    }

    /// Replace the geocoded list with a loaded map.
    pub fn load_map(&mut self, name: String, geocoded: Vec<GeocodedPlace>) {
        self.places.clear();
        self.geocoded = geocoded;
        self.route = None;
        self.selected.clear();
        self.map_name = Some(name);
    }

    fn clear_derived(&mut self) {
        self.places.clear();
        self.geocoded.clear();
        self.route = None;
        self.selected.clear();
        self.map_name = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storymap_core::Sentiment;

    fn canonical(name: &str) -> CanonicalPlace {
        CanonicalPlace {
            name: name.to_string(),
            kind: "City".to_string(),
            sentiment: Sentiment::Neutral,
            mentions: 1,
        }
    }

    fn geocoded(name: &str) -> GeocodedPlace {
        serde_json::from_str(&format!(r#"{{"name": "{name}", "lat": 1.0, "lng": 2.0}}"#)).unwrap()
    }

    #[test]
    fn new_text_drops_all_derived_state() {
        let mut session = Session::default();
        session.set_places(vec![canonical("Paris")], vec![geocoded("Paris")]);
        session.selected.push("Paris".to_string());
        session.map_name = Some("trip".to_string());

        session.set_text("fresh input".to_string());
        assert_eq!(session.input_text, "fresh input");
        assert!(session.places.is_empty());
        assert!(session.geocoded.is_empty());
        assert!(session.selected.is_empty());
        assert!(session.map_name.is_none());
    }

    #[test]
    fn new_extraction_keeps_text_but_drops_route() {
        let mut session = Session::default();
        session.input_text = "some story".to_string();
        session.selected.push("Rome".to_string());

        session.set_places(vec![canonical("Paris")], vec![geocoded("Paris")]);
        assert_eq!(session.input_text, "some story");
        assert_eq!(session.places.len(), 1);
        assert!(session.route.is_none());
        assert!(session.selected.is_empty());
    }

    #[test]
    fn loading_a_map_replaces_the_geocoded_list() {
        let mut session = Session::default();
        session.set_places(vec![canonical("Paris")], vec![geocoded("Paris")]);

        session.load_map("trip".to_string(), vec![geocoded("Rome"), geocoded("Oslo")]);
        assert_eq!(session.geocoded.len(), 2);
        assert!(session.places.is_empty());
        assert_eq!(session.map_name.as_deref(), Some("trip"));
    }
}
