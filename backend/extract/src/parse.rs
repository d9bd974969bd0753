//! Best-effort parsing of generative-model responses that are supposed to
//! contain a JSON array of places.
//!
//! Models wrap output in code fences or chat filler often enough that a
//! strict parse alone loses real results. Strategy: strip fences, try a
//! direct parse, then hunt for the first balanced `[...]` substring. Anything
//! unrecoverable degrades to an empty list, never an error.

use tracing::warn;

use storymap_core::PlaceCandidate;

/// Pull a place candidate array out of a raw model response.
pub fn extract_place_array(raw: &str) -> Vec<PlaceCandidate> {
    let cleaned = strip_code_fences(raw);

    if let Ok(places) = serde_json::from_str::<Vec<PlaceCandidate>>(cleaned.trim()) {
        return places;
    }
    if let Some(array) = find_embedded_array(&cleaned) {
        if let Ok(places) = serde_json::from_str::<Vec<PlaceCandidate>>(array) {
            return places;
        }
    }

    warn!(
        chars = raw.len(),
        "Model response contained no parsable place array"
    );
    Vec::new()
}

/// Unwrap the first ```json (or bare ```) fenced block, if any.
fn strip_code_fences(raw: &str) -> String {
    if let Some(rest) = raw.split("```json").nth(1) {
        rest.split("```").next().unwrap_or("").trim().to_string()
    } else if let Some(inner) = raw.split("```").nth(1) {
        inner.trim().to_string()
    } else {
        raw.trim().to_string()
    }
}

/// Locate the first balanced top-level JSON array, string-aware so brackets
/// inside quoted values don't confuse the depth count.
fn find_embedded_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in text.as_bytes().iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use storymap_core::Sentiment;

    #[test]
    fn parses_plain_array() {
        let places =
            extract_place_array(r#"[{"name": "Paris", "type": "city", "sentiment": "positive"}]"#);
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Paris");
        assert_eq!(places[0].sentiment, Some(Sentiment::Positive));
    }

    #[test]
    fn parses_json_fenced_array() {
        let raw = "Here you go:\n```json\n[{\"name\": \"Rome\"}]\n```\nDone.";
        let places = extract_place_array(raw);
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Rome");
    }

    #[test]
    fn parses_bare_fenced_array() {
        let raw = "```\n[{\"name\": \"Kyoto\"}]\n```";
        assert_eq!(extract_place_array(raw)[0].name, "Kyoto");
    }

    #[test]
    fn finds_array_embedded_in_chatter() {
        let raw = "Sure! The locations are: [{\"name\": \"Oslo [city]\"}] hope that helps";
        let places = extract_place_array(raw);
        assert_eq!(places.len(), 1);
        // Brackets inside the quoted name must not break the scan.
        assert_eq!(places[0].name, "Oslo [city]");
    }

    #[test]
    fn garbage_degrades_to_empty() {
        assert!(extract_place_array("no places here, sorry").is_empty());
        assert!(extract_place_array("[{ truncated").is_empty());
        assert!(extract_place_array("").is_empty());
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(extract_place_array("[]").is_empty());
    }
}
