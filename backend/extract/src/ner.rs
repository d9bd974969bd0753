//! Pattern/gazetteer place extractor: NER-lite for geographic mentions.
//!
//! Capitalized phrases are matched first, then classified against country and
//! city gazetteers (longest suffix wins, so "Beautiful Paris" still yields
//! "Paris") or by geographic cue words ("Mount Fuji", "British Museum").
//! Unclassifiable phrases are dropped; precision over recall.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use storymap_core::{PlaceCandidate, PlaceExtractor};

/// Capitalized word runs, allowing lowercase connectors ("Rio de Janeiro",
/// "Stratford upon Avon").
static PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[A-Z][A-Za-z'.\-]*(?:\s+(?:of|the|de|del|des|du|da|la|le|van|von|upon|al|el)\s+[A-Z][A-Za-z'.\-]*|\s+[A-Z][A-Za-z'.\-]*)*",
    )
    .unwrap()
});

static COUNTRIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "afghanistan", "argentina", "australia", "austria", "belgium", "brazil", "bulgaria",
        "cambodia", "canada", "chile", "china", "colombia", "croatia", "cuba", "czech republic",
        "denmark", "egypt", "england", "ethiopia", "finland", "france", "germany", "greece",
        "hungary", "iceland", "india", "indonesia", "iran", "iraq", "ireland", "israel", "italy",
        "japan", "jordan", "kenya", "laos", "malaysia", "mexico", "mongolia", "morocco",
        "myanmar", "nepal", "netherlands", "new zealand", "nigeria", "norway", "pakistan",
        "peru", "philippines", "poland", "portugal", "romania", "russia", "scotland", "serbia",
        "singapore", "slovakia", "slovenia", "south africa", "south korea", "spain", "sri lanka",
        "sweden", "switzerland", "syria", "taiwan", "thailand", "tunisia", "turkey", "ukraine",
        "united kingdom", "united states", "uruguay", "venezuela", "vietnam", "wales",
    ]
    .into_iter()
    .collect()
});

static CITIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "amsterdam", "athens", "auckland", "bangkok", "barcelona", "beijing", "belgrade",
        "berlin", "bogota", "boston", "bruges", "brussels", "budapest", "buenos aires", "cairo",
        "cape town", "chicago", "copenhagen", "delhi", "doha", "dubai", "dublin", "edinburgh",
        "florence", "frankfurt", "geneva", "glasgow", "hanoi", "havana", "helsinki", "hong kong",
        "istanbul", "jakarta", "jerusalem", "johannesburg", "kyoto", "lima", "lisbon", "london",
        "los angeles", "madrid", "manila", "marrakech", "melbourne", "mexico city", "miami",
        "milan", "montreal", "moscow", "mumbai", "munich", "nairobi", "naples", "new orleans",
        "new york", "new york city", "nice", "osaka", "oslo", "paris", "porto", "prague",
        "quito", "reykjavik", "rio de janeiro", "rome", "san francisco", "santiago", "sarajevo",
        "seattle", "seoul", "seville", "shanghai", "stockholm", "sydney", "taipei", "tokyo",
        "toronto", "valencia", "vancouver", "venice", "vienna", "warsaw", "washington", "zurich",
    ]
    .into_iter()
    .collect()
});

/// Generic geographic nouns that mark a multiword phrase as a landmark.
static PLACE_CUES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "airport", "avenue", "basilica", "bay", "beach", "boulevard", "bridge", "canyon",
        "castle", "cathedral", "coast", "desert", "falls", "fjord", "garden", "gardens",
        "glacier", "gallery", "harbor", "harbour", "island", "islands", "lake", "library",
        "mosque", "mount", "mountain", "mountains", "museum", "opera", "palace", "park",
        "peninsula", "plaza", "river", "sea", "shrine", "square", "stadium", "station",
        "street", "temple", "tower", "valley",
    ]
    .into_iter()
    .collect()
});

/// Extract place candidates from free text. Pure and infallible; empty or
/// place-free text yields an empty list.
pub fn extract_places(text: &str) -> Vec<PlaceCandidate> {
    let mut out = Vec::new();
    for m in PHRASE_RE.find_iter(text) {
        // The phrase class admits '.' for abbreviations ("St. Louis"), which
        // also drags in sentence-final periods; drop those before classifying.
        let phrase = m.as_str().trim_end_matches('.');
        if let Some((rel_start, name, kind)) = classify(phrase) {
            out.push(PlaceCandidate {
                name: name.to_string(),
                kind: Some(kind.to_string()),
                sentiment: None,
                start: Some(m.start() + rel_start),
                end: Some(m.start() + rel_start + name.len()),
            });
        }
    }
    out
}

/// Decide whether a capitalized phrase names a place, and which span of it.
/// Returns (byte offset within the phrase, trimmed name, type).
fn classify(phrase: &str) -> Option<(usize, &str, &'static str)> {
    // Longest-suffix gazetteer match: scanning word starts left to right
    // tries the whole phrase first, then progressively shorter tails.
    for start in word_starts(phrase) {
        let suffix = &phrase[start..];
        let lower = suffix.to_lowercase();
        if COUNTRIES.contains(lower.as_str()) {
            return Some((start, suffix, "Country"));
        }
        if CITIES.contains(lower.as_str()) {
            return Some((start, suffix, "City"));
        }
    }

    // Cue-based landmarks: "Mount Fuji", "British Museum", "Charles Bridge".
    let offset = if phrase.starts_with("The ") { 4 } else { 0 };
    let name = &phrase[offset..];
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() >= 2
        && words
            .iter()
            .any(|w| PLACE_CUES.contains(normalize_word(w).as_str()))
    {
        return Some((offset, name, "Landmark"));
    }

    None
}

/// Byte offsets of word beginnings within a phrase.
fn word_starts(phrase: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut prev_was_space = true;
    for (i, ch) in phrase.char_indices() {
        if ch.is_whitespace() {
            prev_was_space = true;
        } else {
            if prev_was_space {
                starts.push(i);
            }
            prev_was_space = false;
        }
    }
    starts
}

fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// The pattern-based extractor half of the pipeline.
#[derive(Debug, Default, Clone)]
pub struct PatternExtractor;

#[async_trait]
impl PlaceExtractor for PatternExtractor {
    fn name(&self) -> &str {
        "ner"
    }

    async fn extract(&self, text: &str) -> Result<Vec<PlaceCandidate>> {
        Ok(extract_places(text))
    }
}
