//! Gemini-backed place extractor.
//!
//! Sends the working text to the Generative Language API with a prompt that
//! asks for a JSON array of places, then runs the best-effort parse over the
//! response text. HTTP or provider failures bubble up; the session layer
//! degrades them to an empty extraction with a user-visible warning.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use storymap_core::{PlaceCandidate, PlaceExtractor, StorymapError};

use crate::parse;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const EXTRACTION_PROMPT: &str = "\
Extract all geographical locations from the following text. Return ONLY a JSON array of objects.
Each object should have:
- \"name\": the full place name as mentioned in the text
- \"type\": the type of location (country, city, landmark, etc.)
- \"sentiment\": \"positive\", \"negative\", or \"neutral\" based on how the location is described

Return valid JSON only, no other text. If no locations are found, return an empty array: []

Text to analyze:
";

/// LLM extractor backed by the Gemini generateContent endpoint.
pub struct GeminiExtractor {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiExtractor {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(model = %self.model, "Sending extraction request to Gemini");

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("Gemini HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(StorymapError::provider(
                "gemini",
                format!("{status}: {error_body}"),
            )
            .into());
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        Ok(generated
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default())
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<Part>,
}

#[async_trait]
impl PlaceExtractor for GeminiExtractor {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn extract(&self, text: &str) -> Result<Vec<PlaceCandidate>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let raw = self
            .generate(format!("{EXTRACTION_PROMPT}{text}"))
            .await?;
        Ok(parse::extract_place_array(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_candidate_parts_from_provider_json() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "[{\"name\": "},
                        {"text": "\"Lisbon\"}]"}
                    ]
                }
            }]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed
            .candidates
            .unwrap()
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
            .unwrap();
        assert_eq!(parse::extract_place_array(&text)[0].name, "Lisbon");
    }

    #[test]
    fn blocked_response_without_candidates_parses() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(parsed.candidates.is_none());
    }

    #[tokio::test]
    async fn empty_text_short_circuits_without_a_request() {
        let extractor = GeminiExtractor::new("k").with_base_url("http://gemini.invalid");
        let out = extractor.extract("   ").await.unwrap();
        assert!(out.is_empty());
    }
}
