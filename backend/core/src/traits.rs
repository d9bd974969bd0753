use anyhow::Result;
use async_trait::async_trait;

use crate::types::PlaceCandidate;

/// Trait for place candidate extractors.
///
/// Two independent implementations feed the merge step: a pattern/gazetteer
/// extractor and an LLM-backed one. Either may legitimately return an empty
/// list; failure handling is the caller's concern.
#[async_trait]
pub trait PlaceExtractor: Send + Sync {
    /// Extractor name (e.g., "ner", "gemini").
    fn name(&self) -> &str;

    /// Extract raw place mentions from the given text.
    async fn extract(&self, text: &str) -> Result<Vec<PlaceCandidate>>;
}
