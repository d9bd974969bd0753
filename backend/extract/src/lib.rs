pub mod gemini;
pub mod merge;
pub mod ner;
pub mod parse;

pub use gemini::GeminiExtractor;
pub use merge::merge_candidates;
pub use ner::PatternExtractor;
