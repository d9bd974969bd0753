//! Merge/dedup of the two extractor candidate lists.
//!
//! The single canonical list is keyed by trimmed, lower-cased name. Insertion
//! order is first-seen order across the pattern list then the LLM list.
//! Punctuation differences are NOT normalized: "Paris" and "Paris." stay
//! distinct entries.

use std::collections::HashMap;

use storymap_core::{CanonicalPlace, PlaceCandidate, Sentiment};

/// Merge candidates from the pattern extractor and the LLM extractor into one
/// deduplicated, order-preserving canonical list.
///
/// Pattern candidates carry no sentiment judgment and enter as neutral. LLM
/// candidates contribute sentiment: a non-neutral LLM sentiment overwrites
/// whatever is stored, so when the LLM mentions the same place repeatedly the
/// last non-neutral sentiment wins. Mention counts accumulate across both
/// lists. Pure function, no I/O, no error conditions.
pub fn merge_candidates(
    pattern: &[PlaceCandidate],
    llm: &[PlaceCandidate],
) -> Vec<CanonicalPlace> {
    let mut merged: Vec<CanonicalPlace> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for candidate in pattern {
        let name = candidate.name.trim();
        if name.is_empty() {
            continue;
        }
        match index.get(&name.to_lowercase()) {
            Some(&i) => merged[i].mentions += 1,
            None => {
                index.insert(name.to_lowercase(), merged.len());
                merged.push(CanonicalPlace {
                    name: name.to_string(),
                    kind: candidate
                        .kind
                        .clone()
                        .unwrap_or_else(|| "Unknown".to_string()),
                    sentiment: Sentiment::Neutral,
                    mentions: 1,
                });
            }
        }
    }

    for candidate in llm {
        let name = candidate.name.trim();
        if name.is_empty() {
            continue;
        }
        match index.get(&name.to_lowercase()) {
            Some(&i) => {
                merged[i].mentions += 1;
                if let Some(sentiment) = candidate.sentiment {
                    if sentiment != Sentiment::Neutral {
                        merged[i].sentiment = sentiment;
                    }
                }
            }
            None => {
                index.insert(name.to_lowercase(), merged.len());
                merged.push(CanonicalPlace {
                    name: name.to_string(),
                    kind: candidate
                        .kind
                        .clone()
                        .unwrap_or_else(|| "Unknown".to_string()),
                    sentiment: candidate.sentiment.unwrap_or_default(),
                    mentions: 1,
                });
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(name: &str) -> PlaceCandidate {
        PlaceCandidate::named(name)
    }

    fn cand_sentiment(name: &str, sentiment: Sentiment) -> PlaceCandidate {
        PlaceCandidate {
            sentiment: Some(sentiment),
            ..PlaceCandidate::named(name)
        }
    }

    #[test]
    fn empty_inputs_yield_empty_output() {
        assert!(merge_candidates(&[], &[]).is_empty());
    }

    #[test]
    fn disjoint_lists_concatenate_with_single_mentions() {
        let a = vec![cand("Paris"), cand("Rome")];
        let b = vec![cand("Berlin")];
        let merged = merge_candidates(&a, &b);
        assert_eq!(merged.len(), 3);
        assert!(merged.iter().all(|p| p.mentions == 1));
    }

    #[test]
    fn cross_list_duplicate_counts_two_mentions() {
        let a = vec![cand("Rome")];
        let b = vec![cand("rome")];
        let merged = merge_candidates(&a, &b);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].mentions, 2);
        // The first-seen spelling is kept.
        assert_eq!(merged[0].name, "Rome");
    }

    #[test]
    fn first_occurrence_order_is_preserved() {
        let a = vec![cand("Paris"), cand("Rome")];
        let b = vec![cand("Rome"), cand("Berlin")];
        let names: Vec<_> = merge_candidates(&a, &b)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Paris", "Rome", "Berlin"]);
    }

    #[test]
    fn llm_non_neutral_sentiment_overwrites() {
        let a = vec![cand("Rome")];
        let b = vec![cand_sentiment("Rome", Sentiment::Negative)];
        let merged = merge_candidates(&a, &b);
        assert_eq!(merged[0].sentiment, Sentiment::Negative);
    }

    #[test]
    fn llm_neutral_sentiment_does_not_overwrite() {
        let a = vec![cand("Rome")];
        let b = vec![cand_sentiment("Rome", Sentiment::Neutral)];
        let merged = merge_candidates(&a, &b);
        assert_eq!(merged[0].sentiment, Sentiment::Neutral);
    }

    #[test]
    fn last_non_neutral_llm_sentiment_wins() {
        let b = vec![
            cand_sentiment("Rome", Sentiment::Positive),
            cand_sentiment("Rome", Sentiment::Negative),
            cand_sentiment("Rome", Sentiment::Neutral),
        ];
        let merged = merge_candidates(&[], &b);
        assert_eq!(merged[0].mentions, 3);
        assert_eq!(merged[0].sentiment, Sentiment::Negative);
    }

    #[test]
    fn punctuation_differences_stay_distinct() {
        let a = vec![cand("Paris"), cand("Paris.")];
        let merged = merge_candidates(&a, &[]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn kind_defaults_to_unknown() {
        let merged = merge_candidates(&[cand("Paris")], &[]);
        assert_eq!(merged[0].kind, "Unknown");
    }

    #[test]
    fn pattern_candidates_enter_neutral_even_with_sentiment_set() {
        // Only the LLM list contributes sentiment judgments.
        let a = vec![cand_sentiment("Rome", Sentiment::Positive)];
        let merged = merge_candidates(&a, &[]);
        assert_eq!(merged[0].sentiment, Sentiment::Neutral);
    }
}
