//! Weighted keyword coverage analysis.

use crate::matching::{fuzzy_match, normalize};
use crate::types::KeywordDetail;

/// Result of checking an answer for keyword coverage.
#[derive(Debug, Clone)]
pub struct KeywordAnalysis {
    /// Weighted coverage in 0-100.
    pub score: f64,
    /// One entry per keyword, in input order.
    pub details: Vec<KeywordDetail>,
}

/// Analyze which keywords appear in the answer text.
///
/// `weights` is parallel to `keywords`; callers apply the default-to-1.0
/// rule before calling (see [`crate::QuizItem::effective_weights`]).
///
/// A multi-word keyword counts only when every one of its words has a fuzzy
/// match among the answer's words. A single-word keyword is checked for
/// substring containment first, then fuzzily against each word. No keywords
/// means full credit on this axis; zero total weight means none.
pub fn analyze_keywords(
    text: &str,
    keywords: &[String],
    weights: &[f64],
    fuzzy_threshold: f64,
) -> KeywordAnalysis {
    if keywords.is_empty() {
        return KeywordAnalysis {
            score: 100.0,
            details: Vec::new(),
        };
    }

    let text_norm = normalize(text);
    let text_words: Vec<&str> = text_norm.split_whitespace().collect();

    let mut matched_weight = 0.0;
    let mut total_weight = 0.0;
    let mut details = Vec::with_capacity(keywords.len());

    for (keyword, &weight) in keywords.iter().zip(weights) {
        let found = keyword_found(keyword, &text_norm, &text_words, fuzzy_threshold);
        if found {
            matched_weight += weight;
        }
        total_weight += weight;
        details.push(KeywordDetail {
            keyword: keyword.clone(),
            found,
            weight,
        });
    }

    let score = if total_weight > 0.0 {
        matched_weight / total_weight * 100.0
    } else {
        0.0
    };

    KeywordAnalysis { score, details }
}

fn keyword_found(keyword: &str, text_norm: &str, text_words: &[&str], threshold: f64) -> bool {
    let keyword_norm = normalize(keyword);
    let parts: Vec<&str> = keyword_norm.split_whitespace().collect();

    if parts.len() > 1 {
        return parts
            .iter()
            .all(|part| text_words.iter().any(|word| fuzzy_match(part, word, threshold)));
    }

    if text_norm.contains(&keyword_norm) {
        return true;
    }
    text_words
        .iter()
        .any(|word| fuzzy_match(&keyword_norm, word, threshold))
}
