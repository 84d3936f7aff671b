//! Text normalization and similarity primitives for answer grading.

use std::collections::HashSet;

/// Default threshold for [`fuzzy_match`] when callers have no tuned value.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;

/// Canonicalize free text for comparison.
///
/// Lowercases, replaces punctuation with spaces, collapses whitespace runs
/// and trims the ends. Every comparison in the engine runs on normalized
/// text, so matching is case and punctuation insensitive.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Calculate Levenshtein distance between two strings, over code points.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Use two rows instead of full matrix for memory efficiency
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                0
            } else {
                1
            };

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Calculate Levenshtein similarity (0.0 to 1.0).
///
/// Both strings empty counts as identical.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}

/// Whether a single word matches a target loosely enough to count.
///
/// True on case-insensitive equality, when one string contains the other, or
/// when the Levenshtein similarity reaches `threshold`.
pub fn fuzzy_match(word: &str, target: &str, threshold: f64) -> bool {
    let word = word.to_lowercase();
    let target = target.to_lowercase();

    if word == target {
        return true;
    }
    if word.contains(&target) || target.contains(&word) {
        return true;
    }

    normalized_similarity(&word, &target) >= threshold
}

/// Jaccard similarity of the two strings' normalized word sets, scaled to
/// 0-100. Two empty sets count as identical; one empty set as disjoint.
pub fn word_overlap_similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();

    if words_a.is_empty() && words_b.is_empty() {
        return 100.0;
    }
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    intersection as f64 / union as f64 * 100.0
}
