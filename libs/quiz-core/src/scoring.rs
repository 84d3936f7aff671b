//! Multi-strategy answer scoring and feedback generation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::Rng;
use tracing::debug;

use crate::error::Result;
use crate::keywords::analyze_keywords;
use crate::matching::{normalize, normalized_similarity, word_overlap_similarity};
use crate::types::{EvaluationResult, Feedback, FeedbackCategory, KeywordDetail, QuizItem};

const PERFECT_MESSAGES: &[&str] = &[
    "Perfect answer!",
    "Exactly right!",
    "Spot on!",
];

const EXCELLENT_MESSAGES: &[&str] = &[
    "Excellent! Nearly word for word.",
    "Great answer, you clearly know this one.",
    "Very close to the model answer.",
];

const GOOD_MESSAGES: &[&str] = &[
    "Good answer, most of the important points are there.",
    "Solid answer with room to tighten up.",
    "You got the gist of it.",
];

const NEEDS_WORK_MESSAGES: &[&str] = &[
    "Partially right, but some key points are missing.",
    "You are on the right track. Review this one again.",
    "About halfway there.",
];

const INCORRECT_MESSAGES: &[&str] = &[
    "Not quite. Have another look at the answer.",
    "That one needs more review.",
    "Keep practicing, this one has not stuck yet.",
];

fn templates(category: FeedbackCategory) -> &'static [&'static str] {
    match category {
        FeedbackCategory::Perfect => PERFECT_MESSAGES,
        FeedbackCategory::Excellent => EXCELLENT_MESSAGES,
        FeedbackCategory::Good => GOOD_MESSAGES,
        FeedbackCategory::NeedsWork => NEEDS_WORK_MESSAGES,
        FeedbackCategory::Incorrect => INCORRECT_MESSAGES,
    }
}

/// Weight of each signal in the combined score. Must sum to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub keyword: f64,
    pub overlap: f64,
    pub edit: f64,
    pub phrase: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            keyword: 0.45,
            overlap: 0.25,
            edit: 0.15,
            phrase: 0.15,
        }
    }
}

/// Multi-strategy scorer.
///
/// The defaults carry empirically calibrated values; change them only as a
/// deliberate product decision.
#[derive(Debug, Clone)]
pub struct Scorer {
    pub weights: ScoreWeights,
    /// Fuzzy threshold used when matching keyword words against answer words.
    pub keyword_fuzzy_threshold: f64,
}

impl Default for Scorer {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            keyword_fuzzy_threshold: 0.75,
        }
    }
}

impl Scorer {
    /// Grade a free-text answer against an item.
    ///
    /// Fully deterministic: the feedback phrasing is chosen by a stable hash
    /// of the answer text, so repeated calls return identical results. Use
    /// [`Scorer::evaluate_with_rng`] to vary phrasing instead.
    pub fn evaluate(&self, user_answer: &str, item: &QuizItem) -> Result<EvaluationResult> {
        let mut pick = |count: usize| stable_index(user_answer, count);
        self.evaluate_inner(user_answer, item, &mut pick)
    }

    /// Grade an answer, picking the feedback phrasing with `rng`.
    ///
    /// Only the message text varies; score, keyword details and category are
    /// the same as [`Scorer::evaluate`] would produce.
    pub fn evaluate_with_rng<R: Rng>(
        &self,
        user_answer: &str,
        item: &QuizItem,
        rng: &mut R,
    ) -> Result<EvaluationResult> {
        let mut pick = |count: usize| rng.gen_range(0..count);
        self.evaluate_inner(user_answer, item, &mut pick)
    }

    fn evaluate_inner(
        &self,
        user_answer: &str,
        item: &QuizItem,
        pick: &mut dyn FnMut(usize) -> usize,
    ) -> Result<EvaluationResult> {
        item.validate()?;

        let answer_norm = normalize(user_answer);
        let weights = item.effective_weights();
        let expected = item.primary_answer().to_string();

        // Any accepted answer matching verbatim ends the evaluation early.
        if item
            .accepted_answers
            .iter()
            .any(|accepted| normalize(accepted) == answer_norm)
        {
            let details = item
                .keywords
                .iter()
                .zip(&weights)
                .map(|(keyword, &weight)| KeywordDetail {
                    keyword: keyword.clone(),
                    found: true,
                    weight,
                })
                .collect();
            let feedback = build_feedback(FeedbackCategory::Perfect, 100, &[], pick);
            debug!(score = 100u8, "exact match");
            return Ok(EvaluationResult {
                score: 100,
                keyword_score: 100,
                keyword_details: details,
                feedback,
                user_answer: answer_norm,
                expected_answer: expected,
                skipped: false,
            });
        }

        let keyword_result = analyze_keywords(
            &answer_norm,
            &item.keywords,
            &weights,
            self.keyword_fuzzy_threshold,
        );

        let best_overlap = item
            .accepted_answers
            .iter()
            .map(|accepted| word_overlap_similarity(&answer_norm, accepted))
            .fold(0.0, f64::max);

        let best_edit = item
            .accepted_answers
            .iter()
            .map(|accepted| normalized_similarity(&answer_norm, &normalize(accepted)) * 100.0)
            .fold(0.0, f64::max);

        let phrase_bonus = item
            .accepted_answers
            .iter()
            .map(|accepted| phrase_hit_ratio(&answer_norm, accepted) * 100.0)
            .fold(0.0, f64::max);

        let combined = keyword_result.score * self.weights.keyword
            + best_overlap * self.weights.overlap
            + best_edit * self.weights.edit
            + phrase_bonus * self.weights.phrase;
        let score = combined.round().clamp(0.0, 100.0) as u8;

        let missing: Vec<&str> = keyword_result
            .details
            .iter()
            .filter(|detail| !detail.found)
            .map(|detail| detail.keyword.as_str())
            .collect();
        let category = category_for(score);
        let feedback = build_feedback(category, score, &missing, pick);

        debug!(
            score,
            keyword = keyword_result.score,
            overlap = best_overlap,
            edit = best_edit,
            phrase = phrase_bonus,
            "scored answer"
        );

        Ok(EvaluationResult {
            score,
            keyword_score: keyword_result.score.round().clamp(0.0, 100.0) as u8,
            keyword_details: keyword_result.details,
            feedback,
            user_answer: answer_norm,
            expected_answer: expected,
            skipped: false,
        })
    }
}

fn category_for(score: u8) -> FeedbackCategory {
    match score {
        100 => FeedbackCategory::Perfect,
        90..=99 => FeedbackCategory::Excellent,
        70..=89 => FeedbackCategory::Good,
        50..=69 => FeedbackCategory::NeedsWork,
        _ => FeedbackCategory::Incorrect,
    }
}

fn build_feedback(
    category: FeedbackCategory,
    score: u8,
    missing: &[&str],
    pick: &mut dyn FnMut(usize) -> usize,
) -> Feedback {
    let options = templates(category);
    let message = options[pick(options.len())].to_string();

    let details = if score < 100 && !missing.is_empty() {
        if missing.len() > 3 {
            format!(
                "{} keywords missing, including {}",
                missing.len(),
                missing[..3].join(", ")
            )
        } else {
            format!("Missing keywords: {}", missing.join(", "))
        }
    } else {
        String::new()
    };

    Feedback {
        message,
        details,
        category,
    }
}

/// Fraction of an accepted answer's two-word phrases present in the answer.
///
/// Phrases are built from the accepted answer's words longer than two
/// characters, so short filler words do not dilute the signal.
fn phrase_hit_ratio(answer_norm: &str, accepted: &str) -> f64 {
    let accepted_norm = normalize(accepted);
    let words: Vec<&str> = accepted_norm
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .collect();
    if words.len() < 2 {
        return 0.0;
    }

    let phrases: Vec<String> = words.windows(2).map(|pair| pair.join(" ")).collect();
    let hits = phrases
        .iter()
        .filter(|phrase| answer_norm.contains(phrase.as_str()))
        .count();
    hits as f64 / phrases.len() as f64
}

/// Stable template index derived from the answer text.
fn stable_index(text: &str, count: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    (hasher.finish() as usize) % count.max(1)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::error::InvalidItemError;

    fn cell_item() -> QuizItem {
        QuizItem::new(
            "What is the function of the mitochondria?",
            vec!["mitochondria is the powerhouse of the cell".to_string()],
        )
        .with_keywords(
            vec!["mitochondria".to_string(), "powerhouse".to_string()],
            vec![1.0, 1.0],
        )
    }

    #[test]
    fn exact_match_scores_perfect() {
        let item = QuizItem::new("Q", vec!["the mitochondria".to_string()]);
        let result = Scorer::default().evaluate("The Mitochondria", &item).unwrap();

        assert_eq!(result.score, 100);
        assert_eq!(result.keyword_score, 100);
        assert_eq!(result.feedback.category, FeedbackCategory::Perfect);
        assert_eq!(result.user_answer, "the mitochondria");
        assert_eq!(result.expected_answer, "the mitochondria");
    }

    #[test]
    fn exact_match_against_any_accepted_answer() {
        let item = QuizItem::new(
            "Q",
            vec!["deoxyribonucleic acid".to_string(), "dna".to_string()],
        );
        let result = Scorer::default().evaluate("DNA", &item).unwrap();

        assert_eq!(result.score, 100);
        // feedback still echoes the primary answer
        assert_eq!(result.expected_answer, "deoxyribonucleic acid");
    }

    #[test]
    fn exact_match_marks_every_keyword_found() {
        let item = cell_item();
        let result = Scorer::default()
            .evaluate("mitochondria is the powerhouse of the cell", &item)
            .unwrap();

        assert_eq!(result.keyword_details.len(), 2);
        assert!(result.keyword_details.iter().all(|d| d.found));
        assert!(result.feedback.details.is_empty());
    }

    #[test]
    fn partial_answer_scores_between_bounds() {
        let item = cell_item();
        let result = Scorer::default()
            .evaluate("the mitochondria is the powerhouse", &item)
            .unwrap();

        assert_eq!(result.keyword_score, 100);
        assert!(result.keyword_details.iter().all(|d| d.found));
        assert!(result.score >= 70, "score was {}", result.score);
        assert!(result.score < 100);
    }

    #[test]
    fn unrelated_answer_is_incorrect() {
        let item = cell_item();
        let result = Scorer::default().evaluate("ribosomes build proteins", &item).unwrap();

        assert!(result.score < 50, "score was {}", result.score);
        assert_eq!(result.feedback.category, FeedbackCategory::Incorrect);
        assert_eq!(
            result.feedback.details,
            "Missing keywords: mitochondria, powerhouse"
        );
    }

    #[test]
    fn empty_answer_is_scored_not_privileged() {
        let item = cell_item();
        let result = Scorer::default().evaluate("   ", &item).unwrap();

        assert_eq!(result.user_answer, "");
        assert_eq!(result.score, 0);
        assert_eq!(result.feedback.category, FeedbackCategory::Incorrect);
    }

    #[test]
    fn more_than_three_missing_keywords_are_summarized() {
        let item = QuizItem::new("Q", vec!["krebs cycle".to_string()]).with_keywords(
            vec![
                "citrate".to_string(),
                "isocitrate".to_string(),
                "ketoglutarate".to_string(),
                "succinate".to_string(),
                "fumarate".to_string(),
            ],
            vec![1.0; 5],
        );
        let result = Scorer::default().evaluate("no idea", &item).unwrap();

        assert_eq!(
            result.feedback.details,
            "5 keywords missing, including citrate, isocitrate, ketoglutarate"
        );
    }

    #[test]
    fn repeated_evaluation_is_deterministic() {
        let item = cell_item();
        let scorer = Scorer::default();
        let first = scorer.evaluate("the powerhouse of the cell", &item).unwrap();
        let second = scorer.evaluate("the powerhouse of the cell", &item).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn seeded_rng_pins_the_message_choice() {
        let item = cell_item();
        let scorer = Scorer::default();

        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let a = scorer
            .evaluate_with_rng("the powerhouse of the cell", &item, &mut rng_a)
            .unwrap();
        let b = scorer
            .evaluate_with_rng("the powerhouse of the cell", &item, &mut rng_b)
            .unwrap();

        assert_eq!(a, b);
        // numeric outputs match the deterministic entry point
        let det = scorer.evaluate("the powerhouse of the cell", &item).unwrap();
        assert_eq!(a.score, det.score);
        assert_eq!(a.keyword_score, det.keyword_score);
        assert_eq!(a.keyword_details, det.keyword_details);
        assert_eq!(a.feedback.category, det.feedback.category);
    }

    #[test]
    fn item_without_accepted_answers_fails_fast() {
        let item = QuizItem::new("Q", vec![]);
        let err = Scorer::default().evaluate("answer", &item).unwrap_err();
        assert_eq!(err, InvalidItemError::NoAcceptedAnswers);
    }

    #[test]
    fn mismatched_weights_fail_fast() {
        let item = QuizItem::new("Q", vec!["a".to_string()])
            .with_keywords(vec!["a".to_string(), "b".to_string()], vec![1.0]);
        let err = Scorer::default().evaluate("a", &item).unwrap_err();
        assert!(matches!(err, InvalidItemError::KeywordWeightMismatch { .. }));
    }

    #[test]
    fn phrase_ratio_counts_long_word_pairs() {
        // filtered words: ["mitochondria", "the", "powerhouse", "the", "cell"]
        // phrases hit: "the powerhouse" only
        let ratio = phrase_hit_ratio(
            "the mitochondria is the powerhouse",
            "mitochondria is the powerhouse of the cell",
        );
        assert!((ratio - 0.25).abs() < 1e-9);

        assert_eq!(phrase_hit_ratio("anything", "one"), 0.0);
    }

    #[test]
    fn category_thresholds() {
        assert_eq!(category_for(100), FeedbackCategory::Perfect);
        assert_eq!(category_for(99), FeedbackCategory::Excellent);
        assert_eq!(category_for(90), FeedbackCategory::Excellent);
        assert_eq!(category_for(89), FeedbackCategory::Good);
        assert_eq!(category_for(70), FeedbackCategory::Good);
        assert_eq!(category_for(69), FeedbackCategory::NeedsWork);
        assert_eq!(category_for(50), FeedbackCategory::NeedsWork);
        assert_eq!(category_for(49), FeedbackCategory::Incorrect);
        assert_eq!(category_for(0), FeedbackCategory::Incorrect);
    }
}
