//! Core types for the evaluation and scheduling engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{InvalidItemError, Result};

/// Informational difficulty tag on an item. Not consumed by scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

/// A question/answer item, owned by the external item store.
///
/// The engine reads the answer and keyword fields; per-item scheduling state
/// lives in [`ReviewState`] and is updated through [`crate::Sm2`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizItem {
    /// Question text. Opaque to the engine.
    pub prompt: String,
    /// Strings that count as fully correct. Must be non-empty; the first
    /// entry is the primary answer echoed back in feedback.
    pub accepted_answers: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Parallel to `keywords`. Empty means every keyword weighs 1.0.
    #[serde(default)]
    pub keyword_weights: Vec<f64>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl QuizItem {
    pub fn new(prompt: impl Into<String>, accepted_answers: Vec<String>) -> Self {
        Self {
            prompt: prompt.into(),
            accepted_answers,
            keywords: Vec::new(),
            keyword_weights: Vec::new(),
            difficulty: Difficulty::default(),
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<String>, weights: Vec<f64>) -> Self {
        self.keywords = keywords;
        self.keyword_weights = weights;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Fail-fast integrity check for items coming from the store.
    pub fn validate(&self) -> Result<()> {
        if self.accepted_answers.is_empty() {
            return Err(InvalidItemError::NoAcceptedAnswers);
        }
        if !self.keyword_weights.is_empty() && self.keyword_weights.len() != self.keywords.len() {
            return Err(InvalidItemError::KeywordWeightMismatch {
                keywords: self.keywords.len(),
                weights: self.keyword_weights.len(),
            });
        }
        Ok(())
    }

    /// Keyword weights with the default-to-1.0 rule applied.
    pub fn effective_weights(&self) -> Vec<f64> {
        if self.keyword_weights.is_empty() {
            vec![1.0; self.keywords.len()]
        } else {
            self.keyword_weights.clone()
        }
    }

    /// Primary accepted answer shown in feedback.
    pub fn primary_answer(&self) -> &str {
        self.accepted_answers.first().map(String::as_str).unwrap_or("")
    }
}

/// Per-item scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub ease_factor: f64,
    pub interval_days: u32,
    pub repetitions: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            ease_factor: 2.5,
            interval_days: 0,
            repetitions: 0,
            due_date: None,
        }
    }
}

impl ReviewState {
    /// An item with no due date has never been scheduled and is due now.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => due <= now,
            None => true,
        }
    }
}

/// Feedback category, selected by score threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    Perfect,
    Excellent,
    Good,
    NeedsWork,
    Incorrect,
}

/// Categorical feedback attached to an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub message: String,
    /// Missing-keyword summary; empty when nothing is missing.
    pub details: String,
    pub category: FeedbackCategory,
}

/// Per-keyword coverage entry, in item keyword order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDetail {
    pub keyword: String,
    pub found: bool,
    pub weight: f64,
}

/// Outcome of grading one answer.
///
/// Produced once per submission and handed to the caller for persistence and
/// statistics; the engine keeps no state between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub score: u8,
    pub keyword_score: u8,
    pub keyword_details: Vec<KeywordDetail>,
    pub feedback: Feedback,
    /// Normalized form of what the user typed.
    pub user_answer: String,
    /// Primary accepted answer.
    pub expected_answer: String,
    /// Always `false` from the scorer; the session layer flips it for
    /// skipped items.
    #[serde(default)]
    pub skipped: bool,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn item() -> QuizItem {
        QuizItem::new(
            "What organelle produces ATP?",
            vec!["mitochondria".to_string()],
        )
    }

    #[test]
    fn validate_rejects_empty_accepted_answers() {
        let mut item = item();
        item.accepted_answers.clear();
        assert_eq!(item.validate(), Err(InvalidItemError::NoAcceptedAnswers));
    }

    #[test]
    fn validate_rejects_mismatched_weights() {
        let item = item().with_keywords(
            vec!["atp".to_string(), "energy".to_string()],
            vec![2.0],
        );
        assert_eq!(
            item.validate(),
            Err(InvalidItemError::KeywordWeightMismatch {
                keywords: 2,
                weights: 1,
            })
        );
    }

    #[test]
    fn missing_weights_default_to_one() {
        let mut item = item();
        item.keywords = vec!["atp".to_string(), "energy".to_string()];
        assert!(item.validate().is_ok());
        assert_eq!(item.effective_weights(), vec![1.0, 1.0]);
    }

    #[test]
    fn state_without_due_date_is_due() {
        let state = ReviewState::default();
        assert!(state.is_due(chrono::Utc::now()));
    }

    #[test]
    fn item_deserializes_from_store_json() {
        let item: QuizItem = serde_json::from_str(
            r#"{
                "prompt": "What organelle produces ATP?",
                "accepted_answers": ["mitochondria"],
                "keywords": ["mitochondria"],
                "difficulty": "hard"
            }"#,
        )
        .unwrap();
        assert_eq!(item.difficulty, Difficulty::Hard);
        assert!(item.keyword_weights.is_empty());
        assert_eq!(item.effective_weights(), vec![1.0]);
    }
}
