//! Answer evaluation and spaced-repetition scheduling engine for study decks.
//!
//! Provides:
//! - Text normalization and similarity primitives (Levenshtein distance,
//!   fuzzy word matching, word-set overlap)
//! - Weighted keyword coverage analysis
//! - Multi-strategy scoring of free-text answers with categorical feedback
//! - SM-2 review scheduling driven by the evaluation score
//!
//! Every entry point is a pure function over its inputs. The caller owns
//! sequencing and persistence: evaluate an answer with [`Scorer::evaluate`],
//! then feed the resulting score and the item's current [`ReviewState`] into
//! [`Sm2::schedule`] and store what comes back.

pub mod algorithm;
pub mod error;
pub mod keywords;
pub mod matching;
pub mod scoring;
pub mod types;

pub use algorithm::Sm2;
pub use error::{InvalidItemError, Result};
pub use keywords::{analyze_keywords, KeywordAnalysis};
pub use matching::{
    fuzzy_match, levenshtein_distance, normalize, normalized_similarity, word_overlap_similarity,
    DEFAULT_FUZZY_THRESHOLD,
};
pub use scoring::{ScoreWeights, Scorer};
pub use types::{
    Difficulty, EvaluationResult, Feedback, FeedbackCategory, KeywordDetail, QuizItem, ReviewState,
};
