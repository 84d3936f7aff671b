//! Error types for quiz-core.

use thiserror::Error;

/// Result type alias using InvalidItemError.
pub type Result<T> = std::result::Result<T, InvalidItemError>;

/// Data-integrity violations in an item supplied by the store.
///
/// User-input edge cases (empty answers, zero total weight, empty keyword
/// lists) never produce an error; these variants indicate a bug in the
/// collaborator that built the item, not bad user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidItemError {
    #[error("item has no accepted answers")]
    NoAcceptedAnswers,

    #[error("{keywords} keywords but {weights} keyword weights")]
    KeywordWeightMismatch { keywords: usize, weights: usize },
}
