//! SM-2 spaced repetition algorithm.
//!
//! Standard SuperMemo 2 recurrence, driven by the 0-100 evaluation score
//! instead of a button rating. The score maps onto the classic 0-5 quality
//! scale; quality 3 and above counts as a successful recall.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::types::ReviewState;

/// SM-2 scheduler with configurable ease bounds.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
        }
    }
}

impl Sm2 {
    /// State for an item that has never been reviewed.
    pub fn initial_state(&self) -> ReviewState {
        ReviewState {
            ease_factor: self.initial_ease,
            interval_days: 0,
            repetitions: 0,
            due_date: None,
        }
    }

    /// Map a 0-100 evaluation score onto the 0-5 quality scale.
    pub fn quality_from_score(score: u8) -> u8 {
        let score = score.min(100);
        ((f64::from(score) / 100.0) * 5.0).round() as u8
    }

    /// Compute the next review state from the score of the answer just given.
    ///
    /// Pure value transformation; the caller persists the returned state.
    /// The new due date is `interval` days after `now`.
    pub fn schedule(&self, score: u8, state: &ReviewState, now: DateTime<Utc>) -> ReviewState {
        let quality = Self::quality_from_score(score);

        let interval = Self::next_interval(state, quality);
        let repetitions = if quality >= 3 { state.repetitions + 1 } else { 0 };

        // The interval product above uses the incoming ease factor; the
        // updated factor only affects the next pass.
        let penalty = f64::from(5 - quality);
        let ease_factor = (state.ease_factor + 0.1 - penalty * (0.08 + penalty * 0.02))
            .max(self.minimum_ease);

        let due_date = now + Duration::days(i64::from(interval));

        debug!(quality, interval, repetitions, ease_factor, "scheduled next review");

        ReviewState {
            ease_factor,
            interval_days: interval,
            repetitions,
            due_date: Some(due_date),
        }
    }

    /// The interval each quality rating 0-5 would produce from `state`.
    /// Lets callers show "next review in ..." hints before an answer is in.
    pub fn preview_intervals(&self, state: &ReviewState) -> [u32; 6] {
        std::array::from_fn(|quality| Self::next_interval(state, quality as u8))
    }

    fn next_interval(state: &ReviewState, quality: u8) -> u32 {
        if quality >= 3 {
            match state.repetitions {
                0 => 1,
                1 => 6,
                _ => (f64::from(state.interval_days) * state.ease_factor).round() as u32,
            }
        } else {
            1
        }
    }
}
