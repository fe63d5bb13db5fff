//! Quiz error types.
//!
//! Every fallible operation in `hyakunin-core` returns [`QuizError`]. The
//! variants split into load-time failures (corpus problems), caller input
//! problems that should be re-prompted, and lifecycle violations that point
//! at a bug in the calling code.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{ChoiceField, PoemId};

/// Errors raised by the poem store, question generator and quiz session.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The corpus is malformed or incomplete.
    #[error("invalid corpus: {0}")]
    Data(String),

    /// The corpus file could not be read.
    #[error("failed to read corpus {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No poem with this id is loaded.
    #[error("poem not found: {0}")]
    NotFound(PoemId),

    /// Not enough distinct values exist to build the requested distractors.
    #[error("need {needed} distinct {field} distractors but only {available} are available")]
    InsufficientData {
        field: ChoiceField,
        needed: usize,
        available: usize,
    },

    /// The session configuration cannot be satisfied.
    #[error("invalid quiz configuration: {0}")]
    InvalidConfig(String),

    /// The operation is not allowed in the session's current state.
    #[error("cannot {operation} while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    /// The selected choice index is outside the question's choices.
    #[error("choice {index} is out of range (expected 0..{len})")]
    OutOfRange { index: usize, len: usize },
}

impl QuizError {
    /// Returns `true` for bad caller input that can simply be asked for again.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            QuizError::OutOfRange { .. } | QuizError::InvalidConfig(_)
        )
    }

    /// Returns `true` when an operation was called in the wrong lifecycle state.
    pub fn is_state_violation(&self) -> bool {
        matches!(self, QuizError::InvalidState { .. })
    }
}

/// Result alias used across the crate.
pub type Result<T, E = QuizError> = std::result::Result<T, E>;
