//! hyakunin-core: poem store, question generation and quiz sessions for the
//! Hyakunin Isshu anthology.
//!
//! The crate loads the 100-poem corpus, builds four-choice questions from it
//! and drives a quiz session through its `NotStarted -> InProgress ->
//! Completed` lifecycle. It has no presentation code; the `hyakunin` CLI is
//! one front end built on top of it.

pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod report;
pub mod session;
pub mod statistics;
pub mod store;
pub mod traits;

#[cfg(test)]
mod testing;

pub use error::{QuizError, Result};
pub use model::{
    AnswerOutcome, AnswerRecord, ChoiceField, Poem, PoemId, Question, QuestionType, CHOICE_COUNT,
};
pub use session::{OrderMode, QuestionTypeMode, QuizSession, SessionConfig, SessionState};
pub use statistics::{Grade, SessionSummary};
pub use store::PoemStore;
pub use traits::PoemCatalog;
