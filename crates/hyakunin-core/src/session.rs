//! The quiz session state machine.
//!
//! A session walks an ordered list of poem ids, generating one question per
//! position on demand, recording answers and reporting accuracy. It moves
//! `NotStarted -> InProgress -> Completed`; operations called in the wrong
//! state fail with [`QuizError::InvalidState`] and leave the session as it
//! was.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{QuizError, Result};
use crate::generator;
use crate::model::{AnswerOutcome, AnswerRecord, PoemId, Question, QuestionType, CHOICE_COUNT};
use crate::statistics::{self, SessionSummary};
use crate::traits::PoemCatalog;

/// Order in which poems are visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderMode {
    /// Ascending poem id.
    #[default]
    Sequential,
    /// A uniformly random permutation.
    Random,
}

impl fmt::Display for OrderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderMode::Sequential => write!(f, "sequential"),
            OrderMode::Random => write!(f, "random"),
        }
    }
}

impl std::str::FromStr for OrderMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" | "seq" => Ok(OrderMode::Sequential),
            "random" | "shuffle" => Ok(OrderMode::Random),
            other => Err(format!("unknown order mode: {other}")),
        }
    }
}

/// How the question type is chosen for each position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionTypeMode {
    /// Every question has this type.
    Fixed(QuestionType),
    /// Each question draws one of the four types uniformly.
    Random,
    /// Each question draws uniformly from the listed types.
    Mixed(Vec<QuestionType>),
}

impl Default for QuestionTypeMode {
    fn default() -> Self {
        QuestionTypeMode::Fixed(QuestionType::LowerVerse)
    }
}

/// Settings consumed by [`QuizSession::start`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub order_mode: OrderMode,
    #[serde(default)]
    pub question_type_mode: QuestionTypeMode,
    /// Number of poems to quiz; the whole corpus when `None`.
    #[serde(default)]
    pub subset_size: Option<usize>,
}

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::NotStarted => write!(f, "not started"),
            SessionState::InProgress => write!(f, "in progress"),
            SessionState::Completed => write!(f, "completed"),
        }
    }
}

/// One player's pass over a set of poems.
///
/// The session owns its RNG; pass a seeded generator through
/// [`QuizSession::with_rng`] or [`QuizSession::seeded`] for reproducible
/// ordering and questions.
pub struct QuizSession<R = StdRng> {
    id: Uuid,
    catalog: Arc<dyn PoemCatalog>,
    rng: R,
    state: SessionState,
    config: Option<SessionConfig>,
    sequence: Vec<PoemId>,
    index: usize,
    current: Option<Question>,
    history: Vec<AnswerRecord>,
}

impl<R> fmt::Debug for QuizSession<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("config", &self.config)
            .field("index", &self.index)
            .field("len", &self.sequence.len())
            .field("answered", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl QuizSession<StdRng> {
    /// A session seeded from the operating system.
    pub fn new(catalog: Arc<dyn PoemCatalog>) -> Self {
        Self::with_rng(catalog, StdRng::from_os_rng())
    }

    /// A session whose ordering and questions are fixed by `seed`.
    pub fn seeded(catalog: Arc<dyn PoemCatalog>, seed: u64) -> Self {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> QuizSession<R> {
    pub fn with_rng(catalog: Arc<dyn PoemCatalog>, rng: R) -> Self {
        Self {
            id: Uuid::new_v4(),
            catalog,
            rng,
            state: SessionState::NotStarted,
            config: None,
            sequence: Vec::new(),
            index: 0,
            current: None,
            history: Vec::new(),
        }
    }

    /// Begin a new pass, discarding any previous progress.
    ///
    /// The configuration is validated before anything changes, so a rejected
    /// config leaves the session exactly as it was.
    pub fn start(&mut self, config: SessionConfig) -> Result<()> {
        let corpus_size = self.catalog.count();
        let size = config.subset_size.unwrap_or(corpus_size);
        if size == 0 {
            return Err(QuizError::InvalidConfig(
                "subset size must be at least 1".into(),
            ));
        }
        if size > corpus_size {
            return Err(QuizError::InvalidConfig(format!(
                "subset size {size} exceeds the corpus size {corpus_size}"
            )));
        }
        if let QuestionTypeMode::Mixed(types) = &config.question_type_mode {
            if types.is_empty() {
                return Err(QuizError::InvalidConfig(
                    "at least one question type must be selected".into(),
                ));
            }
        }

        let mut ids: Vec<PoemId> = self.catalog.all().iter().map(|p| p.id).collect();
        if config.order_mode == OrderMode::Random {
            ids.shuffle(&mut self.rng);
        }
        ids.truncate(size);

        self.id = Uuid::new_v4();
        self.sequence = ids;
        self.index = 0;
        self.current = None;
        self.history.clear();
        self.state = SessionState::InProgress;

        tracing::info!(
            session = %self.id,
            order = %config.order_mode,
            questions = size,
            "quiz session started"
        );
        self.config = Some(config);
        Ok(())
    }

    /// Start again with the configuration of the last `start`.
    pub fn restart(&mut self) -> Result<()> {
        let config = self.config.clone().ok_or_else(|| self.state_error("restart"))?;
        self.start(config)
    }

    /// Drop all progress and configuration.
    pub fn reset(&mut self) {
        self.state = SessionState::NotStarted;
        self.config = None;
        self.sequence.clear();
        self.index = 0;
        self.current = None;
        self.history.clear();
    }

    /// The question for the current position.
    ///
    /// Generated on first access and cached, so repeated calls return the
    /// same choices in the same order.
    pub fn current_question(&mut self) -> Result<&Question> {
        self.require_in_progress("get the current question")?;

        let question = match self.current.take() {
            Some(question) => question,
            None => self.build_question()?,
        };
        Ok(&*self.current.insert(question))
    }

    /// Record the player's choice for the current question.
    ///
    /// Submitting again before [`advance`](Self::advance) replaces the earlier
    /// answer rather than adding a second record.
    pub fn submit_answer(&mut self, choice_index: usize) -> Result<AnswerOutcome> {
        self.require_in_progress("submit an answer")?;
        if choice_index >= CHOICE_COUNT {
            return Err(QuizError::OutOfRange {
                index: choice_index,
                len: CHOICE_COUNT,
            });
        }

        let question = self.current_question()?.clone();
        let description = self.catalog.get(question.poem_id)?.description.clone();
        let correct = question.is_correct(choice_index);

        let outcome = AnswerOutcome {
            poem_id: question.poem_id,
            correct,
            correct_index: question.correct_index,
            correct_text: question.correct_answer().to_string(),
            selected_text: question.choices[choice_index].clone(),
            description,
        };

        let record = AnswerRecord {
            position: self.index,
            question,
            selected_index: choice_index,
            correct,
            answered_at: Utc::now(),
        };

        match self.history.last_mut() {
            Some(last) if last.position == self.index => {
                tracing::debug!(position = self.index, "answer replaced");
                *last = record;
            }
            _ => self.history.push(record),
        }

        tracing::debug!(
            session = %self.id,
            position = self.index,
            poem_id = outcome.poem_id,
            correct,
            "answer submitted"
        );
        Ok(outcome)
    }

    /// Move to the next position; completes the session after the last one.
    pub fn advance(&mut self) -> Result<()> {
        self.require_in_progress("advance")?;
        if !self.is_answered() {
            return Err(self.state_error("advance past an unanswered question"));
        }

        self.index += 1;
        self.current = None;

        if self.index >= self.sequence.len() {
            self.state = SessionState::Completed;
            tracing::info!(
                session = %self.id,
                correct = self.correct_count(),
                total = self.history.len(),
                "quiz session completed"
            );
        }
        Ok(())
    }

    /// Fraction of answered questions that were correct; 0.0 before any answer.
    pub fn accuracy(&self) -> f64 {
        statistics::accuracy(self.correct_count(), self.history.len())
    }

    /// Partial results while in progress, final results once completed.
    pub fn summary(&self) -> Result<SessionSummary> {
        if self.state == SessionState::NotStarted {
            return Err(self.state_error("summarize"));
        }
        Ok(SessionSummary::from_history(
            &self.history,
            self.sequence.len(),
        ))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    /// Poem ids in the order they are asked.
    pub fn sequence(&self) -> &[PoemId] {
        &self.sequence
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Number of questions in the session.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    /// Whether the current position already has an answer.
    pub fn is_answered(&self) -> bool {
        self.state == SessionState::InProgress
            && self
                .history
                .last()
                .is_some_and(|r| r.position == self.index)
    }

    /// Progress in the form "3/10".
    pub fn progress(&self) -> String {
        let shown = (self.index + 1).min(self.sequence.len());
        format!("{shown}/{}", self.sequence.len())
    }

    /// Score line in the form "スコア: 3/5 (60.0%)".
    pub fn score_text(&self) -> String {
        SessionSummary::from_history(&self.history, self.sequence.len()).score_text()
    }

    fn correct_count(&self) -> usize {
        self.history.iter().filter(|r| r.correct).count()
    }

    fn build_question(&mut self) -> Result<Question> {
        let poem_id = self.sequence[self.index];
        let catalog = Arc::clone(&self.catalog);
        let poem = catalog.get(poem_id)?;
        let question_type = self.next_question_type();

        let mut question = generator::generate(poem, question_type, catalog.as_ref(), &mut self.rng)?;
        question.number = Some(self.index + 1);
        Ok(question)
    }

    fn next_question_type(&mut self) -> QuestionType {
        let mode = self
            .config
            .as_ref()
            .map(|c| c.question_type_mode.clone())
            .unwrap_or_default();

        match mode {
            QuestionTypeMode::Fixed(question_type) => question_type,
            QuestionTypeMode::Random => QuestionType::ALL
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(QuestionType::LowerVerse),
            QuestionTypeMode::Mixed(types) => types
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(QuestionType::LowerVerse),
        }
    }

    fn require_in_progress(&self, operation: &'static str) -> Result<()> {
        if self.state == SessionState::InProgress {
            Ok(())
        } else {
            Err(self.state_error(operation))
        }
    }

    fn state_error(&self, operation: &'static str) -> QuizError {
        QuizError::InvalidState {
            operation,
            state: self.state.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::normalize_choice;
    use crate::store::PoemStore;
    use crate::testing::shared_store;
    use std::collections::HashSet;

    fn bundled() -> Arc<dyn PoemCatalog> {
        Arc::new(PoemStore::bundled().unwrap())
    }

    fn config(order_mode: OrderMode, mode: QuestionTypeMode, size: Option<usize>) -> SessionConfig {
        SessionConfig {
            order_mode,
            question_type_mode: mode,
            subset_size: size,
        }
    }

    fn wrong_choice(question: &Question) -> usize {
        (question.correct_index + 1) % CHOICE_COUNT
    }

    #[test]
    fn sequential_author_scenario() {
        let catalog = bundled();
        let first = catalog.get(1).unwrap().clone();
        let mut session = QuizSession::seeded(Arc::clone(&catalog), 1);
        session
            .start(config(
                OrderMode::Sequential,
                QuestionTypeMode::Fixed(QuestionType::Author),
                Some(5),
            ))
            .unwrap();
        assert_eq!(session.sequence(), &[1, 2, 3, 4, 5]);

        let question = session.current_question().unwrap().clone();
        assert_eq!(question.prompt, first.full_text());
        assert_eq!(question.correct_answer(), first.author);
        assert_eq!(question.number, Some(1));

        let outcome = session.submit_answer(question.correct_index).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.correct_text, first.author);
        assert_eq!(outcome.description, first.description);
        session.advance().unwrap();
        assert_eq!(session.current_index(), 1);

        for _ in 1..5 {
            let index = session.current_question().unwrap().correct_index;
            session.submit_answer(index).unwrap();
            session.advance().unwrap();
        }

        assert_eq!(session.state(), SessionState::Completed);
        let summary = session.summary().unwrap();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.correct, 5);
        assert!((summary.accuracy - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fresh_session_summary_is_empty() {
        for order in [OrderMode::Sequential, OrderMode::Random] {
            let mut session = QuizSession::seeded(bundled(), 3);
            session
                .start(config(order, QuestionTypeMode::Random, Some(10)))
                .unwrap();
            let summary = session.summary().unwrap();
            assert_eq!(summary.total, 0);
            assert_eq!(summary.correct, 0);
            assert_eq!(summary.accuracy, 0.0);
            assert_eq!(session.accuracy(), 0.0);
        }
    }

    #[test]
    fn sequential_order_is_ascending() {
        let mut session = QuizSession::seeded(bundled(), 0);
        session.start(SessionConfig::default()).unwrap();
        assert_eq!(session.len(), 100);
        assert!(session.sequence().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn random_order_is_a_permutation() {
        let mut session = QuizSession::seeded(bundled(), 12345);
        session
            .start(config(OrderMode::Random, QuestionTypeMode::default(), None))
            .unwrap();

        let mut ids = session.sequence().to_vec();
        assert_ne!(ids, (1..=100).collect::<Vec<_>>());
        ids.sort_unstable();
        assert_eq!(ids, (1..=100).collect::<Vec<_>>());
    }

    #[test]
    fn random_subset_has_no_repeats() {
        let mut session = QuizSession::seeded(bundled(), 9);
        session
            .start(config(OrderMode::Random, QuestionTypeMode::default(), Some(20)))
            .unwrap();
        let unique: HashSet<PoemId> = session.sequence().iter().copied().collect();
        assert_eq!(session.len(), 20);
        assert_eq!(unique.len(), 20);
    }

    #[test]
    fn same_seed_same_session() {
        let cfg = config(OrderMode::Random, QuestionTypeMode::Random, Some(10));
        let mut a = QuizSession::seeded(bundled(), 77);
        let mut b = QuizSession::seeded(bundled(), 77);
        a.start(cfg.clone()).unwrap();
        b.start(cfg).unwrap();

        assert_eq!(a.sequence(), b.sequence());
        assert_eq!(a.current_question().unwrap(), b.current_question().unwrap());
    }

    #[test]
    fn invalid_subset_sizes_are_rejected_without_mutation() {
        let mut session = QuizSession::seeded(shared_store(10), 4);
        session
            .start(config(OrderMode::Sequential, QuestionTypeMode::default(), Some(3)))
            .unwrap();
        let question = session.current_question().unwrap().clone();
        session.submit_answer(0).unwrap();

        for bad in [Some(0), Some(11)] {
            let err = session
                .start(config(OrderMode::Random, QuestionTypeMode::default(), bad))
                .unwrap_err();
            assert!(matches!(err, QuizError::InvalidConfig(_)));
        }
        let err = session
            .start(config(OrderMode::Random, QuestionTypeMode::Mixed(vec![]), None))
            .unwrap_err();
        assert!(err.is_input_error());

        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.sequence(), &[1, 2, 3]);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.current_question().unwrap(), &question);
        assert_eq!(session.config().unwrap().subset_size, Some(3));
    }

    #[test]
    fn current_question_is_cached() {
        let mut session = QuizSession::seeded(bundled(), 5);
        session
            .start(config(OrderMode::Random, QuestionTypeMode::Random, Some(3)))
            .unwrap();
        let first = session.current_question().unwrap().clone();
        for _ in 0..5 {
            assert_eq!(session.current_question().unwrap(), &first);
        }
        session.submit_answer(0).unwrap();
        assert_eq!(session.current_question().unwrap(), &first);
    }

    #[test]
    fn resubmitting_overwrites_the_record() {
        let mut session = QuizSession::seeded(bundled(), 6);
        session
            .start(config(OrderMode::Sequential, QuestionTypeMode::default(), Some(2)))
            .unwrap();
        let question = session.current_question().unwrap().clone();

        let first = session.submit_answer(question.correct_index).unwrap();
        assert!(first.correct);
        let second = session.submit_answer(wrong_choice(&question)).unwrap();
        assert!(!second.correct);

        assert_eq!(session.history().len(), 1);
        let record = &session.history()[0];
        assert_eq!(record.position, 0);
        assert_eq!(record.selected_index, wrong_choice(&question));
        assert!(!record.correct);
        assert_eq!(session.summary().unwrap().correct, 0);
    }

    #[test]
    fn out_of_range_choice_keeps_history_intact() {
        let mut session = QuizSession::seeded(bundled(), 6);
        session
            .start(config(OrderMode::Sequential, QuestionTypeMode::default(), Some(2)))
            .unwrap();

        let err = session.submit_answer(4).unwrap_err();
        assert!(matches!(err, QuizError::OutOfRange { index: 4, len: 4 }));
        assert!(session.history().is_empty());
        assert!(!session.is_answered());

        session.submit_answer(3).unwrap();
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn advance_requires_an_answer() {
        let mut session = QuizSession::seeded(bundled(), 8);
        session
            .start(config(OrderMode::Sequential, QuestionTypeMode::default(), Some(2)))
            .unwrap();
        session.current_question().unwrap();

        let err = session.advance().unwrap_err();
        assert!(err.is_state_violation());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn completed_session_rejects_further_calls() {
        let mut session = QuizSession::seeded(shared_store(8), 2);
        session
            .start(config(OrderMode::Random, QuestionTypeMode::Random, Some(4)))
            .unwrap();

        for _ in 0..4 {
            session.submit_answer(1).unwrap();
            session.advance().unwrap();
        }
        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.progress(), "4/4");

        assert!(session.advance().unwrap_err().is_state_violation());
        assert!(session.current_question().unwrap_err().is_state_violation());
        assert!(session.submit_answer(0).unwrap_err().is_state_violation());
        assert_eq!(session.summary().unwrap().total, 4);
    }

    #[test]
    fn operations_before_start_are_state_violations() {
        let mut session = QuizSession::seeded(bundled(), 0);
        assert_eq!(session.state(), SessionState::NotStarted);
        assert!(session.current_question().unwrap_err().is_state_violation());
        assert!(session.submit_answer(0).unwrap_err().is_state_violation());
        assert!(session.advance().unwrap_err().is_state_violation());
        assert!(session.summary().unwrap_err().is_state_violation());
        assert!(session.restart().unwrap_err().is_state_violation());
    }

    #[test]
    fn accuracy_three_of_five() {
        let mut session = QuizSession::seeded(bundled(), 21);
        session
            .start(config(OrderMode::Random, QuestionTypeMode::Random, Some(5)))
            .unwrap();

        for position in 0..5 {
            let question = session.current_question().unwrap().clone();
            let choice = if position < 3 {
                question.correct_index
            } else {
                wrong_choice(&question)
            };
            session.submit_answer(choice).unwrap();
            session.advance().unwrap();
        }

        assert!((session.accuracy() - 0.6).abs() < f64::EPSILON);
        let summary = session.summary().unwrap();
        assert_eq!(summary.correct, 3);
        assert_eq!(summary.incorrect, 2);
        assert_eq!(summary.breakdown.len(), 5);
        assert_eq!(session.score_text(), "スコア: 3/5 (60.0%)");
    }

    #[test]
    fn mixed_mode_only_uses_listed_types() {
        let allowed = vec![QuestionType::Author, QuestionType::UpperVerse];
        let mut session = QuizSession::seeded(bundled(), 31);
        session
            .start(config(
                OrderMode::Random,
                QuestionTypeMode::Mixed(allowed.clone()),
                Some(30),
            ))
            .unwrap();

        let mut seen = HashSet::new();
        while session.state() == SessionState::InProgress {
            let question = session.current_question().unwrap().clone();
            assert!(allowed.contains(&question.question_type));
            let unique: HashSet<String> =
                question.choices.iter().map(|c| normalize_choice(c)).collect();
            assert_eq!(unique.len(), CHOICE_COUNT);
            seen.insert(question.question_type);
            session.submit_answer(question.correct_index).unwrap();
            session.advance().unwrap();
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn restart_and_reset() {
        let mut session = QuizSession::seeded(shared_store(6), 10);
        session
            .start(config(OrderMode::Sequential, QuestionTypeMode::default(), Some(2)))
            .unwrap();
        let first_id = session.id();
        session.submit_answer(0).unwrap();
        session.advance().unwrap();

        session.restart().unwrap();
        assert_ne!(session.id(), first_id);
        assert_eq!(session.current_index(), 0);
        assert!(session.history().is_empty());
        assert_eq!(session.progress(), "1/2");

        session.reset();
        assert_eq!(session.state(), SessionState::NotStarted);
        assert!(session.config().is_none());
        assert!(session.is_empty());
    }

    #[test]
    fn one_store_serves_many_sessions() {
        let catalog = bundled();
        let mut sessions: Vec<QuizSession> = (0..3)
            .map(|seed| QuizSession::seeded(Arc::clone(&catalog), seed))
            .collect();
        for session in &mut sessions {
            session
                .start(config(OrderMode::Random, QuestionTypeMode::Random, Some(3)))
                .unwrap();
            session.submit_answer(0).unwrap();
        }
        assert!(sessions.iter().all(|s| s.history().len() == 1));
        assert_eq!(Arc::strong_count(&catalog), 4);
    }
}
