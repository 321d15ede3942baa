use chrono::{DateTime, Utc};

use super::score::QuizScore;
use super::session::{QuizSession, QuizSessionError, QuizStep};
use super::view::QuizSessionView;
use crate::model::Quiz;

/// Holder for at most one active quiz session.
///
/// `reset` returns the engine to the pre-start state; `start` on a busy engine
/// replaces the running session (retake).
#[derive(Debug, Clone, Default)]
pub struct QuizEngine {
    session: Option<QuizSession>,
}

impl QuizEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `QuizSessionError::InvalidQuiz` if the quiz has no questions; any
    /// running session is kept in that case.
    pub fn start(
        &mut self,
        quiz: Quiz,
        started_at: DateTime<Utc>,
    ) -> Result<&QuizSession, QuizSessionError> {
        let session = QuizSession::start(quiz, started_at)?;
        Ok(self.session.insert(session))
    }

    pub fn reset(&mut self) {
        self.session = None;
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// # Errors
    ///
    /// Returns `QuizSessionError::NotStarted` without a session, otherwise see
    /// [`QuizSession::select_answer`].
    pub fn select_answer(&mut self, option: usize) -> Result<(), QuizSessionError> {
        self.active_mut()?.select_answer(option)
    }

    /// # Errors
    ///
    /// Returns `QuizSessionError::NotStarted` without a session, otherwise see
    /// [`QuizSession::next`].
    pub fn next(&mut self, now: DateTime<Utc>) -> Result<QuizStep, QuizSessionError> {
        self.active_mut()?.next(now)
    }

    /// # Errors
    ///
    /// Returns `QuizSessionError::NotStarted` without a session, otherwise see
    /// [`QuizSession::previous`].
    pub fn previous(&mut self) -> Result<usize, QuizSessionError> {
        self.active_mut()?.previous()
    }

    /// # Errors
    ///
    /// Returns `QuizSessionError::NotStarted` without a session.
    pub fn compute_score(&self) -> Result<QuizScore, QuizSessionError> {
        self.session
            .as_ref()
            .map(QuizSession::compute_score)
            .ok_or(QuizSessionError::NotStarted)
    }

    #[must_use]
    pub fn view(&self) -> Option<QuizSessionView> {
        self.session.as_ref().map(QuizSession::view)
    }

    fn active_mut(&mut self) -> Result<&mut QuizSession, QuizSessionError> {
        self.session.as_mut().ok_or(QuizSessionError::NotStarted)
    }
}
