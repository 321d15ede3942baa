use std::sync::Arc;

use storage::QuizRepository;
use study_core::model::QuizId;
use study_core::quiz::{QuizEngine, QuizScore, QuizSessionError, QuizSessionView, QuizStep};

use super::results::QuizResults;
use crate::Clock;
use crate::error::QuizServiceError;
use crate::notify::{Notification, Notifier};

/// Result of advancing a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAdvance {
    pub view: QuizSessionView,
    pub completed: Option<QuizScore>,
}

/// Orchestrates quiz start, completion notification and result bookkeeping.
///
/// The engine itself stays with the caller; answer selection and moving back
/// are plain engine calls and need no collaborators.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    notifier: Arc<dyn Notifier>,
    results: QuizResults,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizRepository>,
        notifier: Arc<dyn Notifier>,
        results: QuizResults,
    ) -> Self {
        Self {
            clock,
            quizzes,
            notifier,
            results,
        }
    }

    #[must_use]
    pub fn results(&self) -> &QuizResults {
        &self.results
    }

    /// Loads `quiz_id` from the catalog and starts it on `engine`.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if the quiz cannot be loaded and
    /// `QuizServiceError::Session` if it has no questions.
    pub async fn start(
        &self,
        engine: &mut QuizEngine,
        quiz_id: QuizId,
    ) -> Result<QuizSessionView, QuizServiceError> {
        let quiz = self.quizzes.get_quiz(quiz_id).await?;
        let session = engine.start(quiz, self.clock.now())?;
        tracing::info!(
            quiz_id = %quiz_id,
            attempt = %session.attempt_id(),
            questions = session.question_count(),
            "quiz started"
        );
        Ok(session.view())
    }

    /// Starts the running (or finished) quiz again from the first question.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::NotStarted` if the engine has no session.
    pub fn retake(&self, engine: &mut QuizEngine) -> Result<QuizSessionView, QuizServiceError> {
        let quiz = engine
            .session()
            .map(|s| s.quiz().clone())
            .ok_or(QuizSessionError::NotStarted)?;
        let session = engine.start(quiz, self.clock.now())?;
        tracing::info!(
            quiz_id = %session.quiz().id(),
            attempt = %session.attempt_id(),
            "quiz retaken"
        );
        Ok(session.view())
    }

    /// Moves to the next question, finishing the quiz from the last one.
    ///
    /// On completion the score is recorded and one `QuizCompleted` notification
    /// is sent.
    ///
    /// # Errors
    ///
    /// Propagates engine rejections (`PrematureAdvance`, `OutOfRange`, `NotStarted`).
    pub fn advance(&self, engine: &mut QuizEngine) -> Result<QuizAdvance, QuizServiceError> {
        let step = engine.next(self.clock.now()).inspect_err(|err| {
            tracing::debug!(error = %err, "advance rejected");
        })?;
        let session = engine.session().ok_or(QuizSessionError::NotStarted)?;

        let completed = match step {
            QuizStep::Advanced { index } => {
                tracing::debug!(quiz_id = %session.quiz().id(), index, "advanced");
                None
            }
            QuizStep::Completed(score) => {
                let quiz = session.quiz();
                self.results.record(session);
                tracing::info!(
                    quiz_id = %quiz.id(),
                    attempt = %session.attempt_id(),
                    correct = score.correct(),
                    total = score.total(),
                    percentage = score.percentage(),
                    "quiz completed"
                );
                self.notifier.notify(Notification::QuizCompleted {
                    quiz_id: quiz.id(),
                    title: quiz.title().to_string(),
                    score,
                });
                Some(score)
            }
        };

        Ok(QuizAdvance {
            view: session.view(),
            completed,
        })
    }

    /// Leaves the quiz, discarding the session.
    pub fn exit(&self, engine: &mut QuizEngine) {
        if let Some(session) = engine.session() {
            tracing::debug!(
                quiz_id = %session.quiz().id(),
                answered = session.answered_count(),
                terminal = session.is_terminal(),
                "quiz exited"
            );
        }
        engine.reset();
    }
}
