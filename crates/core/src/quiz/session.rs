use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::score::QuizScore;
use super::view::{OptionView, QuizSessionView};
use crate::model::{AttemptId, Question, Quiz, option_label};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Rejected session operations. All leave the session unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("quiz has no questions")]
    InvalidQuiz,

    #[error("option {index} is out of range for {option_count} options")]
    InvalidOptionIndex { index: usize, option_count: usize },

    #[error("question {question} must be answered before advancing")]
    PrematureAdvance { question: usize },

    #[error("no question in that direction")]
    OutOfRange,

    #[error("quiz session already completed")]
    Completed,

    #[error("no quiz session in progress")]
    NotStarted,
}

/// Outcome of a successful `next()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    Advanced { index: usize },
    Completed(QuizScore),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Run-time state of one taker progressing through one quiz.
///
/// Answers are a sparse map from question index to selected option; the score is
/// always graded from that map, never tracked alongside it.
#[derive(Debug, Clone)]
pub struct QuizSession {
    attempt_id: AttemptId,
    quiz: Quiz,
    current: usize,
    answers: BTreeMap<usize, usize>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Starts a session at the first question with no answers.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::InvalidQuiz` if the quiz has no questions.
    pub fn start(quiz: Quiz, started_at: DateTime<Utc>) -> Result<Self, QuizSessionError> {
        if quiz.questions().is_empty() {
            return Err(QuizSessionError::InvalidQuiz);
        }

        Ok(Self {
            attempt_id: AttemptId::generate(),
            quiz,
            current: 0,
            answers: BTreeMap::new(),
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        // `current` is bounded by the question count, which `start` proved non-zero.
        &self.quiz.questions()[self.current]
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.quiz.question_count()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.question_count()
    }

    /// Option selected for the visible question, if any.
    #[must_use]
    pub fn selected_answer(&self) -> Option<usize> {
        self.answers.get(&self.current).copied()
    }

    #[must_use]
    pub fn answer_for(&self, question: usize) -> Option<usize> {
        self.answers.get(&question).copied()
    }

    #[must_use]
    pub fn answers(&self) -> &BTreeMap<usize, usize> {
        &self.answers
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Records `option` for the current question, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Completed` once results are shown.
    /// Returns `QuizSessionError::InvalidOptionIndex` if `option` is out of bounds.
    pub fn select_answer(&mut self, option: usize) -> Result<(), QuizSessionError> {
        if self.is_terminal() {
            return Err(QuizSessionError::Completed);
        }
        let option_count = self.current_question().option_count();
        if option >= option_count {
            return Err(QuizSessionError::InvalidOptionIndex {
                index: option,
                option_count,
            });
        }
        self.answers.insert(self.current, option);
        Ok(())
    }

    /// Moves to the next question, or finishes the quiz from the last one.
    ///
    /// Finishing marks the session terminal at `now` and grades it in the same step.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::PrematureAdvance` if the current question is unanswered.
    /// Returns `QuizSessionError::OutOfRange` if the session is already terminal.
    pub fn next(&mut self, now: DateTime<Utc>) -> Result<QuizStep, QuizSessionError> {
        if self.is_terminal() {
            return Err(QuizSessionError::OutOfRange);
        }
        if self.selected_answer().is_none() {
            return Err(QuizSessionError::PrematureAdvance {
                question: self.current,
            });
        }

        if self.is_last() {
            // Every earlier index was answered to get here; check anyway so the
            // terminal state can never be reached with gaps.
            if let Some(question) = self.first_unanswered() {
                return Err(QuizSessionError::PrematureAdvance { question });
            }
            self.completed_at = Some(now);
            return Ok(QuizStep::Completed(self.compute_score()));
        }

        self.current += 1;
        Ok(QuizStep::Advanced {
            index: self.current,
        })
    }

    /// Moves back one question, keeping every recorded answer.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::OutOfRange` at the first question.
    /// Returns `QuizSessionError::Completed` once results are shown.
    pub fn previous(&mut self) -> Result<usize, QuizSessionError> {
        if self.is_terminal() {
            return Err(QuizSessionError::Completed);
        }
        if self.current == 0 {
            return Err(QuizSessionError::OutOfRange);
        }
        self.current -= 1;
        Ok(self.current)
    }

    /// Grades the current answer map. Pure; safe to call at any time.
    #[must_use]
    pub fn compute_score(&self) -> QuizScore {
        QuizScore::grade(&self.quiz, &self.answers)
    }

    /// Final score, available once the session is terminal.
    #[must_use]
    pub fn score(&self) -> Option<QuizScore> {
        self.is_terminal().then(|| self.compute_score())
    }

    fn first_unanswered(&self) -> Option<usize> {
        (0..self.question_count()).find(|index| !self.answers.contains_key(index))
    }

    /// Snapshot for the presentation layer.
    #[must_use]
    pub fn view(&self) -> QuizSessionView {
        let question = self.current_question();
        let selected = self.selected_answer();
        let total = self.question_count();
        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(index, text)| OptionView {
                index,
                label: option_label(index),
                text: text.clone(),
                selected: selected == Some(index),
            })
            .collect();

        QuizSessionView {
            attempt_id: self.attempt_id,
            quiz_id: self.quiz.id(),
            title: self.quiz.title().to_string(),
            index: self.current,
            total,
            prompt: question.prompt().to_string(),
            options,
            selected,
            can_go_back: !self.is_terminal() && self.current > 0,
            can_advance: !self.is_terminal() && selected.is_some(),
            is_last: self.is_last(),
            is_terminal: self.is_terminal(),
            score: self.score(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
