use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use study_core::model::{AttemptId, QuizId};
use study_core::quiz::{QuizScore, QuizSession};

/// Latest finished attempt of a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub quiz_id: QuizId,
    pub attempt_id: AttemptId,
    pub score: QuizScore,
    pub completed_at: DateTime<Utc>,
    pub attempts: u32,
}

/// In-memory ledger of finished quizzes, shared by the quiz loop, the catalog
/// listing and the dashboard.
#[derive(Debug, Clone, Default)]
pub struct QuizResults {
    inner: Arc<Mutex<HashMap<QuizId, QuizResult>>>,
}

impl QuizResults {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a terminal session. Non-terminal sessions are ignored.
    ///
    /// Recording the same attempt twice does not bump the attempt count.
    pub fn record(&self, session: &QuizSession) -> Option<QuizResult> {
        let score = session.score()?;
        let completed_at = session.completed_at()?;
        let quiz_id = session.quiz().id();

        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let attempts = match guard.get(&quiz_id) {
            Some(prev) if prev.attempt_id == session.attempt_id() => prev.attempts,
            Some(prev) => prev.attempts.saturating_add(1),
            None => 1,
        };
        let result = QuizResult {
            quiz_id,
            attempt_id: session.attempt_id(),
            score,
            completed_at,
            attempts,
        };
        guard.insert(quiz_id, result.clone());
        Some(result)
    }

    #[must_use]
    pub fn get(&self, quiz_id: QuizId) -> Option<QuizResult> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&quiz_id)
            .cloned()
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Mean of the latest percentage per completed quiz, rounded half up.
    #[must_use]
    pub fn average_percentage(&self) -> Option<u32> {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_empty() {
            return None;
        }
        let sum: u64 = guard.values().map(|r| u64::from(r.score.percentage())).sum();
        let count = guard.len() as u64;
        u32::try_from((2 * sum + count) / (2 * count)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::{Difficulty, Question, Quiz};
    use study_core::time::fixed_now;

    fn finished(id: u64, answer: usize) -> QuizSession {
        let question =
            Question::new("What is React?", vec!["Library".into(), "Framework".into()], 0)
                .unwrap();
        let quiz = Quiz::new(QuizId::new(id), "React", Difficulty::Beginner, "", vec![question])
            .unwrap();
        let mut session = QuizSession::start(quiz, fixed_now()).unwrap();
        session.select_answer(answer).unwrap();
        session.next(fixed_now()).unwrap();
        session
    }

    #[test]
    fn unfinished_sessions_are_not_recorded() {
        let results = QuizResults::new();
        let quiz = finished(1, 0).quiz().clone();
        let session = QuizSession::start(quiz, fixed_now()).unwrap();
        assert!(results.record(&session).is_none());
        assert_eq!(results.completed_count(), 0);
        assert_eq!(results.average_percentage(), None);
    }

    #[test]
    fn retakes_replace_score_and_count_attempts() {
        let results = QuizResults::new();
        let first = finished(1, 1);
        results.record(&first).unwrap();
        results.record(&first).unwrap();
        assert_eq!(results.get(QuizId::new(1)).unwrap().attempts, 1);

        let second = results.record(&finished(1, 0)).unwrap();
        assert_eq!(second.attempts, 2);
        assert_eq!(second.score.percentage(), 100);
        assert_eq!(results.completed_count(), 1);
    }

    #[test]
    fn average_rounds_half_up() {
        let results = QuizResults::new();
        results.record(&finished(1, 0)).unwrap();
        results.record(&finished(2, 1)).unwrap();
        assert_eq!(results.average_percentage(), Some(50));
    }
}
