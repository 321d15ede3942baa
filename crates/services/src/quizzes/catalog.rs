use std::sync::Arc;

use storage::QuizRepository;
use study_core::model::{Difficulty, Quiz, QuizId};

use super::results::QuizResults;
use crate::error::QuizServiceError;

/// One tile of the quiz catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizCard {
    pub id: QuizId,
    pub title: String,
    pub topic: Option<String>,
    pub question_count: usize,
    pub estimated_time: String,
    pub difficulty: Difficulty,
    pub completed: bool,
    pub score_percent: Option<u32>,
}

impl QuizCard {
    fn from_quiz(quiz: &Quiz, results: &QuizResults) -> Self {
        let result = results.get(quiz.id());
        Self {
            id: quiz.id(),
            title: quiz.title().to_string(),
            topic: quiz.topic().map(str::to_string),
            question_count: quiz.question_count(),
            estimated_time: quiz.estimated_time().to_string(),
            difficulty: quiz.difficulty(),
            completed: result.is_some(),
            score_percent: result.map(|r| r.score.percentage()),
        }
    }

    #[must_use]
    pub fn action_label(&self) -> &'static str {
        if self.completed {
            "Retake Quiz"
        } else {
            "Start Quiz"
        }
    }

    /// "2 questions • 10 min"
    #[must_use]
    pub fn subtitle(&self) -> String {
        let noun = if self.question_count == 1 {
            "question"
        } else {
            "questions"
        };
        format!("{} {noun} • {}", self.question_count, self.estimated_time)
    }
}

#[derive(Clone)]
pub struct QuizCatalogService {
    quizzes: Arc<dyn QuizRepository>,
    results: QuizResults,
}

impl QuizCatalogService {
    #[must_use]
    pub fn new(quizzes: Arc<dyn QuizRepository>, results: QuizResults) -> Self {
        Self { quizzes, results }
    }

    /// Lists every quiz with its completion state.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if the catalog cannot be read.
    pub async fn list_cards(&self) -> Result<Vec<QuizCard>, QuizServiceError> {
        let quizzes = self.quizzes.list_quizzes().await?;
        Ok(quizzes
            .iter()
            .map(|quiz| QuizCard::from_quiz(quiz, &self.results))
            .collect())
    }
}
