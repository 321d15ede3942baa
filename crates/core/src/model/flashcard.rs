use thiserror::Error;

use crate::model::ids::FlashcardId;
use crate::model::quiz::Difficulty;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlashcardError {
    #[error("flashcard question cannot be empty")]
    EmptyQuestion,

    #[error("flashcard answer cannot be empty")]
    EmptyAnswer,
}

/// A question/answer pair reviewed by flipping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    id: FlashcardId,
    question: String,
    answer: String,
    topic: String,
    difficulty: Difficulty,
}

impl Flashcard {
    /// # Errors
    ///
    /// Returns `FlashcardError` if the question or answer is blank.
    pub fn new(
        id: FlashcardId,
        question: impl Into<String>,
        answer: impl Into<String>,
        topic: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, FlashcardError> {
        let question = question.into();
        let answer = answer.into();
        if question.trim().is_empty() {
            return Err(FlashcardError::EmptyQuestion);
        }
        if answer.trim().is_empty() {
            return Err(FlashcardError::EmptyAnswer);
        }
        Ok(Self {
            id,
            question,
            answer,
            topic: topic.into(),
            difficulty,
        })
    }

    #[must_use]
    pub fn id(&self) -> FlashcardId {
        self.id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_sides_are_rejected() {
        let err = Flashcard::new(FlashcardId::new(1), " ", "A", "React", Difficulty::Beginner)
            .unwrap_err();
        assert_eq!(err, FlashcardError::EmptyQuestion);

        let err = Flashcard::new(FlashcardId::new(1), "Q", "", "React", Difficulty::Beginner)
            .unwrap_err();
        assert_eq!(err, FlashcardError::EmptyAnswer);
    }
}
