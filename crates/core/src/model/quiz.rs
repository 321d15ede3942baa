use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuizId;

/// Upper bound on options per question; every option gets a letter label A-Z.
pub const MAX_OPTIONS: usize = 26;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question needs at least 2 options, got {count}")]
    TooFewOptions { count: usize },

    #[error("question has {count} options, at most 26 are supported")]
    TooManyOptions { count: usize },

    #[error("option {index} cannot be empty")]
    EmptyOption { index: usize },

    #[error("correct answer {index} is out of range for {option_count} options")]
    CorrectAnswerOutOfRange { index: usize, option_count: usize },

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty label shared by quizzes and flashcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(QuizError::UnknownDifficulty(s.to_string())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct_answer: usize,
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the prompt or an option is blank, the option count is
    /// outside `2..=MAX_OPTIONS`, or `correct_answer` does not index an option.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, QuizError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuizError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuizError::TooFewOptions {
                count: options.len(),
            });
        }
        if options.len() > MAX_OPTIONS {
            return Err(QuizError::TooManyOptions {
                count: options.len(),
            });
        }
        if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuizError::EmptyOption { index });
        }
        if correct_answer >= options.len() {
            return Err(QuizError::CorrectAnswerOutOfRange {
                index: correct_answer,
                option_count: options.len(),
            });
        }

        Ok(Self {
            prompt,
            options,
            correct_answer,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer
    }
}

/// Letter shown next to an option: 0 -> 'A', 1 -> 'B', ...
#[must_use]
pub fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| usize::from(*i) < MAX_OPTIONS)
        .map_or('?', |i| char::from(b'A' + i))
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// An ordered set of questions with a title and difficulty label.
///
/// The question list may be empty here; starting a session on such a quiz is
/// what fails, so catalogs can still list quizzes whose questions are pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    difficulty: Difficulty,
    estimated_time: String,
    topic: Option<String>,
    questions: Vec<Question>,
}

impl Quiz {
    /// # Errors
    ///
    /// Returns `QuizError::EmptyTitle` if the title is blank.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        difficulty: Difficulty,
        estimated_time: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        Ok(Self {
            id,
            title,
            difficulty,
            estimated_time: estimated_time.into(),
            topic: None,
            questions,
        })
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        let topic = topic.into();
        self.topic = (!topic.trim().is_empty()).then_some(topic);
        self
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn estimated_time(&self) -> &str {
        &self.estimated_time
    }

    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn question_rejects_out_of_range_answer() {
        let err = Question::new("What is React?", opts(&["Library", "Framework"]), 2).unwrap_err();
        assert_eq!(
            err,
            QuizError::CorrectAnswerOutOfRange {
                index: 2,
                option_count: 2
            }
        );
    }

    #[test]
    fn question_needs_two_options() {
        let err = Question::new("Q", opts(&["only"]), 0).unwrap_err();
        assert_eq!(err, QuizError::TooFewOptions { count: 1 });
    }

    #[test]
    fn question_rejects_blank_prompt_and_option() {
        assert_eq!(
            Question::new("  ", opts(&["a", "b"]), 0).unwrap_err(),
            QuizError::EmptyPrompt
        );
        assert_eq!(
            Question::new("Q", opts(&["a", " "]), 0).unwrap_err(),
            QuizError::EmptyOption { index: 1 }
        );
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("beginner".parse::<Difficulty>().unwrap(), Difficulty::Beginner);
        assert_eq!(" Advanced".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
        assert!(matches!(
            "expert".parse::<Difficulty>(),
            Err(QuizError::UnknownDifficulty(_))
        ));
        assert_eq!(Difficulty::Intermediate.to_string(), "Intermediate");
    }

    #[test]
    fn option_labels_are_letters() {
        assert_eq!(option_label(0), 'A');
        assert_eq!(option_label(3), 'D');
        assert_eq!(option_label(25), 'Z');
        assert_eq!(option_label(26), '?');
    }

    #[test]
    fn quiz_requires_title_and_keeps_topic() {
        assert_eq!(
            Quiz::new(QuizId::new(1), "", Difficulty::Beginner, "5 min", Vec::new()).unwrap_err(),
            QuizError::EmptyTitle
        );

        let quiz = Quiz::new(
            QuizId::new(1),
            "React Basics",
            Difficulty::Beginner,
            "10 min",
            vec![Question::new("What is React?", opts(&["Library", "Framework"]), 0).unwrap()],
        )
        .unwrap()
        .with_topic("React");
        assert_eq!(quiz.topic(), Some("React"));
        assert_eq!(quiz.question_count(), 1);
        assert!(quiz.question(0).unwrap().is_correct(0));
        assert!(quiz.question(1).is_none());
    }
}
