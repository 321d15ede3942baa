//! Built-in study catalog used when no remote API is configured.

use serde::Deserialize;

use study_core::model::{Flashcard, Quiz};

use crate::records::{FlashcardRecord, QuizRecord, RecordError};

const CATALOG_JSON: &str = include_str!("../fixtures/catalog.json");

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    #[serde(default)]
    quizzes: Vec<QuizRecord>,
    #[serde(default)]
    flashcards: Vec<FlashcardRecord>,
}

/// Validated contents of a catalog file.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub quizzes: Vec<Quiz>,
    pub flashcards: Vec<Flashcard>,
}

impl Catalog {
    /// Parses and validates a catalog document. Unlike remote lists, a bad entry
    /// here fails the whole load.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if the JSON is malformed or any entry is invalid.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let record: CatalogRecord = serde_json::from_str(json)?;
        let quizzes = record
            .quizzes
            .into_iter()
            .map(QuizRecord::into_quiz)
            .collect::<Result<_, _>>()?;
        let flashcards = record
            .flashcards
            .into_iter()
            .map(FlashcardRecord::into_flashcard)
            .collect::<Result<_, _>>()?;
        Ok(Self {
            quizzes,
            flashcards,
        })
    }

    /// The catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if the bundled file fails validation.
    pub fn bundled() -> Result<Self, RecordError> {
        Self::from_json(CATALOG_JSON)
    }
}
