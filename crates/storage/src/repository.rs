use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use study_core::Clock;
use study_core::model::{Document, DocumentId, Flashcard, FlashcardId, Quiz, QuizId, UserId};

use crate::fixtures::Catalog;
use crate::records::RecordError;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("not authorized")]
    Unauthorized,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    InvalidRecord(#[from] RecordError),
}

/// A file to add to a user's notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub title: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl NewDocument {
    /// Titles default to the file name, as in the upload form.
    #[must_use]
    pub fn from_file(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        Self {
            title: file_name.clone(),
            file_name,
            content_type: None,
            bytes,
        }
    }
}

/// Source of quiz definitions.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_quiz(&self, id: QuizId) -> Result<Quiz, StorageError>;
}

#[async_trait]
pub trait FlashcardRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the cards cannot be read.
    async fn list_flashcards(&self) -> Result<Vec<Flashcard>, StorageError>;
}

/// A user's uploaded study documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the documents cannot be read.
    async fn list_documents(&self, user_id: UserId) -> Result<Vec<Document>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the upload is rejected or fails.
    async fn upload_document(
        &self,
        user_id: UserId,
        document: NewDocument,
    ) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and offline use.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    clock: Clock,
    quizzes: Arc<Mutex<BTreeMap<QuizId, Quiz>>>,
    flashcards: Arc<Mutex<BTreeMap<FlashcardId, Flashcard>>>,
    documents: Arc<Mutex<BTreeMap<UserId, Vec<Document>>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|e| StorageError::Connection(e.to_string()))
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamps for uploaded documents come from `clock`.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Seeds quizzes and flashcards from `catalog`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the repository lock is poisoned.
    pub fn load_catalog(&self, catalog: Catalog) -> Result<(), StorageError> {
        for quiz in catalog.quizzes {
            self.upsert_quiz(quiz)?;
        }
        for card in catalog.flashcards {
            self.upsert_flashcard(card)?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the repository lock is poisoned.
    pub fn upsert_quiz(&self, quiz: Quiz) -> Result<(), StorageError> {
        lock(&self.quizzes)?.insert(quiz.id(), quiz);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the repository lock is poisoned.
    pub fn upsert_flashcard(&self, card: Flashcard) -> Result<(), StorageError> {
        lock(&self.flashcards)?.insert(card.id(), card);
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        Ok(lock(&self.quizzes)?.values().cloned().collect())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Quiz, StorageError> {
        lock(&self.quizzes)?
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl FlashcardRepository for InMemoryRepository {
    async fn list_flashcards(&self) -> Result<Vec<Flashcard>, StorageError> {
        Ok(lock(&self.flashcards)?.values().cloned().collect())
    }
}

#[async_trait]
impl DocumentRepository for InMemoryRepository {
    async fn list_documents(&self, user_id: UserId) -> Result<Vec<Document>, StorageError> {
        Ok(lock(&self.documents)?
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn upload_document(
        &self,
        user_id: UserId,
        document: NewDocument,
    ) -> Result<(), StorageError> {
        let mut guard = lock(&self.documents)?;
        let next_id = guard
            .values()
            .flatten()
            .map(|d| d.id.value())
            .max()
            .unwrap_or(0)
            + 1;
        guard.entry(user_id).or_default().push(Document {
            id: DocumentId::new(next_id),
            title: document.title,
            summary: String::new(),
            file_url: Some(format!("/uploads/{user_id}/{}", document.file_name)),
            created_at: self.clock.now(),
            topics: Vec::new(),
        });
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub flashcards: Arc<dyn FlashcardRepository>,
    pub documents: Arc<dyn DocumentRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// In-memory storage seeded with the bundled catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bundled catalog fails validation.
    pub fn with_fixtures(clock: Clock) -> Result<Self, StorageError> {
        let repo = InMemoryRepository::new().with_clock(clock);
        repo.load_catalog(Catalog::bundled()?)?;
        Ok(Self::from_repository(repo))
    }

    #[must_use]
    pub fn from_repository(repo: InMemoryRepository) -> Self {
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let flashcards: Arc<dyn FlashcardRepository> = Arc::new(repo.clone());
        let documents: Arc<dyn DocumentRepository> = Arc::new(repo);
        Self {
            quizzes,
            flashcards,
            documents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::{Difficulty, Question};
    use study_core::time::{fixed_clock, fixed_now};

    fn quiz(id: u64) -> Quiz {
        let q = Question::new("What is React?", vec!["Library".into(), "Framework".into()], 0)
            .unwrap();
        Quiz::new(QuizId::new(id), format!("Quiz {id}"), Difficulty::Beginner, "5 min", vec![q])
            .unwrap()
    }

    #[tokio::test]
    async fn quizzes_list_in_id_order() {
        let repo = InMemoryRepository::new();
        repo.upsert_quiz(quiz(3)).unwrap();
        repo.upsert_quiz(quiz(1)).unwrap();

        let ids: Vec<u64> = repo
            .list_quizzes()
            .await
            .unwrap()
            .iter()
            .map(|q| q.id().value())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn missing_quiz_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo.get_quiz(QuizId::new(42)).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn upload_assigns_ids_per_repository() {
        let repo = InMemoryRepository::new().with_clock(fixed_clock());
        let alex = UserId::new(1);
        let sam = UserId::new(2);

        repo.upload_document(alex, NewDocument::from_file("ml.pdf", vec![1, 2]))
            .await
            .unwrap();
        repo.upload_document(sam, NewDocument::from_file("db.docx", vec![3]))
            .await
            .unwrap();

        let docs = repo.list_documents(alex).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "ml.pdf");
        assert_eq!(docs[0].file_name(), Some("ml.pdf"));
        assert_eq!(docs[0].created_at, fixed_now());

        let sam_docs = repo.list_documents(sam).await.unwrap();
        assert_eq!(sam_docs[0].id, DocumentId::new(2));
        assert!(repo.list_documents(UserId::new(9)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fixtures_seed_quizzes_and_cards() {
        let storage = Storage::with_fixtures(fixed_clock()).unwrap();
        assert_eq!(storage.quizzes.list_quizzes().await.unwrap().len(), 3);
        assert_eq!(storage.flashcards.list_flashcards().await.unwrap().len(), 4);
    }
}
