use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use storage::{
    DocumentRepository, FlashcardRepository, NewDocument, QuizRepository, StorageError,
};
use study_core::model::{Document, Flashcard, Quiz, QuizId, UserId};

use super::client::ApiClient;

/// Repository backed by the study API, authenticated as one user.
#[derive(Clone)]
pub struct RemoteRepository {
    client: Arc<ApiClient>,
    token: String,
}

impl RemoteRepository {
    #[must_use]
    pub fn new(client: Arc<ApiClient>, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
        }
    }
}

impl fmt::Debug for RemoteRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteRepository")
            .field("base_url", &self.client.config().base_url().as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl QuizRepository for RemoteRepository {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        Ok(self.client.quizzes(&self.token).await?)
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Quiz, StorageError> {
        Ok(self.client.quiz(&self.token, id).await?)
    }
}

#[async_trait]
impl FlashcardRepository for RemoteRepository {
    async fn list_flashcards(&self) -> Result<Vec<Flashcard>, StorageError> {
        Ok(self.client.flashcards(&self.token).await?)
    }
}

#[async_trait]
impl DocumentRepository for RemoteRepository {
    async fn list_documents(&self, user_id: UserId) -> Result<Vec<Document>, StorageError> {
        Ok(self.client.documents(&self.token, user_id).await?)
    }

    async fn upload_document(
        &self,
        user_id: UserId,
        document: NewDocument,
    ) -> Result<(), StorageError> {
        Ok(self
            .client
            .upload_document(&self.token, user_id, document)
            .await?)
    }
}
