use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use storage::NewDocument;
use storage::records::{
    DocumentRecord, FlashcardRecord, QuizRecord, UserRecord, validate_all,
};
use study_core::model::{Document, Flashcard, Quiz, QuizId, User, UserId};

use super::config::ApiConfig;
use crate::context::IdentityProvider;
use crate::error::ApiError;

/// Thin typed wrapper over the study REST API.
///
/// Every call takes the bearer token explicitly; the client holds no user state.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `GET /me?user_id={id}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, a non-2xx status, or a malformed
    /// user record.
    pub async fn me(&self, token: &str, user_id: UserId) -> Result<User, ApiError> {
        let mut url = self.config.endpoint(&["me"]);
        url.query_pairs_mut()
            .append_pair("user_id", &user_id.to_string());
        let record: UserRecord = self.get_json(token, url).await?;
        Ok(record.into_user()?)
    }

    /// `GET /documents/user/{id}`. Malformed entries are dropped.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a non-2xx status.
    pub async fn documents(&self, token: &str, user_id: UserId) -> Result<Vec<Document>, ApiError> {
        let id = user_id.to_string();
        let url = self.config.endpoint(&["documents", "user", &id]);
        let entries: Vec<Value> = self.get_json(token, url).await?;
        Ok(validate_all("document", entries, DocumentRecord::into_document))
    }

    /// `POST /documents/upload` as multipart `file`, `title`, `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a non-2xx status.
    pub async fn upload_document(
        &self,
        token: &str,
        user_id: UserId,
        document: NewDocument,
    ) -> Result<(), ApiError> {
        let mut file = Part::bytes(document.bytes).file_name(document.file_name);
        if let Some(content_type) = document.content_type.as_deref() {
            file = file.mime_str(content_type)?;
        }
        let form = Form::new()
            .part("file", file)
            .text("title", document.title)
            .text("user_id", user_id.to_string());

        let response = self
            .http
            .post(self.config.endpoint(&["documents", "upload"]))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }

    /// `GET /quizzes`. Malformed entries are dropped.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a non-2xx status.
    pub async fn quizzes(&self, token: &str) -> Result<Vec<Quiz>, ApiError> {
        let entries: Vec<Value> = self
            .get_json(token, self.config.endpoint(&["quizzes"]))
            .await?;
        Ok(validate_all("quiz", entries, QuizRecord::into_quiz))
    }

    /// `GET /quizzes/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, a non-2xx status, or a quiz
    /// that fails validation.
    pub async fn quiz(&self, token: &str, id: QuizId) -> Result<Quiz, ApiError> {
        let id = id.to_string();
        let record: QuizRecord = self
            .get_json(token, self.config.endpoint(&["quizzes", &id]))
            .await?;
        Ok(record.into_quiz()?)
    }

    /// `GET /flashcards`. Malformed entries are dropped.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a non-2xx status.
    pub async fn flashcards(&self, token: &str) -> Result<Vec<Flashcard>, ApiError> {
        let entries: Vec<Value> = self
            .get_json(token, self.config.endpoint(&["flashcards"]))
            .await?;
        Ok(validate_all("flashcard", entries, FlashcardRecord::into_flashcard))
    }

    async fn get_json<T: DeserializeOwned>(&self, token: &str, url: Url) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).bearer_auth(token).send().await?;
        Ok(check_status(response)?.json::<T>().await?)
    }
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        tracing::warn!(%status, url = %response.url(), "API request rejected");
        Err(ApiError::HttpStatus(status))
    }
}

#[async_trait]
impl IdentityProvider for ApiClient {
    async fn current_user(&self, token: &str, user_id: UserId) -> Result<User, ApiError> {
        self.me(token, user_id).await
    }
}
