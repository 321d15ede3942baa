//! Shared error types for the services crate.

use thiserror::Error;

use storage::StorageError;
use storage::records::RecordError;
use study_core::flashcards::FlashcardReviewError;
use study_core::quiz::QuizSessionError;

/// Errors emitted by `ApiClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("invalid API base url: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid API timeout: {0}")]
    InvalidTimeout(String),
    #[error("API request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("API returned a malformed record: {0}")]
    InvalidRecord(#[from] RecordError),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ApiError::HttpStatus(status) => Some(*status),
            ApiError::Http(err) => err.status(),
            _ => None,
        }
    }
}

impl From<ApiError> for StorageError {
    fn from(err: ApiError) -> Self {
        use reqwest::StatusCode;

        match err {
            ApiError::InvalidRecord(record) => StorageError::InvalidRecord(record),
            other => match other.status() {
                Some(StatusCode::NOT_FOUND) => StorageError::NotFound,
                Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                    StorageError::Unauthorized
                }
                _ if matches!(&other, ApiError::Http(e) if e.is_decode()) => {
                    StorageError::Serialization(other.to_string())
                }
                _ => StorageError::Connection(other.to_string()),
            },
        }
    }
}

/// Errors emitted by `QuizLoopService` and `QuizCatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error(transparent)]
    Session(#[from] QuizSessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `FlashcardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlashcardServiceError {
    #[error(transparent)]
    Review(#[from] FlashcardReviewError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `NotesService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotesError {
    #[error("user not authenticated")]
    NotAuthenticated,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while establishing a `UserContext`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContextError {
    #[error("access token is empty")]
    MissingToken,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Context(#[from] ContextError),
}
