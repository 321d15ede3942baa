#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod flashcard_service;
pub mod notes_service;
pub mod notify;
pub mod quizzes;

pub use study_core::Clock;

pub use app_services::AppServices;
pub use context::{AuthSession, IdentityProvider, UserContext};
pub use dashboard::{DashboardService, DashboardStats};
pub use error::{
    ApiError, AppServicesError, ContextError, FlashcardServiceError, NotesError, QuizServiceError,
};
pub use flashcard_service::FlashcardService;
pub use notes_service::{NotesService, UploadReport};
pub use notify::{Notification, Notifier, RecordingNotifier};
pub use quizzes::{
    QuizAdvance, QuizCard, QuizCatalogService, QuizLoopService, QuizResult, QuizResults,
};
