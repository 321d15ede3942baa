use std::sync::Arc;

use storage::Storage;
use study_core::model::UserId;

use crate::Clock;
use crate::api::{ApiClient, ApiConfig, RemoteRepository};
use crate::context::UserContext;
use crate::dashboard::DashboardService;
use crate::error::AppServicesError;
use crate::flashcard_service::FlashcardService;
use crate::notes_service::NotesService;
use crate::notify::Notifier;
use crate::quizzes::{QuizCatalogService, QuizLoopService, QuizResults};

/// Assembles app-facing services over one storage backend and one user context.
#[derive(Clone)]
pub struct AppServices {
    context: UserContext,
    quiz_loop: Arc<QuizLoopService>,
    quiz_catalog: Arc<QuizCatalogService>,
    flashcards: Arc<FlashcardService>,
    notes: Arc<NotesService>,
    dashboard: Arc<DashboardService>,
}

impl AppServices {
    /// Build services over the bundled quiz and flashcard catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Storage` if the bundled catalog is invalid.
    pub fn offline(
        clock: Clock,
        notifier: Arc<dyn Notifier>,
        context: UserContext,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::with_fixtures(clock)?;
        Ok(Self::from_storage(&storage, clock, notifier, context))
    }

    /// Signs in against the study API and builds services backed by it.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the client cannot be built or sign-in fails.
    pub async fn remote(
        config: ApiConfig,
        clock: Clock,
        notifier: Arc<dyn Notifier>,
        token: &str,
        user_id: UserId,
    ) -> Result<Self, AppServicesError> {
        let client = Arc::new(ApiClient::new(config)?);
        let mut context = UserContext::anonymous();
        context.sign_in(client.as_ref(), token, user_id).await?;

        let repo = Arc::new(RemoteRepository::new(client, token.trim()));
        let storage = Storage {
            quizzes: repo.clone(),
            flashcards: repo.clone(),
            documents: repo,
        };
        Ok(Self::from_storage(&storage, clock, notifier, context))
    }

    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        notifier: Arc<dyn Notifier>,
        context: UserContext,
    ) -> Self {
        let results = QuizResults::new();
        let quiz_loop = Arc::new(QuizLoopService::new(
            clock,
            Arc::clone(&storage.quizzes),
            Arc::clone(&notifier),
            results.clone(),
        ));
        let quiz_catalog = Arc::new(QuizCatalogService::new(
            Arc::clone(&storage.quizzes),
            results.clone(),
        ));
        let flashcards = Arc::new(FlashcardService::new(
            Arc::clone(&storage.flashcards),
            Arc::clone(&notifier),
        ));
        let notes = Arc::new(NotesService::new(
            Arc::clone(&storage.documents),
            Arc::clone(&notifier),
        ));
        let dashboard = Arc::new(DashboardService::new(
            Arc::clone(&storage.documents),
            results,
        ));

        Self {
            context,
            quiz_loop,
            quiz_catalog,
            flashcards,
            notes,
            dashboard,
        }
    }

    #[must_use]
    pub fn context(&self) -> &UserContext {
        &self.context
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn quiz_catalog(&self) -> Arc<QuizCatalogService> {
        Arc::clone(&self.quiz_catalog)
    }

    #[must_use]
    pub fn flashcards(&self) -> Arc<FlashcardService> {
        Arc::clone(&self.flashcards)
    }

    #[must_use]
    pub fn notes(&self) -> Arc<NotesService> {
        Arc::clone(&self.notes)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }
}
