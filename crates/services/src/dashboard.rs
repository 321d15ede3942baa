use std::sync::Arc;

use storage::{DocumentRepository, StorageError};

use crate::context::UserContext;
use crate::quizzes::QuizResults;

/// Headline numbers for the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub greeting: String,
    pub notes_uploaded: usize,
    pub quizzes_completed: usize,
    /// Mean of the latest score per quiz; `None` before any quiz is finished.
    pub average_score: Option<u32>,
}

#[derive(Clone)]
pub struct DashboardService {
    documents: Arc<dyn DocumentRepository>,
    results: QuizResults,
}

impl DashboardService {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentRepository>, results: QuizResults) -> Self {
        Self { documents, results }
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the user's documents cannot be counted.
    pub async fn stats(&self, ctx: &UserContext) -> Result<DashboardStats, StorageError> {
        let (name, notes_uploaded) = match ctx.user() {
            Some(user) => (
                user.display_name(),
                self.documents.list_documents(user.id).await?.len(),
            ),
            None => ("User", 0),
        };
        Ok(DashboardStats {
            greeting: format!("Welcome back, {name}!"),
            notes_uploaded,
            quizzes_completed: self.results.completed_count(),
            average_score: self.results.average_percentage(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AuthSession;
    use storage::{InMemoryRepository, NewDocument};
    use study_core::model::{User, UserId};

    #[tokio::test]
    async fn greets_signed_in_user_and_counts_notes() {
        let repo = InMemoryRepository::new();
        let user_id = UserId::new(3);
        repo.upload_document(user_id, NewDocument::from_file("a.pdf", vec![1]))
            .await
            .unwrap();

        let svc = DashboardService::new(Arc::new(repo), QuizResults::new());
        let ctx = UserContext::with_session(AuthSession::new(
            "t",
            User::new(user_id, None, "sam", "sam@example.com"),
        ));

        let stats = svc.stats(&ctx).await.unwrap();
        assert_eq!(stats.greeting, "Welcome back, sam!");
        assert_eq!(stats.notes_uploaded, 1);
        assert_eq!(stats.quizzes_completed, 0);
        assert_eq!(stats.average_score, None);
    }

    #[tokio::test]
    async fn anonymous_gets_generic_greeting() {
        let svc = DashboardService::new(Arc::new(InMemoryRepository::new()), QuizResults::new());
        let stats = svc.stats(&UserContext::anonymous()).await.unwrap();
        assert_eq!(stats.greeting, "Welcome back, User!");
        assert_eq!(stats.notes_uploaded, 0);
    }
}
