use std::sync::Arc;

use storage::{DocumentRepository, NewDocument};
use study_core::model::{Document, DocumentQuery};

use crate::context::UserContext;
use crate::error::NotesError;
use crate::notify::{Notification, Notifier};

/// Outcome of a multi-file upload; files succeed or fail independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub uploaded: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl UploadReport {
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Clone)]
pub struct NotesService {
    documents: Arc<dyn DocumentRepository>,
    notifier: Arc<dyn Notifier>,
}

impl NotesService {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            documents,
            notifier,
        }
    }

    /// The signed-in user's notes, filtered and trimmed by `query`.
    ///
    /// Nobody signed in means nothing to show.
    ///
    /// # Errors
    ///
    /// Returns `NotesError::Storage` if the documents cannot be read.
    pub async fn list(
        &self,
        ctx: &UserContext,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, NotesError> {
        let Some(user) = ctx.user() else {
            return Ok(Vec::new());
        };
        let documents = self.documents.list_documents(user.id).await?;
        Ok(query.apply(&documents))
    }

    /// Uploads each file, one notification per file.
    ///
    /// # Errors
    ///
    /// Returns `NotesError::NotAuthenticated` (after notifying) when nobody is
    /// signed in; nothing is uploaded in that case.
    pub async fn upload(
        &self,
        ctx: &UserContext,
        files: Vec<NewDocument>,
    ) -> Result<UploadReport, NotesError> {
        let Some(user) = ctx.user() else {
            self.notifier.notify(Notification::NotAuthenticated);
            return Err(NotesError::NotAuthenticated);
        };

        let mut report = UploadReport::default();
        for file in files {
            let file_name = file.file_name.clone();
            match self.documents.upload_document(user.id, file).await {
                Ok(()) => {
                    tracing::info!(user_id = %user.id, file = %file_name, "document uploaded");
                    self.notifier.notify(Notification::UploadSucceeded {
                        file_name: file_name.clone(),
                    });
                    report.uploaded.push(file_name);
                }
                Err(err) => {
                    tracing::warn!(user_id = %user.id, file = %file_name, error = %err, "upload failed");
                    let reason = err.to_string();
                    self.notifier.notify(Notification::UploadFailed {
                        file_name: file_name.clone(),
                        reason: reason.clone(),
                    });
                    report.failed.push((file_name, reason));
                }
            }
        }
        Ok(report)
    }
}
