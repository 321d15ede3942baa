use chrono::{DateTime, Utc};

use crate::model::ids::DocumentId;

/// How many documents the notes list shows before "View All".
pub const RECENT_DOCUMENTS_LIMIT: usize = 3;

/// An uploaded study document with its generated summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub summary: String,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub topics: Vec<String>,
}

impl Document {
    /// Last path segment of `file_url`, if any. Both `/` and `\` separate
    /// segments; the backend stores some uploads as `uploaded_documents\name`.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_url
            .as_deref()
            .and_then(|url| url.rsplit(['/', '\\']).next())
            .filter(|name| !name.is_empty())
    }

    /// Case-insensitive match against title, summary and file name.
    ///
    /// `needle` must already be trimmed and lowercased.
    fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(needle)
            || self.summary.to_lowercase().contains(needle)
            || self
                .file_name()
                .is_some_and(|name| name.to_lowercase().contains(needle))
    }
}

/// Search box and "View All" toggle of the notes list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentQuery {
    pub text: String,
    pub view_all: bool,
}

impl DocumentQuery {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            view_all: false,
        }
    }

    #[must_use]
    pub fn with_view_all(mut self, view_all: bool) -> Self {
        self.view_all = view_all;
        self
    }

    /// Newest first, filtered by the search text, trimmed to the recent limit
    /// unless `view_all` is set.
    #[must_use]
    pub fn apply(&self, documents: &[Document]) -> Vec<Document> {
        let needle = self.text.trim().to_lowercase();
        let mut sorted: Vec<&Document> = documents.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let filtered = sorted.into_iter().filter(|doc| doc.matches(&needle));
        if self.view_all {
            filtered.cloned().collect()
        } else {
            filtered.take(RECENT_DOCUMENTS_LIMIT).cloned().collect()
        }
    }
}
