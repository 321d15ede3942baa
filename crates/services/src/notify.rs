//! Transient user-facing messages ("toasts").

use std::sync::{Mutex, PoisonError};

use study_core::model::QuizId;
use study_core::quiz::QuizScore;

/// Events worth telling the learner about.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Notification {
    QuizCompleted {
        quiz_id: QuizId,
        title: String,
        score: QuizScore,
    },
    CardsShuffled,
    StudySessionComplete {
        reviewed: usize,
    },
    UploadSucceeded {
        file_name: String,
    },
    UploadFailed {
        file_name: String,
        reason: String,
    },
    NotAuthenticated,
}

impl Notification {
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Notification::QuizCompleted { .. } => "Quiz complete!",
            Notification::CardsShuffled => "Cards shuffled!",
            Notification::StudySessionComplete { .. } => "Study session complete!",
            Notification::UploadSucceeded { .. } => "File uploaded successfully!",
            Notification::UploadFailed { .. } | Notification::NotAuthenticated => "Upload failed",
        }
    }

    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Notification::QuizCompleted { title, score, .. } => format!(
                "You scored {} / {} ({}%) on {title}.",
                score.correct(),
                score.total(),
                score.percentage()
            ),
            Notification::CardsShuffled => {
                "Flashcards have been randomized for better learning.".to_string()
            }
            Notification::StudySessionComplete { .. } => {
                "Great job reviewing your flashcards. Keep up the good work!".to_string()
            }
            Notification::UploadSucceeded { file_name } => {
                format!("{file_name} has been processed and added to your notes.")
            }
            Notification::UploadFailed { file_name, .. } => {
                format!("{file_name} could not be uploaded.")
            }
            Notification::NotAuthenticated => "User not authenticated.".to_string(),
        }
    }
}

/// Sink for notifications; the presentation layer decides how to show them.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Buffers notifications until the caller drains them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    inner: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_completed_describes_score() {
        let n = Notification::QuizCompleted {
            quiz_id: QuizId::new(1),
            title: "React Basics".into(),
            score: QuizScore::new(1, 2),
        };
        assert_eq!(n.title(), "Quiz complete!");
        assert_eq!(n.description(), "You scored 1 / 2 (50%) on React Basics.");
    }

    #[test]
    fn upload_messages_name_the_file() {
        let ok = Notification::UploadSucceeded {
            file_name: "ml.pdf".into(),
        };
        assert_eq!(ok.description(), "ml.pdf has been processed and added to your notes.");

        let failed = Notification::UploadFailed {
            file_name: "ml.pdf".into(),
            reason: "connection error".into(),
        };
        assert_eq!(failed.title(), "Upload failed");
        assert_eq!(failed.description(), "ml.pdf could not be uploaded.");
    }

    #[test]
    fn recording_notifier_drains() {
        let sink = RecordingNotifier::new();
        sink.notify(Notification::CardsShuffled);
        assert_eq!(sink.snapshot().len(), 1);
        assert_eq!(sink.drain(), vec![Notification::CardsShuffled]);
        assert!(sink.drain().is_empty());
    }
}
