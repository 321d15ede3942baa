use std::sync::Arc;

use rand::rng;
use rand::seq::SliceRandom;

use storage::FlashcardRepository;
use study_core::flashcards::FlashcardReview;

use crate::error::FlashcardServiceError;
use crate::notify::{Notification, Notifier};

/// Runs flashcard study sessions.
#[derive(Clone)]
pub struct FlashcardService {
    cards: Arc<dyn FlashcardRepository>,
    notifier: Arc<dyn Notifier>,
}

impl FlashcardService {
    #[must_use]
    pub fn new(cards: Arc<dyn FlashcardRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { cards, notifier }
    }

    /// Loads every flashcard into a fresh review, optionally shuffled.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardServiceError::Storage` if cards cannot be loaded and
    /// `FlashcardServiceError::Review` if there are none.
    pub async fn start_review(&self, shuffle: bool) -> Result<FlashcardReview, FlashcardServiceError> {
        let mut cards = self.cards.list_flashcards().await?;
        if shuffle {
            cards.shuffle(&mut rng());
        }
        let review = FlashcardReview::new(cards)?;
        tracing::info!(cards = review.len(), shuffled = shuffle, "flashcard review started");
        Ok(review)
    }

    /// Randomizes the order and restarts from the first card.
    pub fn shuffle(&self, review: &mut FlashcardReview) {
        review.reorder(|cards| cards.shuffle(&mut rng()));
        self.notifier.notify(Notification::CardsShuffled);
    }

    /// Ends the review; `reviewed` is how far the learner got.
    pub fn end_review(&self, review: FlashcardReview) {
        let reviewed = review.current_index() + 1;
        tracing::info!(reviewed, total = review.len(), "flashcard review ended");
        self.notifier
            .notify(Notification::StudySessionComplete { reviewed });
    }
}
