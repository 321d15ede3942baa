//! Flashcard study mode: step through a deck, flipping each card.

use thiserror::Error;

use crate::model::Flashcard;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlashcardReviewError {
    #[error("no flashcards to review")]
    Empty,
}

/// Side of the card currently facing the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Question,
    Answer,
}

impl CardFace {
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            CardFace::Question => "Question",
            CardFace::Answer => "Answer",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlashcardReview {
    cards: Vec<Flashcard>,
    current: usize,
    flipped: bool,
}

impl FlashcardReview {
    /// # Errors
    ///
    /// Returns `FlashcardReviewError::Empty` if `cards` is empty.
    pub fn new(cards: Vec<Flashcard>) -> Result<Self, FlashcardReviewError> {
        if cards.is_empty() {
            return Err(FlashcardReviewError::Empty);
        }
        Ok(Self {
            cards,
            current: 0,
            flipped: false,
        })
    }

    #[must_use]
    pub fn current_card(&self) -> &Flashcard {
        &self.cards[self.current]
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    #[must_use]
    pub fn face(&self) -> CardFace {
        if self.flipped {
            CardFace::Answer
        } else {
            CardFace::Question
        }
    }

    /// Text on the visible face.
    #[must_use]
    pub fn text(&self) -> &str {
        let card = self.current_card();
        match self.face() {
            CardFace::Question => card.question(),
            CardFace::Answer => card.answer(),
        }
    }

    /// "Card 2 of 4"
    #[must_use]
    pub fn position_label(&self) -> String {
        format!("Card {} of {}", self.current + 1, self.cards.len())
    }

    pub fn flip(&mut self) -> CardFace {
        self.flipped = !self.flipped;
        self.face()
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current + 1 < self.cards.len()
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current > 0
    }

    /// Returns `false` and stays put on the last card.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current += 1;
        self.flipped = false;
        true
    }

    /// Returns `false` and stays put on the first card.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.current -= 1;
        self.flipped = false;
        true
    }

    /// Replaces the card order and restarts from the first card, question up.
    ///
    /// Callers pass a permutation of the current cards (e.g. a shuffle).
    pub fn reorder(&mut self, reorder: impl FnOnce(&mut [Flashcard])) {
        reorder(&mut self.cards);
        self.current = 0;
        self.flipped = false;
    }
}
