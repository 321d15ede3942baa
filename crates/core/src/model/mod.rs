mod document;
mod flashcard;
mod ids;
mod quiz;
mod user;

pub use ids::{AttemptId, DocumentId, FlashcardId, ParseIdError, QuizId, UserId};

pub use document::{Document, DocumentQuery, RECENT_DOCUMENTS_LIMIT};
pub use flashcard::{Flashcard, FlashcardError};
pub use quiz::{Difficulty, MAX_OPTIONS, Question, Quiz, QuizError, option_label};
pub use user::User;
