#![forbid(unsafe_code)]

pub mod fixtures;
pub mod records;
pub mod repository;

pub use repository::{
    DocumentRepository, FlashcardRepository, InMemoryRepository, NewDocument, QuizRepository,
    Storage, StorageError,
};
