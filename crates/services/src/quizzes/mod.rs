mod catalog;
mod results;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizServiceError;
pub use catalog::{QuizCard, QuizCatalogService};
pub use results::{QuizResult, QuizResults};
pub use workflow::{QuizAdvance, QuizLoopService};
