//! Quiz session engine: one taker walking through one quiz.

mod engine;
mod score;
mod session;
mod view;

pub use engine::QuizEngine;
pub use score::QuizScore;
pub use session::{QuizSession, QuizSessionError, QuizStep};
pub use view::{OptionView, QuizSessionView};
