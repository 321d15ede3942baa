use crate::model::{AttemptId, QuizId};

use super::score::QuizScore;

/// One selectable option as shown to the taker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub index: usize,
    pub label: char,
    pub text: String,
    pub selected: bool,
}

/// Everything the presentation layer needs to draw the current question or results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSessionView {
    pub attempt_id: AttemptId,
    pub quiz_id: QuizId,
    pub title: String,
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<OptionView>,
    pub selected: Option<usize>,
    pub can_go_back: bool,
    pub can_advance: bool,
    pub is_last: bool,
    pub is_terminal: bool,
    pub score: Option<QuizScore>,
}

impl QuizSessionView {
    /// Position of the visible question as a whole percentage of the quiz.
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        QuizScore::new(self.index + 1, self.total).percentage()
    }

    /// Valid option indices for the visible question.
    #[must_use]
    pub fn option_indices(&self) -> std::ops::Range<usize> {
        0..self.options.len()
    }

    #[must_use]
    pub fn advance_label(&self) -> &'static str {
        if self.is_last { "Finish" } else { "Next" }
    }

    /// "Question 2 / 5"
    #[must_use]
    pub fn position_label(&self) -> String {
        format!("Question {} / {}", self.index + 1, self.total)
    }
}
