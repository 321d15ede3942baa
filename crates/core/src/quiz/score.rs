use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::Quiz;

/// Result of grading an answer map against a quiz.
///
/// Only built by grading or `new`, so `percentage` always agrees with
/// `correct` and `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct QuizScore {
    correct: usize,
    total: usize,
    percentage: u32,
}

impl QuizScore {
    /// Grades `answers` (question index -> selected option) against `quiz`.
    ///
    /// Unanswered questions count as incorrect.
    #[must_use]
    pub fn grade(quiz: &Quiz, answers: &BTreeMap<usize, usize>) -> Self {
        let correct = quiz
            .questions()
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                answers
                    .get(index)
                    .is_some_and(|selected| question.is_correct(*selected))
            })
            .count();
        Self::new(correct, quiz.question_count())
    }

    /// Builds a score from raw counts; `correct` is clamped to `total`.
    #[must_use]
    pub fn new(correct: usize, total: usize) -> Self {
        let correct = correct.min(total);
        Self {
            correct,
            total,
            percentage: percent_half_up(correct, total),
        }
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// `round(correct / total * 100)`, halves rounded up.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }
}

// Integer arithmetic: floor((200c + t) / 2t) == round-half-up(100c / t).
fn percent_half_up(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = correct as u128;
    let total = total as u128;
    let pct = (200 * correct + total) / (2 * total);
    u32::try_from(pct).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, Question, QuizId};

    #[test]
    fn rounds_half_up() {
        assert_eq!(QuizScore::new(1, 2).percentage(), 50);
        assert_eq!(QuizScore::new(1, 8).percentage(), 13);
        assert_eq!(QuizScore::new(2, 3).percentage(), 67);
        assert_eq!(QuizScore::new(1, 3).percentage(), 33);
        assert_eq!(QuizScore::new(7, 8).percentage(), 88);
    }

    #[test]
    fn bounds() {
        assert_eq!(QuizScore::new(0, 5).percentage(), 0);
        assert_eq!(QuizScore::new(5, 5).percentage(), 100);
        assert!(QuizScore::new(5, 5).is_perfect());
        assert_eq!(QuizScore::new(9, 5).correct(), 5);
        assert_eq!(QuizScore::new(0, 0).percentage(), 0);
        assert!(!QuizScore::new(0, 0).is_perfect());
    }

    #[test]
    fn graded_score_matches_counts() {
        let questions = (0..3)
            .map(|i| Question::new(format!("Q{i}"), vec!["a".into(), "b".into()], 0).unwrap())
            .collect();
        let quiz = Quiz::new(QuizId::new(1), "Quiz", Difficulty::Beginner, "", questions).unwrap();
        let answers = BTreeMap::from([(0, 0), (1, 1)]);

        let score = QuizScore::grade(&quiz, &answers);
        assert_eq!(score, QuizScore::new(1, 3));
        assert_eq!(score.percentage(), 33);
    }
}
