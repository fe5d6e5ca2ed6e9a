//! Values derived from a session for the question and results views.

use serde::Serialize;
use shared::domain::QuizQuestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
}

impl Score {
    pub fn feedback(&self) -> Feedback {
        Feedback::for_percentage(self.percentage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Outstanding,
    Great,
    Good,
    KeepPracticing,
}

impl Feedback {
    pub fn for_percentage(percentage: u32) -> Self {
        match percentage {
            90..=u32::MAX => Feedback::Outstanding,
            70..=89 => Feedback::Great,
            50..=69 => Feedback::Good,
            _ => Feedback::KeepPracticing,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Feedback::Outstanding => "Outstanding!",
            Feedback::Great => "Great job!",
            Feedback::Good => "Good effort!",
            Feedback::KeepPracticing => "Keep practicing!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionReview {
    pub index: usize,
    pub question: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub correct_answer: usize,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// 1-based position of the current question.
    pub position: usize,
    pub total: usize,
    pub percentage: u32,
    pub is_first: bool,
    pub is_last: bool,
}

/// `round(100 * part / whole)` with halves rounded up; 0 for an empty whole.
pub fn rounded_percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((200 * part + whole) / (2 * whole)) as u32
}

pub fn score(questions: &[QuizQuestion], answers: &[Option<usize>]) -> Score {
    let correct = questions
        .iter()
        .zip(answers.iter())
        .filter(|(question, answer)| question.is_correct(**answer))
        .count();
    Score {
        correct,
        total: questions.len(),
        percentage: rounded_percentage(correct, questions.len()),
    }
}

pub fn review(questions: &[QuizQuestion], answers: &[Option<usize>]) -> Vec<QuestionReview> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let selected = answers.get(index).copied().flatten();
            QuestionReview {
                index,
                question: question.question.clone(),
                options: question.options.clone(),
                selected,
                correct_answer: question.correct_answer,
                is_correct: question.is_correct(selected),
                explanation: question.explanation.clone(),
            }
        })
        .collect()
}

pub fn progress(index: usize, total: usize) -> Option<Progress> {
    if index >= total {
        return None;
    }
    Some(Progress {
        position: index + 1,
        total,
        percentage: rounded_percentage(index + 1, total),
        is_first: index == 0,
        is_last: index + 1 == total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(1, 3), 33);
        assert_eq!(rounded_percentage(5, 8), 63);
        assert_eq!(rounded_percentage(0, 4), 0);
        assert_eq!(rounded_percentage(4, 4), 100);
        assert_eq!(rounded_percentage(0, 0), 0);
    }

    #[test]
    fn feedback_tiers_follow_percentage() {
        assert_eq!(Feedback::for_percentage(100), Feedback::Outstanding);
        assert_eq!(Feedback::for_percentage(90), Feedback::Outstanding);
        assert_eq!(Feedback::for_percentage(89), Feedback::Great);
        assert_eq!(Feedback::for_percentage(70), Feedback::Great);
        assert_eq!(Feedback::for_percentage(69), Feedback::Good);
        assert_eq!(Feedback::for_percentage(50), Feedback::Good);
        assert_eq!(Feedback::for_percentage(49), Feedback::KeepPracticing);
        assert_eq!(Feedback::KeepPracticing.message(), "Keep practicing!");
    }

    #[test]
    fn progress_reports_position_and_bounds() {
        let first = progress(0, 4).expect("in range");
        assert_eq!(first.position, 1);
        assert_eq!(first.percentage, 25);
        assert!(first.is_first);
        assert!(!first.is_last);

        let last = progress(3, 4).expect("in range");
        assert!(last.is_last);
        assert_eq!(last.percentage, 100);

        assert!(progress(4, 4).is_none());
        assert!(progress(0, 0).is_none());
    }
}
