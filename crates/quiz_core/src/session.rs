use serde::{Deserialize, Serialize};
use shared::domain::{QuizPhase, QuizQuestion, OPTION_COUNT};
use tracing::{debug, warn};

use crate::{
    error::SessionStateError,
    review::{progress, review, score, Progress, QuestionReview, Score},
};

/// State of one quiz attempt.
///
/// `answers` always has one slot per question once the quiz phase starts, and
/// `current_index` stays within the question list while in that phase. Every
/// transition is total: calls that make no sense for the current phase leave
/// the session untouched. Deserializing checks the same invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredSession")]
pub struct Session {
    phase: QuizPhase,
    questions: Vec<QuizQuestion>,
    answers: Vec<Option<usize>>,
    current_index: usize,
}

#[derive(Deserialize)]
struct StoredSession {
    phase: QuizPhase,
    #[serde(default)]
    questions: Vec<QuizQuestion>,
    #[serde(default)]
    answers: Vec<Option<usize>>,
    #[serde(default)]
    current_index: usize,
}

impl TryFrom<StoredSession> for Session {
    type Error = SessionStateError;

    fn try_from(stored: StoredSession) -> Result<Self, Self::Error> {
        let StoredSession {
            phase,
            questions,
            answers,
            current_index,
        } = stored;

        if phase == QuizPhase::Setup {
            if !questions.is_empty() || !answers.is_empty() || current_index != 0 {
                return Err(SessionStateError::SetupNotEmpty);
            }
            return Ok(Self::default());
        }
        if questions.is_empty() {
            return Err(SessionStateError::MissingQuestions { phase });
        }
        if answers.len() != questions.len() {
            return Err(SessionStateError::AnswerCountMismatch {
                questions: questions.len(),
                answers: answers.len(),
            });
        }
        if current_index >= questions.len() {
            return Err(SessionStateError::IndexOutOfRange {
                index: current_index,
                len: questions.len(),
            });
        }
        for (i, (question, answer)) in questions.iter().zip(&answers).enumerate() {
            if let Some(defect) = question.defect() {
                return Err(SessionStateError::MalformedQuestion {
                    position: i + 1,
                    defect,
                });
            }
            if let Some(answer) = answer.filter(|&a| a >= OPTION_COUNT) {
                return Err(SessionStateError::AnswerOutOfRange {
                    position: i + 1,
                    answer,
                });
            }
        }

        Ok(Self {
            phase,
            questions,
            answers,
            current_index,
        })
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.phase != QuizPhase::Quiz {
            return None;
        }
        self.questions.get(self.current_index)
    }

    pub fn current_answer(&self) -> Option<usize> {
        self.answers.get(self.current_index).copied().flatten()
    }

    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    /// Replaces the whole session with a fresh quiz over `questions`.
    /// An empty list is refused so the quiz phase never starts without a
    /// current question.
    pub(crate) fn load(&mut self, questions: Vec<QuizQuestion>) -> bool {
        if questions.is_empty() {
            return false;
        }
        self.answers = vec![None; questions.len()];
        self.questions = questions;
        self.current_index = 0;
        self.phase = QuizPhase::Quiz;
        true
    }

    /// Records `option` for the current question, overwriting any earlier
    /// choice. Returns whether the answer was recorded.
    pub fn select_answer(&mut self, option: usize) -> bool {
        if self.phase != QuizPhase::Quiz {
            debug!(phase = ?self.phase, "ignoring answer outside quiz phase");
            return false;
        }
        let in_range = self
            .questions
            .get(self.current_index)
            .is_some_and(|question| option < question.options.len().min(OPTION_COUNT));
        if !in_range {
            warn!(option, index = self.current_index, "ignoring out of range answer");
            return false;
        }
        match self.answers.get_mut(self.current_index) {
            Some(slot) => {
                *slot = Some(option);
                true
            }
            None => {
                warn!(index = self.current_index, "no answer slot for current question");
                false
            }
        }
    }

    /// Moves forward one question, clamping at the last one.
    pub fn advance(&mut self) {
        if self.phase != QuizPhase::Quiz {
            return;
        }
        let last = self.questions.len().saturating_sub(1);
        self.current_index = (self.current_index + 1).min(last);
    }

    /// Moves back one question, clamping at the first one.
    pub fn retreat(&mut self) {
        if self.phase != QuizPhase::Quiz {
            return;
        }
        self.current_index = self.current_index.saturating_sub(1);
    }

    /// Ends the quiz. Only the quiz phase can move to results.
    pub fn submit(&mut self) -> bool {
        if self.phase != QuizPhase::Quiz {
            return false;
        }
        self.phase = QuizPhase::Results;
        true
    }

    pub fn restart(&mut self) {
        *self = Self::default();
    }

    /// Gate for the "next" action: not on the last question and answered.
    pub fn can_advance(&self) -> bool {
        self.phase == QuizPhase::Quiz && !self.is_last() && self.current_answer().is_some()
    }

    /// Gate for the "submit" action: on the last question and answered.
    pub fn can_submit(&self) -> bool {
        self.phase == QuizPhase::Quiz && self.is_last() && self.current_answer().is_some()
    }

    pub fn can_retreat(&self) -> bool {
        self.phase == QuizPhase::Quiz && !self.is_first()
    }

    pub fn score(&self) -> Score {
        score(&self.questions, &self.answers)
    }

    pub fn review(&self) -> Vec<QuestionReview> {
        review(&self.questions, &self.answers)
    }

    pub fn progress(&self) -> Option<Progress> {
        if self.phase != QuizPhase::Quiz {
            return None;
        }
        progress(self.current_index, self.questions.len())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
