use shared::{domain::QuizPhase, error::ConfigValidationError};
use thiserror::Error;

/// Shown when a generation failure carries no message of its own.
pub const GENERATION_FALLBACK_MESSAGE: &str = "Failed to generate quiz. Please try again.";

/// Any way the question generator can fail to produce a usable question set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("failed to reach question generator: {0}")]
    Transport(String),
    #[error("{0}")]
    Service(String),
    #[error("question generator responded with HTTP {status}")]
    Status { status: u16 },
    #[error("malformed quiz payload: {0}")]
    Malformed(String),
    #[error("No questions generated")]
    Empty,
}

impl GenerationError {
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERATION_FALLBACK_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Reasons a stored session cannot be restored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStateError {
    #[error("setup phase must not carry questions, answers or a position")]
    SetupNotEmpty,
    #[error("{phase:?} phase requires at least one question")]
    MissingQuestions { phase: QuizPhase },
    #[error("{answers} answer slots for {questions} questions")]
    AnswerCountMismatch { questions: usize, answers: usize },
    #[error("current index {index} is outside {len} questions")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("question {position}: {defect}")]
    MalformedQuestion { position: usize, defect: String },
    #[error("question {position}: answer {answer} is out of range")]
    AnswerOutOfRange { position: usize, answer: usize },
}

#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    Validation(#[from] ConfigValidationError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}
