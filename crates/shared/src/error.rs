use thiserror::Error;

/// Rejections raised before a generation request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("topic must not be empty")]
    EmptyTopic,
    #[error("question count {count} is outside {min}..={max}")]
    QuestionCountOutOfRange { count: u32, min: u32, max: u32 },
    #[error("unknown difficulty '{0}', expected easy, medium or hard")]
    UnknownDifficulty(String),
}
