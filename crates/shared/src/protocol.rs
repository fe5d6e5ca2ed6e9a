use serde::{Deserialize, Serialize};

use crate::domain::QuizQuestion;

/// Body returned by the generator endpoint. The request body is the
/// [`crate::domain::QuizConfig`] itself.
///
/// Everything the generator may answer with. Both fields are optional on the
/// wire: a body carrying `error` is a failure regardless of `questions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateQuizResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuizQuestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateQuizResponse {
    pub fn success(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions: Some(questions),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            questions: None,
            error: Some(message.into()),
        }
    }

    /// Non-empty error message carried by the body, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_ignores_blank_errors() {
        assert_eq!(GenerateQuizResponse::failure("  ").error_message(), None);
        assert_eq!(
            GenerateQuizResponse::failure(" quota exceeded ").error_message(),
            Some("quota exceeded")
        );
        assert_eq!(GenerateQuizResponse::success(Vec::new()).error_message(), None);
    }

    #[test]
    fn success_omits_error_field_on_the_wire() {
        let json = serde_json::to_value(GenerateQuizResponse::success(Vec::new())).expect("json");
        assert_eq!(json, serde_json::json!({"questions": []}));
    }
}
