use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigValidationError;

/// Every generated question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;
pub const MIN_QUESTIONS: u32 = 1;
pub const MAX_QUESTIONS: u32 = 20;
pub const DEFAULT_QUESTIONS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigValidationError::UnknownDifficulty(raw.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    #[default]
    Setup,
    Quiz,
    Results,
}

/// Parameters for one generation request. Built through [`QuizConfig::new`]
/// so the topic is trimmed and the count is range checked before anything
/// leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    pub topic: String,
    pub difficulty: Difficulty,
    pub num_questions: u32,
}

impl QuizConfig {
    pub fn new(
        topic: impl AsRef<str>,
        difficulty: Difficulty,
        num_questions: u32,
    ) -> Result<Self, ConfigValidationError> {
        let config = Self {
            topic: topic.as_ref().trim().to_string(),
            difficulty,
            num_questions,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.topic.trim().is_empty() {
            return Err(ConfigValidationError::EmptyTopic);
        }
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.num_questions) {
            return Err(ConfigValidationError::QuestionCountOutOfRange {
                count: self.num_questions,
                min: MIN_QUESTIONS,
                max: MAX_QUESTIONS,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestion {
    /// Returns a description of the first structural problem, if any.
    pub fn defect(&self) -> Option<String> {
        if self.question.trim().is_empty() {
            return Some("question text is empty".to_string());
        }
        if self.options.len() != OPTION_COUNT {
            return Some(format!(
                "expected {OPTION_COUNT} options, got {}",
                self.options.len()
            ));
        }
        if self.correct_answer >= OPTION_COUNT {
            return Some(format!(
                "correct answer index {} is out of range",
                self.correct_answer
            ));
        }
        None
    }

    pub fn is_correct(&self, answer: Option<usize>) -> bool {
        answer == Some(self.correct_answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: usize, correct_answer: usize) -> QuizQuestion {
        QuizQuestion {
            question: "Which ocean is largest?".to_string(),
            options: (0..options).map(|i| format!("option {i}")).collect(),
            correct_answer,
            explanation: String::new(),
        }
    }

    #[test]
    fn config_trims_topic() {
        let config = QuizConfig::new("  Oceans \n", Difficulty::Easy, 3).expect("valid");
        assert_eq!(config.topic, "Oceans");
    }

    #[test]
    fn config_rejects_blank_topic() {
        let err = QuizConfig::new("   ", Difficulty::Hard, 3).expect_err("blank topic");
        assert_eq!(err, ConfigValidationError::EmptyTopic);
    }

    #[test]
    fn config_rejects_count_outside_range() {
        for count in [0, 21, 100] {
            let err = QuizConfig::new("Oceans", Difficulty::Medium, count).expect_err("range");
            assert!(matches!(
                err,
                ConfigValidationError::QuestionCountOutOfRange { count: c, .. } if c == count
            ));
        }
        assert!(QuizConfig::new("Oceans", Difficulty::Medium, 1).is_ok());
        assert!(QuizConfig::new("Oceans", Difficulty::Medium, 20).is_ok());
    }

    #[test]
    fn config_serializes_with_camel_case_count() {
        let config = QuizConfig::new("Oceans", Difficulty::Easy, 3).expect("valid");
        let json = serde_json::to_value(&config).expect("json");
        assert_eq!(
            json,
            serde_json::json!({"topic": "Oceans", "difficulty": "easy", "numQuestions": 3})
        );
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn question_defects_are_reported() {
        assert_eq!(question(4, 3).defect(), None);
        assert!(question(3, 0).defect().expect("defect").contains("3 options"));
        assert!(question(4, 4).defect().expect("defect").contains("out of range"));

        let mut blank = question(4, 0);
        blank.question = "  ".to_string();
        assert!(blank.defect().is_some());
    }

    #[test]
    fn question_decodes_wire_field_names() {
        let question: QuizQuestion = serde_json::from_value(serde_json::json!({
            "question": "2 + 2?",
            "options": ["3", "4", "5", "22"],
            "correctAnswer": 1,
            "explanation": "Basic arithmetic."
        }))
        .expect("decode");
        assert_eq!(question.correct_answer, 1);
        assert!(question.is_correct(Some(1)));
        assert!(!question.is_correct(None));
    }
}
