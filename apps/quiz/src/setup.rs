//! Line-by-line setup form: topic, difficulty, question count.

use shared::domain::{Difficulty, QuizConfig};

use crate::settings::clamp_question_count;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Topic,
    Difficulty,
    Count,
}

#[derive(Debug, Clone)]
pub struct SetupForm {
    step: Step,
    topic: String,
    difficulty: Difficulty,
    num_questions: u32,
    previous_topic: Option<String>,
}

impl SetupForm {
    pub fn new(difficulty: Difficulty, num_questions: u32) -> Self {
        Self {
            step: Step::Topic,
            topic: String::new(),
            difficulty,
            num_questions: clamp_question_count(num_questions),
            previous_topic: None,
        }
    }

    /// Uses a config submitted outside the form as the next defaults.
    pub fn remember(&mut self, config: &QuizConfig) {
        self.previous_topic = Some(config.topic.clone());
        self.difficulty = config.difficulty;
        self.num_questions = config.num_questions;
        self.topic.clear();
        self.step = Step::Topic;
    }

    /// Starts over at the topic prompt, keeping the last choices as defaults.
    fn reset(&mut self) {
        if !self.topic.is_empty() {
            self.previous_topic = Some(std::mem::take(&mut self.topic));
        }
        self.step = Step::Topic;
    }

    pub fn prompt(&self) -> String {
        match self.step {
            Step::Topic => match &self.previous_topic {
                Some(topic) => format!("Quiz topic [{topic}]: "),
                None => "Quiz topic (e.g. Space Exploration, World History, Python): ".into(),
            },
            Step::Difficulty => format!("Difficulty (easy/medium/hard) [{}]: ", self.difficulty),
            Step::Count => format!("Number of questions (1-20) [{}]: ", self.num_questions),
        }
    }

    /// Feeds one line of input. Returns the finished config once the last
    /// field is answered, or a message when the line was not accepted.
    pub fn accept(&mut self, line: &str) -> Result<Option<QuizConfig>, String> {
        let line = line.trim();
        match self.step {
            Step::Topic => {
                let topic = match (line.is_empty(), &self.previous_topic) {
                    (false, _) => line.to_string(),
                    (true, Some(previous)) => previous.clone(),
                    (true, None) => return Err("Topic must not be empty.".into()),
                };
                self.topic = topic;
                self.step = Step::Difficulty;
                Ok(None)
            }
            Step::Difficulty => {
                if !line.is_empty() {
                    self.difficulty = line.parse().map_err(|err| format!("{err}."))?;
                }
                self.step = Step::Count;
                Ok(None)
            }
            Step::Count => {
                if !line.is_empty() {
                    let count = line
                        .parse::<i64>()
                        .map_err(|_| format!("'{line}' is not a number."))?;
                    self.num_questions =
                        clamp_question_count(count.clamp(0, i64::from(u32::MAX)) as u32);
                }
                let config = QuizConfig::new(&self.topic, self.difficulty, self.num_questions)
                    .map_err(|err| format!("{err}."))?;
                self.reset();
                Ok(Some(config))
            }
        }
    }
}
