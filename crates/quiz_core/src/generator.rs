use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::{QuizConfig, QuizQuestion},
    protocol::GenerateQuizResponse,
};
use tracing::{debug, warn};
use url::Url;

use crate::error::GenerationError;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Source of generated questions. Implementations report every failure as a
/// [`GenerationError`]; the controller never sees partial results.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, config: &QuizConfig) -> Result<Vec<QuizQuestion>, GenerationError>;
}

/// Calls a remote generator function over HTTP with the config as JSON body.
#[derive(Debug, Clone)]
pub struct HttpQuestionGenerator {
    http: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpQuestionGenerator {
    pub fn new(endpoint: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint.trim())
            .with_context(|| format!("invalid generator url '{endpoint}'"))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            anyhow::bail!("generator url '{endpoint}' must use http or https");
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            endpoint,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl QuestionGenerator for HttpQuestionGenerator {
    async fn generate(&self, config: &QuizConfig) -> Result<Vec<QuizQuestion>, GenerationError> {
        let mut request = self.http.post(self.endpoint.clone()).json(config);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key).header("apikey", key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;
        debug!(
            status = status.as_u16(),
            bytes = body.len(),
            "generator responded"
        );

        interpret_response(status, &body)
    }
}

/// Maps a raw generator response onto questions or a [`GenerationError`].
/// An `error` field wins over the status code so the service's own message
/// reaches the user.
pub fn interpret_response(
    status: StatusCode,
    body: &[u8],
) -> Result<Vec<QuizQuestion>, GenerationError> {
    let parsed = serde_json::from_slice::<GenerateQuizResponse>(body);

    if let Ok(response) = &parsed {
        if let Some(message) = response.error_message() {
            return Err(GenerationError::Service(message.to_string()));
        }
    }

    if !status.is_success() {
        warn!(status = status.as_u16(), "generator returned failure status");
        return Err(GenerationError::Status {
            status: status.as_u16(),
        });
    }

    let response = parsed.map_err(|err| GenerationError::Malformed(err.to_string()))?;
    validate_questions(response.questions.unwrap_or_default())
}

/// Accepts a question set only if it is non-empty and every question is
/// well formed.
pub fn validate_questions(
    questions: Vec<QuizQuestion>,
) -> Result<Vec<QuizQuestion>, GenerationError> {
    if questions.is_empty() {
        return Err(GenerationError::Empty);
    }
    for (index, question) in questions.iter().enumerate() {
        if let Some(defect) = question.defect() {
            return Err(GenerationError::Malformed(format!(
                "question {}: {defect}",
                index + 1
            )));
        }
    }
    Ok(questions)
}

#[cfg(test)]
#[path = "tests/generator_tests.rs"]
mod tests;
