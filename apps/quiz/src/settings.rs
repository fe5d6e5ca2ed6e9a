use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::{Difficulty, DEFAULT_QUESTIONS, MAX_QUESTIONS, MIN_QUESTIONS};
use tracing::warn;

pub const DEFAULT_SETTINGS_FILE: &str = "quiz.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub generator_url: String,
    pub api_key: Option<String>,
    pub request_timeout_seconds: u64,
    pub default_difficulty: Difficulty,
    pub default_num_questions: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            generator_url: "http://127.0.0.1:54321/functions/v1/generate-quiz".into(),
            api_key: None,
            request_timeout_seconds: 60,
            default_difficulty: Difficulty::default(),
            default_num_questions: DEFAULT_QUESTIONS,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    generator_url: Option<String>,
    api_key: Option<String>,
    request_timeout_seconds: Option<u64>,
    difficulty: Option<Difficulty>,
    num_questions: Option<u32>,
}

/// Defaults, then the settings file, then environment variables.
///
/// An explicitly requested file must exist; the default `quiz.toml` is
/// optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

fn load_settings_with(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        Err(err) if required => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()));
        }
        Err(_) => {}
    }

    apply_env(&mut settings, lookup);
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file_cfg.generator_url {
        settings.generator_url = v;
    }
    if let Some(v) = file_cfg.api_key {
        settings.api_key = Some(v);
    }
    if let Some(v) = file_cfg.request_timeout_seconds {
        settings.request_timeout_seconds = v;
    }
    if let Some(v) = file_cfg.difficulty {
        settings.default_difficulty = v;
    }
    if let Some(v) = file_cfg.num_questions {
        settings.default_num_questions = clamp_question_count(v);
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("QUIZ_GENERATOR_URL") {
        settings.generator_url = v;
    }
    if let Some(v) = lookup("APP__GENERATOR_URL") {
        settings.generator_url = v;
    }

    if let Some(v) = lookup("QUIZ_API_KEY") {
        settings.api_key = Some(v);
    }
    if let Some(v) = lookup("APP__API_KEY") {
        settings.api_key = Some(v);
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECONDS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_seconds = parsed,
            Err(_) => warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECONDS"),
        }
    }

    if let Some(v) = lookup("APP__DIFFICULTY") {
        match v.parse::<Difficulty>() {
            Ok(parsed) => settings.default_difficulty = parsed,
            Err(err) => warn!(error = %err, "ignoring APP__DIFFICULTY"),
        }
    }

    if let Some(v) = lookup("APP__NUM_QUESTIONS") {
        match v.parse::<u32>() {
            Ok(parsed) => settings.default_num_questions = clamp_question_count(parsed),
            Err(_) => warn!(value = %v, "ignoring invalid APP__NUM_QUESTIONS"),
        }
    }
}

pub fn clamp_question_count(count: u32) -> u32 {
    count.clamp(MIN_QUESTIONS, MAX_QUESTIONS)
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
