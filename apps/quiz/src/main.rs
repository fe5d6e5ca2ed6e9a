use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use quiz_core::HttpQuestionGenerator;
use shared::domain::{Difficulty, QuizConfig, MAX_QUESTIONS, MIN_QUESTIONS};
use tokio::{io::BufReader, sync::mpsc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod input;
mod settings;
mod setup;
mod views;

#[derive(Parser, Debug)]
#[command(about = "Answer AI-generated multiple-choice quizzes in the terminal")]
struct Args {
    /// Start straight away with this topic instead of the setup form.
    #[arg(long)]
    topic: Option<String>,
    #[arg(long)]
    difficulty: Option<Difficulty>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(MIN_QUESTIONS as i64..=MAX_QUESTIONS as i64))]
    num_questions: Option<u32>,
    #[arg(long)]
    generator_url: Option<String>,
    #[arg(long)]
    api_key: Option<String>,
    /// Settings file; defaults to ./quiz.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = settings::load_settings(args.config.as_deref())?;
    if let Some(url) = args.generator_url {
        settings.generator_url = url;
    }
    if let Some(key) = args.api_key {
        settings.api_key = Some(key);
    }
    if let Some(difficulty) = args.difficulty {
        settings.default_difficulty = difficulty;
    }
    if let Some(count) = args.num_questions {
        settings.default_num_questions = count;
    }

    let initial = args
        .topic
        .map(|topic| {
            QuizConfig::new(
                topic,
                settings.default_difficulty,
                settings.default_num_questions,
            )
        })
        .transpose()
        .context("invalid quiz options")?;

    let generator = HttpQuestionGenerator::new(
        &settings.generator_url,
        settings.api_key.clone(),
        settings.request_timeout(),
    )?;
    info!(endpoint = %generator.endpoint(), "using question generator");

    let (interrupt_tx, interrupt_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        loop {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "cannot listen for ctrl-c");
                break;
            }
            if interrupt_tx.send(()).is_err() {
                break;
            }
        }
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    app::run(
        Arc::new(generator),
        &settings,
        initial,
        stdin,
        interrupt_rx,
        &mut stdout,
    )
    .await
}
