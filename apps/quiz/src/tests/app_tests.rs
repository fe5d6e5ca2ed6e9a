use super::*;
use async_trait::async_trait;
use quiz_core::GenerationError;
use shared::domain::{Difficulty, QuizQuestion};
use std::collections::VecDeque;
use tokio::sync::{Mutex, Notify};

struct ScriptedGenerator {
    results: Mutex<VecDeque<Result<Vec<QuizQuestion>, GenerationError>>>,
    seen: Mutex<Vec<QuizConfig>>,
}

impl ScriptedGenerator {
    fn new(results: Vec<Result<Vec<QuizQuestion>, GenerationError>>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results.into()),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl QuestionGenerator for ScriptedGenerator {
    async fn generate(&self, config: &QuizConfig) -> Result<Vec<QuizQuestion>, GenerationError> {
        self.seen.lock().await.push(config.clone());
        self.results
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(GenerationError::Empty))
    }
}

fn question(text: &str, correct_answer: usize) -> QuizQuestion {
    QuizQuestion {
        question: text.to_string(),
        options: ["Pacific", "Atlantic", "Indian", "Arctic"]
            .map(String::from)
            .to_vec(),
        correct_answer,
        explanation: format!("{text} explained."),
    }
}

fn oceans() -> Vec<QuizQuestion> {
    vec![
        question("Largest ocean?", 0),
        question("Ocean between Africa and Australia?", 2),
        question("Smallest ocean?", 3),
    ]
}

async fn run_script(
    generator: Arc<ScriptedGenerator>,
    initial: Option<QuizConfig>,
    script: &str,
) -> String {
    run_bytes(generator, initial, script.as_bytes(), 0).await
}

async fn run_bytes(
    generator: Arc<dyn QuestionGenerator>,
    initial: Option<QuizConfig>,
    script: &[u8],
    interrupts: usize,
) -> String {
    let (interrupt_tx, interrupt_rx) = mpsc::unbounded_channel();
    for _ in 0..interrupts {
        interrupt_tx.send(()).expect("queue interrupt");
    }
    drop(interrupt_tx);

    let mut out = Vec::new();
    run(
        generator,
        &Settings::default(),
        initial,
        script,
        interrupt_rx,
        &mut out,
    )
    .await
    .expect("run");
    String::from_utf8(out).expect("utf8")
}

/// Holds any "Oceans" request until a request for another topic arrives.
struct HeldGenerator {
    calls: Mutex<usize>,
    release: Notify,
}

#[async_trait]
impl QuestionGenerator for HeldGenerator {
    async fn generate(&self, config: &QuizConfig) -> Result<Vec<QuizQuestion>, GenerationError> {
        *self.calls.lock().await += 1;
        if config.topic == "Oceans" {
            self.release.notified().await;
            Ok(vec![question("Stale question?", 0)])
        } else {
            self.release.notify_one();
            Ok(vec![question("Fresh question?", 1)])
        }
    }
}

#[tokio::test]
async fn full_quiz_from_setup_form_to_results() {
    let generator = ScriptedGenerator::new(vec![Ok(oceans())]);
    let output = run_script(
        generator.clone(),
        None,
        "Oceans\neasy\n3\na\nn\nc\nn\nb\ns\nq\n",
    )
    .await;

    assert_eq!(
        generator.seen.lock().await.as_slice(),
        &[QuizConfig::new("Oceans", Difficulty::Easy, 3).expect("valid")]
    );
    assert!(output.contains("Generating 3 easy question(s) about \"Oceans\""));
    assert!(output.contains("Question 1 of 3  (33%)"));
    assert!(output.contains("Question 3 of 3  (100%)"));
    assert!(output.contains("Quiz Complete!"));
    assert!(output.contains("Score: 2/3   67%"));
    assert!(output.contains("Good effort!"));
    assert!(output.contains("✗ 3. Smallest ocean?"));
    assert!(output.contains("Correct answer: D. Arctic"));
}

#[tokio::test]
async fn next_is_refused_until_answered() {
    let generator = ScriptedGenerator::new(vec![Ok(oceans())]);
    let output = run_script(generator, None, "Oceans\n\n\nn\nq\n").await;

    assert!(output.contains("Select an answer before moving on."));
    assert!(!output.contains("Question 2 of 3"));
}

#[tokio::test]
async fn failed_generation_returns_to_setup_and_retry_succeeds() {
    let generator = ScriptedGenerator::new(vec![
        Err(GenerationError::Service("AI credits exhausted".to_string())),
        Ok(vec![question("Largest ocean?", 0)]),
    ]);
    let output = run_script(generator.clone(), None, "Oceans\nhard\n1\n\n\n\na\ns\nq\n").await;

    assert!(output.contains("Error: AI credits exhausted"));
    assert!(output.contains("Quiz topic [Oceans]: "));
    assert_eq!(generator.seen.lock().await.len(), 2);
    assert!(output.contains("Score: 1/1   100%"));
    assert!(output.contains("Outstanding!"));
}

#[tokio::test]
async fn initial_config_skips_the_form_and_restart_returns_to_it() {
    let generator = ScriptedGenerator::new(vec![Ok(oceans())]);
    let config = QuizConfig::new("Oceans", Difficulty::Medium, 3).expect("valid");
    let output = run_script(generator, Some(config), "b\nr\n").await;

    assert!(output.contains("Question 1 of 3"));
    assert!(output.contains("[x] B. Atlantic"));
    assert!(output.contains("Quiz topic [Oceans]: "));
}

#[tokio::test]
async fn results_view_only_accepts_restart_or_quit() {
    let generator = ScriptedGenerator::new(vec![Ok(vec![question("Largest ocean?", 0)])]);
    let output = run_script(generator, None, "Oceans\n\n1\nd\ns\nn\nq\n").await;

    assert!(output.contains("Score: 0/1   0%"));
    assert!(output.contains("Keep practicing!"));
    assert!(output.contains("Quiz complete. Press 'r' to start over or 'q' to quit."));
}

#[tokio::test]
async fn input_ending_during_setup_exits_cleanly() {
    let generator = ScriptedGenerator::new(Vec::new());
    let output = run_script(generator.clone(), None, "Oceans\n").await;

    assert!(output.contains("Difficulty (easy/medium/hard) [medium]: "));
    assert!(generator.seen.lock().await.is_empty());
}

#[tokio::test]
async fn unknown_commands_show_help() {
    let generator = ScriptedGenerator::new(vec![Ok(oceans())]);
    let output = run_script(generator, None, "Oceans\n\n\nzz\nq\n").await;

    assert!(output.contains("Unknown command 'zz'."));
    assert!(output.contains("Commands: a-d or 1-4"));
}

#[tokio::test]
async fn invalid_utf8_line_is_treated_as_unknown_command() {
    let generator = ScriptedGenerator::new(vec![Ok(oceans())]);
    let output = run_bytes(generator, None, b"Oceans\n\n\n\xff\xfe\na\nq\n", 0).await;

    assert!(output.contains("Unknown command '\u{FFFD}\u{FFFD}'."));
    assert!(output.contains("[x] A. Pacific"));
}

#[tokio::test]
async fn interrupt_while_loading_cancels_and_drops_the_late_result() {
    let generator = Arc::new(HeldGenerator {
        calls: Mutex::new(0),
        release: Notify::new(),
    });
    let config = QuizConfig::new("Oceans", Difficulty::Easy, 1).expect("valid");
    let output = run_bytes(generator.clone(), Some(config), b"Rivers\n\n\nb\nq\n", 1).await;

    assert!(output.contains("Generation cancelled."));
    assert!(output.contains("Quiz topic [Oceans]: "));
    assert!(output.contains("Fresh question?"));
    assert!(output.contains("[x] B. Atlantic"));
    assert!(!output.contains("Stale question?"));
    assert_eq!(*generator.calls.lock().await, 2);
}

#[tokio::test]
async fn interrupt_outside_loading_quits() {
    let generator = ScriptedGenerator::new(Vec::new());
    let output = run_bytes(generator.clone(), None, b"Oceans\n", 1).await;

    assert!(!output.contains("Difficulty"));
    assert!(generator.seen.lock().await.is_empty());
}
