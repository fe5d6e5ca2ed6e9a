//! Event loop tying terminal input and the generation task to the controller.

use std::{io::Write, sync::Arc};

use anyhow::{Context, Result};
use quiz_core::{QuestionGenerator, QuizController, SessionEvent};
use shared::domain::{QuizConfig, QuizPhase};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
};
use tracing::debug;

use crate::{
    input::{gate, parse_command, Gate},
    settings::Settings,
    setup::SetupForm,
    views,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Reads input a line at a time, replacing invalid UTF-8 instead of failing.
///
/// Partially read bytes stay in `buf`, so a read dropped by `select!` resumes
/// where it left off.
struct LineReader<R> {
    input: R,
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    fn new(input: R) -> Self {
        Self {
            input,
            buf: Vec::new(),
        }
    }

    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        let read = self.input.read_until(b'\n', &mut self.buf).await?;
        if read == 0 && self.buf.is_empty() {
            return Ok(None);
        }
        let raw = std::mem::take(&mut self.buf);
        let line = String::from_utf8_lossy(&raw);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

struct App<'a, W: Write> {
    controller: QuizController,
    form: SetupForm,
    generator: Arc<dyn QuestionGenerator>,
    events_tx: UnboundedSender<SessionEvent>,
    out: &'a mut W,
}

/// Runs the quiz until the user quits or `input` ends.
///
/// Input is not read while a generation request is in flight. A message on
/// `interrupts` during that time abandons the request and returns to the
/// setup form; at any other time it quits.
pub async fn run<R, W>(
    generator: Arc<dyn QuestionGenerator>,
    settings: &Settings,
    initial: Option<QuizConfig>,
    input: R,
    mut interrupts: UnboundedReceiver<()>,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut app = App {
        controller: QuizController::new(),
        form: SetupForm::new(settings.default_difficulty, settings.default_num_questions),
        generator,
        events_tx,
        out,
    };
    let mut lines = LineReader::new(input);

    writeln!(app.out, "{}", views::render_banner())?;
    match initial {
        Some(config) => {
            app.form.remember(&config);
            app.start(config)?;
        }
        None => app.prompt_setup()?,
    }
    app.out.flush()?;

    loop {
        tokio::select! {
            biased;
            Some(event) = events_rx.recv() => {
                app.on_generation_finished(event)?;
            }
            Some(()) = interrupts.recv() => {
                if !app.controller.is_loading() {
                    break;
                }
                app.controller.restart();
                writeln!(app.out, "\nGeneration cancelled.")?;
                app.prompt_setup()?;
            }
            line = lines.next_line(), if !app.controller.is_loading() => {
                let Some(line) = line.context("failed to read input")? else {
                    break;
                };
                if app.on_line(&line)? == Flow::Quit {
                    break;
                }
            }
        }
        app.out.flush()?;
    }

    writeln!(app.out)?;
    app.out.flush()?;
    Ok(())
}

impl<W: Write> App<'_, W> {
    fn prompt_setup(&mut self) -> Result<()> {
        write!(self.out, "{}", self.form.prompt())?;
        Ok(())
    }

    fn start(&mut self, config: QuizConfig) -> Result<()> {
        let ticket = match self.controller.begin_start(config) {
            Ok(Some(ticket)) => ticket,
            Ok(None) => {
                debug!("start request ignored");
                return Ok(());
            }
            Err(err) => {
                writeln!(self.out, "{}", views::render_error(&format!("{err}.")))?;
                return self.prompt_setup();
            }
        };

        writeln!(self.out, "{}", views::render_loading(&ticket.config))?;
        let generator = Arc::clone(&self.generator);
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = generator.generate(&ticket.config).await;
            if events_tx
                .send(SessionEvent::GenerationFinished { ticket, result })
                .is_err()
            {
                debug!("event loop gone before generation finished");
            }
        });
        Ok(())
    }

    fn on_generation_finished(&mut self, event: SessionEvent) -> Result<()> {
        match self.controller.apply(event) {
            Ok(true) => self.render_session(),
            Ok(false) => Ok(()),
            Err(err) => {
                writeln!(self.out, "{}", views::render_error(&err.user_message()))?;
                self.prompt_setup()
            }
        }
    }

    fn on_line(&mut self, line: &str) -> Result<Flow> {
        if self.controller.phase() == QuizPhase::Setup {
            match self.form.accept(line) {
                Ok(Some(config)) => self.start(config)?,
                Ok(None) => self.prompt_setup()?,
                Err(message) => {
                    writeln!(self.out, "{message}")?;
                    self.prompt_setup()?;
                }
            }
            return Ok(Flow::Continue);
        }

        let Some(command) = parse_command(line) else {
            writeln!(self.out, "Unknown command '{}'. {}", line.trim(), views::render_help())?;
            return Ok(Flow::Continue);
        };

        match gate(command, self.controller.session()) {
            Gate::Quit => return Ok(Flow::Quit),
            Gate::Help => writeln!(self.out, "{}", views::render_help())?,
            Gate::Blocked(reason) => writeln!(self.out, "{reason}")?,
            Gate::Dispatch(event) => {
                self.controller.apply(event)?;
                self.render_session()?;
            }
        }
        Ok(Flow::Continue)
    }

    fn render_session(&mut self) -> Result<()> {
        match self.controller.phase() {
            QuizPhase::Setup => {
                writeln!(self.out)?;
                self.prompt_setup()
            }
            QuizPhase::Quiz => {
                writeln!(self.out, "{}", views::render_question(self.controller.session()))?;
                Ok(())
            }
            QuizPhase::Results => {
                writeln!(self.out, "{}", views::render_results(self.controller.session()))?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
