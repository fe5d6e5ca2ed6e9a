use shared::domain::{QuizConfig, QuizPhase, QuizQuestion};
use tracing::{debug, info, warn};

pub mod error;
pub mod generator;
pub mod review;
mod session;

pub use error::{GenerationError, SessionStateError, StartError};
pub use generator::{HttpQuestionGenerator, QuestionGenerator};
pub use review::{Feedback, Progress, QuestionReview, Score};
pub use session::Session;

/// Identifies one generation request. Only the ticket issued by the most
/// recent [`QuizController::begin_start`] can complete a start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub token: u64,
    pub config: QuizConfig,
}

/// Everything that can change a session, whether it came from the user or
/// from the finished generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SelectAnswer(usize),
    Advance,
    Retreat,
    Submit,
    Restart,
    GenerationFinished {
        ticket: RequestTicket,
        result: Result<Vec<QuizQuestion>, GenerationError>,
    },
}

/// Owns the session plus the bookkeeping around the single in-flight
/// generation request.
#[derive(Debug, Default)]
pub struct QuizController {
    session: Session,
    loading: bool,
    request_token: u64,
    last_error: Option<String>,
}

impl QuizController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> QuizPhase {
        self.session.phase()
    }

    /// True while a generation request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// User-visible message for the most recent failed start.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Validates `config` and issues a ticket for a new generation request.
    ///
    /// Returns `Ok(None)` when a request is already in flight or the session
    /// has left the setup phase; the call is ignored in both cases.
    pub fn begin_start(
        &mut self,
        config: QuizConfig,
    ) -> Result<Option<RequestTicket>, shared::error::ConfigValidationError> {
        config.validate()?;
        if self.loading {
            debug!(token = self.request_token, "start ignored, request already in flight");
            return Ok(None);
        }
        if self.session.phase() != QuizPhase::Setup {
            debug!(phase = ?self.session.phase(), "start ignored outside setup phase");
            return Ok(None);
        }

        self.request_token += 1;
        self.loading = true;
        self.last_error = None;
        info!(
            token = self.request_token,
            topic = %config.topic,
            difficulty = %config.difficulty,
            num_questions = config.num_questions,
            "requesting quiz questions"
        );
        Ok(Some(RequestTicket {
            token: self.request_token,
            config,
        }))
    }

    /// Applies the outcome of the request identified by `ticket`.
    ///
    /// Returns `Ok(true)` when the quiz started, `Ok(false)` when the ticket
    /// was stale and the result discarded, and the error when the current
    /// request failed. Failures leave the session in setup untouched.
    pub fn complete_start(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<QuizQuestion>, GenerationError>,
    ) -> Result<bool, GenerationError> {
        if !self.loading || ticket.token != self.request_token {
            debug!(
                token = ticket.token,
                current = self.request_token,
                "discarding stale generation result"
            );
            return Ok(false);
        }
        self.loading = false;

        match result.and_then(generator::validate_questions) {
            Ok(questions) => {
                let count = questions.len();
                if !self.session.load(questions) {
                    return Err(self.fail(GenerationError::Empty));
                }
                info!(token = ticket.token, count, "quiz started");
                Ok(true)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Runs a whole start against `generator`. See [`Self::complete_start`]
    /// for the meaning of the returned flag.
    pub async fn start<G>(&mut self, generator: &G, config: QuizConfig) -> Result<bool, StartError>
    where
        G: QuestionGenerator + ?Sized,
    {
        let Some(ticket) = self.begin_start(config)? else {
            return Ok(false);
        };
        let result = generator.generate(&ticket.config).await;
        Ok(self.complete_start(ticket, result)?)
    }

    pub fn select_answer(&mut self, option: usize) -> bool {
        self.session.select_answer(option)
    }

    pub fn advance(&mut self) {
        self.session.advance();
    }

    pub fn retreat(&mut self) {
        self.session.retreat();
    }

    pub fn submit(&mut self) -> bool {
        if !self.session.submit() {
            return false;
        }
        let score = self.session.score();
        info!(
            correct = score.correct,
            total = score.total,
            percentage = score.percentage,
            "quiz submitted"
        );
        true
    }

    /// Back to an empty setup session. Any outstanding request is orphaned:
    /// its result will no longer match the current token.
    pub fn restart(&mut self) {
        self.session.restart();
        self.request_token += 1;
        self.loading = false;
        self.last_error = None;
        debug!(token = self.request_token, "session restarted");
    }

    /// Single entry point for user input and async completions alike.
    ///
    /// Returns `Ok(false)` when the event was ignored: an answer outside the
    /// quiz, a submit outside the quiz, or a stale generation result.
    pub fn apply(&mut self, event: SessionEvent) -> Result<bool, GenerationError> {
        let applied = match event {
            SessionEvent::SelectAnswer(option) => self.select_answer(option),
            SessionEvent::Advance => {
                self.advance();
                true
            }
            SessionEvent::Retreat => {
                self.retreat();
                true
            }
            SessionEvent::Submit => self.submit(),
            SessionEvent::Restart => {
                self.restart();
                true
            }
            SessionEvent::GenerationFinished { ticket, result } => {
                self.complete_start(ticket, result)?
            }
        };
        Ok(applied)
    }

    fn fail(&mut self, err: GenerationError) -> GenerationError {
        warn!(error = %err, "quiz generation failed");
        self.last_error = Some(err.user_message());
        err
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
