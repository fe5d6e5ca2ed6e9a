//! Keyboard commands for the question and results views, and the gates that
//! decide whether a command reaches the controller.

use quiz_core::{Session, SessionEvent};
use shared::domain::{QuizPhase, OPTION_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select(usize),
    Next,
    Prev,
    Submit,
    Restart,
    Quit,
    Help,
}

pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim().to_ascii_lowercase();
    let command = match line.as_str() {
        "n" | "next" => Command::Next,
        "p" | "prev" | "previous" => Command::Prev,
        "s" | "submit" => Command::Submit,
        "r" | "restart" => Command::Restart,
        "q" | "quit" | "exit" => Command::Quit,
        "h" | "?" | "help" => Command::Help,
        other => return parse_option(other).map(Command::Select),
    };
    Some(command)
}

/// Accepts a letter `a`..`d` or a number `1`..`4`.
fn parse_option(raw: &str) -> Option<usize> {
    let mut chars = raw.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    let index = match c {
        'a'..='z' => c as usize - 'a' as usize,
        '1'..='9' => c as usize - '1' as usize,
        _ => return None,
    };
    (index < OPTION_COUNT).then_some(index)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Dispatch(SessionEvent),
    Blocked(&'static str),
    Help,
    Quit,
}

/// Applies the navigation policy: forward movement and submission need an
/// answer on the current question.
pub fn gate(command: Command, session: &Session) -> Gate {
    match (command, session.phase()) {
        (Command::Quit, _) => Gate::Quit,
        (Command::Help, _) => Gate::Help,
        (Command::Restart, _) => Gate::Dispatch(SessionEvent::Restart),
        (_, QuizPhase::Results) => {
            Gate::Blocked("Quiz complete. Press 'r' to start over or 'q' to quit.")
        }
        (_, QuizPhase::Setup) => Gate::Blocked("No quiz in progress."),
        (Command::Select(option), QuizPhase::Quiz) => {
            Gate::Dispatch(SessionEvent::SelectAnswer(option))
        }
        (Command::Next, QuizPhase::Quiz) if session.can_advance() => {
            Gate::Dispatch(SessionEvent::Advance)
        }
        (Command::Next, QuizPhase::Quiz) if session.is_last() => {
            Gate::Blocked("This is the last question; press 's' to submit.")
        }
        (Command::Next, QuizPhase::Quiz) => Gate::Blocked("Select an answer before moving on."),
        (Command::Prev, QuizPhase::Quiz) if session.can_retreat() => {
            Gate::Dispatch(SessionEvent::Retreat)
        }
        (Command::Prev, QuizPhase::Quiz) => Gate::Blocked("Already at the first question."),
        (Command::Submit, QuizPhase::Quiz) if session.can_submit() => {
            Gate::Dispatch(SessionEvent::Submit)
        }
        (Command::Submit, QuizPhase::Quiz) if !session.is_last() => {
            Gate::Blocked("Submit is available on the last question.")
        }
        (Command::Submit, QuizPhase::Quiz) => Gate::Blocked("Select an answer before submitting."),
    }
}
