//! Text renderings of the setup, question and results views.

use quiz_core::{QuestionReview, Session};
use shared::domain::QuizConfig;

const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

fn letter(index: usize) -> char {
    OPTION_LETTERS.get(index).copied().unwrap_or('?')
}

pub fn render_banner() -> String {
    "AI Quiz Generator\nTest your knowledge on any topic with AI-generated questions\n".into()
}

pub fn render_loading(config: &QuizConfig) -> String {
    format!(
        "Generating {} {} question(s) about \"{}\"...",
        config.num_questions, config.difficulty, config.topic
    )
}

pub fn render_error(message: &str) -> String {
    format!("Error: {message}")
}

pub fn render_help() -> String {
    "Commands: a-d or 1-4 select an answer, n next, p previous, s submit, r restart, q quit"
        .into()
}

/// Current question with its options and the actions the gates allow.
pub fn render_question(session: &Session) -> String {
    let (Some(question), Some(progress)) = (session.current_question(), session.progress())
    else {
        return String::new();
    };
    let selected = session.current_answer();

    let mut out = format!(
        "\nQuestion {} of {}  ({}%)\n{}\n\n",
        progress.position, progress.total, progress.percentage, question.question
    );
    for (i, option) in question.options.iter().enumerate() {
        let mark = if selected == Some(i) { 'x' } else { ' ' };
        out.push_str(&format!("  [{mark}] {}. {option}\n", letter(i)));
    }

    let mut actions = vec!["[a-d] answer"];
    if session.can_retreat() {
        actions.push("[p] previous");
    }
    if session.can_advance() {
        actions.push("[n] next");
    }
    if session.can_submit() {
        actions.push("[s] submit");
    }
    actions.push("[q] quit");
    out.push('\n');
    out.push_str(&actions.join("  "));
    out
}

fn describe_choice(review: &QuestionReview, choice: Option<usize>) -> String {
    match choice.and_then(|i| review.options.get(i).map(|text| (i, text))) {
        Some((i, text)) => format!("{}. {text}", letter(i)),
        None => "(no answer)".into(),
    }
}

/// Score summary followed by a per-question breakdown.
pub fn render_results(session: &Session) -> String {
    let score = session.score();
    let mut out = format!(
        "\nQuiz Complete!\n{}\nScore: {}/{}   {}%\n\n",
        score.feedback().message(),
        score.correct,
        score.total,
        score.percentage
    );

    for review in session.review() {
        let mark = if review.is_correct { '✓' } else { '✗' };
        out.push_str(&format!("{mark} {}. {}\n", review.index + 1, review.question));
        out.push_str(&format!(
            "    Your answer:    {}\n",
            describe_choice(&review, review.selected)
        ));
        if !review.is_correct {
            out.push_str(&format!(
                "    Correct answer: {}\n",
                describe_choice(&review, Some(review.correct_answer))
            ));
        }
        if !review.explanation.trim().is_empty() {
            out.push_str(&format!("    {}\n", review.explanation.trim()));
        }
    }

    out.push_str("\n[r] try another quiz  [q] quit");
    out
}
