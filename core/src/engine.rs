//! The ask engine.
//!
//! [`present`] shows one question once and returns the control signal of
//! that presentation. Drivers loop over it and apply the signal with
//! [`transition`], so retries and navigation never recurse.

use tracing::{debug, trace};

use crate::command::{CommandContext, JumpTarget, Signal};
use crate::console::Console;
use crate::error::{QuizError, Result};
use crate::option::Answer;
use crate::question::Question;
use crate::quiz::QuizState;

const REQUIRED_MESSAGE: &str = "This question is required.";

/// How an ask chain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskOutcome {
    /// The question was answered (or left unanswered when optional).
    Resolved,
    /// A command stopped the chain, e.g. `finish`.
    Break,
    /// The respondent quit; the console was asked to exit with status 0.
    Quit,
}

/// What the driver does after a presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Stay,
    Goto(usize),
    End(AskOutcome),
}

/// Splits `<delimiter><expression> [args...]`.
///
/// Whitespace after the delimiter is allowed, so `"! help"` runs `help`.
fn parse_command<'s>(input: &'s str, delimiter: &str) -> Option<(&'s str, Vec<&'s str>)> {
    if delimiter.is_empty() || input.chars().count() < 2 {
        return None;
    }
    let mut words = input.strip_prefix(delimiter)?.split_whitespace();
    let expression = words.next()?;
    Some((expression, words.collect()))
}

/// Presents `questions[current]` once.
///
/// `quiz` is `None` for a standalone question, in which case `questions`
/// holds only that question.
pub(crate) fn present(
    questions: &mut [Question],
    current: usize,
    quiz: Option<&QuizState>,
    console: &mut dyn Console,
) -> Result<Option<Signal>> {
    let total = questions.len();
    let question = &mut questions[current];
    question.attempt += 1;
    question.run_pre_ask();
    debug!(prompt = %question.prompt, attempt = question.attempt, "Presenting question");

    let position = quiz.map(|_| (current, total));
    let input = console.read_line(&question.render_prompt(position))?;
    let stripped = input.trim();

    if let Some((expression, args)) = parse_command(stripped, &question.command_delimiter) {
        if question.commands.is_empty() {
            console.write_line("Commands are disabled for this question.");
            return Ok(Some(Signal::Continue));
        }
        let Some(command) = question
            .commands
            .iter()
            .find(|c| c.expression() == expression)
            .cloned()
        else {
            console.write_line(&format!("Command not found: {expression}"));
            return Ok(Some(Signal::Continue));
        };

        debug!(command = expression, ?args, "Running command");
        let mut ctx = CommandContext::new(questions, current, quiz, console);
        return command.execute(&mut ctx, &args);
    }

    let answer = if question.options.is_empty() {
        let text = if question.strip { stripped } else { input.as_str() };
        if let Err(err) = question.validate(text) {
            console.write_line(err.message());
            return Ok(Some(Signal::Continue));
        }
        (!text.is_empty()).then(|| Answer::Text(text.to_string()))
    } else {
        match question.match_option(stripped) {
            Ok(option) => Some(Answer::Option(option)),
            Err(err) => {
                console.write_line(err.message());
                return Ok(Some(Signal::Continue));
            }
        }
    };

    if let Some(answer) = answer {
        trace!(answer = %answer, "Answer accepted");
        question.answer = Some(answer);
    }
    question.run_post_answer();
    Ok(None)
}

/// Applies the signal of a presentation.
///
/// `total` is `None` for a standalone question.
pub(crate) fn transition(
    signal: Option<Signal>,
    question: &Question,
    current: usize,
    total: Option<usize>,
    console: &mut dyn Console,
) -> Result<Step> {
    let step = match signal {
        Some(Signal::Continue) => Step::Stay,
        Some(Signal::Break) => Step::End(AskOutcome::Break),
        Some(Signal::Quit) => {
            console.exit(0);
            Step::End(AskOutcome::Quit)
        }
        Some(Signal::Jump(target)) => {
            let total = total.ok_or_else(|| QuizError::MissingQuiz("jump".to_string()))?;
            Step::Goto(resolve_jump(target, current, total))
        }
        None if question.required && !question.has_answer() => {
            console.write_line(REQUIRED_MESSAGE);
            Step::Stay
        }
        None => match total {
            Some(total) => Step::Goto(wrap(current + 1, total)),
            None => Step::End(AskOutcome::Resolved),
        },
    };
    Ok(step)
}

fn wrap(index: usize, total: usize) -> usize {
    if index < total { index } else { 0 }
}

fn resolve_jump(target: JumpTarget, current: usize, total: usize) -> usize {
    match target {
        JumpTarget::Index(index) => wrap(index, total),
        JumpTarget::Next => wrap(current + 1, total),
        // Moving back from the first question is out of range as well.
        JumpTarget::Previous => current.checked_sub(1).map_or(0, |i| wrap(i, total)),
    }
}

/// Drives a standalone question until it resolves.
pub(crate) fn ask_standalone(question: &mut Question, console: &mut dyn Console) -> Result<AskOutcome> {
    let questions = std::slice::from_mut(question);
    loop {
        let signal = present(questions, 0, None, console)?;
        match transition(signal, &questions[0], 0, None, console)? {
            Step::Stay => continue,
            Step::End(outcome) => return Ok(outcome),
            Step::Goto(_) => return Ok(AskOutcome::Resolved),
        }
    }
}
