//! Error types for question and quiz operations.
//!
//! Configuration faults (bad prompts, unresolvable option styles, commands
//! used outside their context) and console I/O failures surface as
//! [`QuizError`]. Rejected answers are [`ValidationError`]s: they are shown
//! to the respondent and turned into a retry, never returned to the caller.

use thiserror::Error;

use crate::choice::BUILTIN_STYLES;

/// Errors that can occur while configuring or running questions.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A question was given an empty prompt.
    #[error("A question should at least define a prompt.")]
    EmptyPrompt,

    /// A multiple choice question resolved to zero options.
    #[error(
        "MultipleChoiceQuestion should at least have one member in 'options' or 'choices' attributes."
    )]
    NoOptions,

    /// Neither a built-in style name nor a style iterator was usable.
    #[error("Unknown style '{0}' or invalid style iterator. Built-in styles are: ({styles})", styles = BUILTIN_STYLES.join(", "))]
    UnknownStyle(String),

    /// A display mode name has no renderer.
    #[error("There is no such display '{0}'. Built-in displays are: (vertical, horizontal, hidden)")]
    UnknownDisplay(String),

    /// A command that navigates or inspects a quiz ran on a standalone question.
    #[error("command '{0}' can only be used on a question that belongs to a quiz")]
    MissingQuiz(String),

    /// A quiz with no questions was started.
    #[error("quiz has no questions")]
    EmptyQuiz,

    /// Console read failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Raised by a validator or option lookup to reject an answer.
///
/// The message is written to the console verbatim before the question is
/// asked again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Creates a validation error carrying the message shown to the respondent.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message shown to the respondent.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Convenience alias for results with [`QuizError`].
pub type Result<T> = std::result::Result<T, QuizError>;
