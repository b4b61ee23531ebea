//! Selectable answer options and stored answers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A selectable answer: a short `value` the respondent types and a
/// human-readable `expression`.
///
/// # Examples
///
/// ```
/// use quizz_core::AnswerOption;
///
/// let cat = AnswerOption::new("A", "Cat");
/// assert_eq!(cat.render(") "), "A) Cat");
/// assert_eq!(cat, AnswerOption::new("A", "Cat"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Token matched against the respondent's input.
    pub value: String,
    /// Label shown next to the value.
    pub expression: String,
}

impl AnswerOption {
    /// Creates an option from a value and its label.
    pub fn new(value: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expression: expression.into(),
        }
    }

    /// Renders `value + indicator + expression`.
    pub fn render(&self, indicator: &str) -> String {
        format!("{}{}{}", self.value, indicator, self.expression)
    }
}

/// The answer stored on a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Free-form text accepted by the validators.
    Text(String),
    /// An option selected by its value.
    Option(AnswerOption),
}

impl Answer {
    /// Returns the token compared against correct answers: the text itself,
    /// or the selected option's value.
    pub fn token(&self) -> &str {
        match self {
            Answer::Text(text) => text,
            Answer::Option(option) => &option.value,
        }
    }

    /// Returns the selected option, if this answer is one.
    pub fn as_option(&self) -> Option<&AnswerOption> {
        match self {
            Answer::Option(option) => Some(option),
            Answer::Text(_) => None,
        }
    }

    /// Renders the answer for display, options as `value + indicator + expression`.
    pub fn render(&self, indicator: &str) -> String {
        match self {
            Answer::Text(text) => text.clone(),
            Answer::Option(option) => option.render(indicator),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Text(text) => f.write_str(text),
            Answer::Option(option) => write!(f, "{}", option.value),
        }
    }
}
