//! Answer validators.
//!
//! A [`Validator`] pairs a predicate with the message shown when the
//! predicate rejects an answer. Validators are cheap to clone; clones share
//! the same rule, and equality is identity of that rule plus the message.

use std::fmt;
use std::rc::Rc;

use regex::Regex;

use crate::error::ValidationError;

/// Message used when a validator is built without one.
pub const DEFAULT_VALIDATION_MESSAGE: &str = "Your answer is not valid.";

enum Rule {
    MaxLength(usize),
    MinLength(usize),
    Alpha,
    AlphaNumeric,
    Digit,
    Regex(Regex),
    Custom(Box<dyn Fn(&str) -> bool>),
}

impl Rule {
    fn name(&self) -> &'static str {
        match self {
            Rule::MaxLength(_) => "max_length",
            Rule::MinLength(_) => "min_length",
            Rule::Alpha => "alpha",
            Rule::AlphaNumeric => "alphanumeric",
            Rule::Digit => "digit",
            Rule::Regex(_) => "regex",
            Rule::Custom(_) => "custom",
        }
    }

    fn is_valid(&self, value: &str) -> bool {
        match self {
            Rule::MaxLength(max) => value.chars().count() <= *max,
            Rule::MinLength(min) => value.chars().count() >= *min,
            Rule::Alpha => !value.is_empty() && value.chars().all(char::is_alphabetic),
            Rule::AlphaNumeric => !value.is_empty() && value.chars().all(char::is_alphanumeric),
            Rule::Digit => !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()),
            Rule::Regex(re) => re.is_match(value),
            Rule::Custom(predicate) => predicate(value),
        }
    }
}

/// A predicate over an answer plus its failure message.
///
/// # Examples
///
/// ```
/// use quizz_core::Validator;
///
/// let short = Validator::max_length(5).with_message("Too long.");
/// assert!(short.validate("cat").is_ok());
/// assert_eq!(short.validate("giraffe").unwrap_err().message(), "Too long.");
///
/// let year = Validator::regex(r"\d{4}").unwrap();
/// assert!(year.validate("1999 BC").is_ok());
/// assert!(year.validate("in 1999").is_err());
/// ```
#[derive(Clone)]
pub struct Validator {
    rule: Rc<Rule>,
    message: String,
}

impl Validator {
    fn from_rule(rule: Rule) -> Self {
        Self {
            rule: Rc::new(rule),
            message: DEFAULT_VALIDATION_MESSAGE.to_string(),
        }
    }

    /// Accepts answers of at most `max` characters.
    pub fn max_length(max: usize) -> Self {
        Self::from_rule(Rule::MaxLength(max))
    }

    /// Accepts answers of at least `min` characters.
    pub fn min_length(min: usize) -> Self {
        Self::from_rule(Rule::MinLength(min))
    }

    /// Accepts non-empty answers made of alphabetic characters.
    pub fn alpha() -> Self {
        Self::from_rule(Rule::Alpha)
    }

    /// Accepts non-empty answers made of alphanumeric characters.
    pub fn alphanumeric() -> Self {
        Self::from_rule(Rule::AlphaNumeric)
    }

    /// Accepts non-empty answers made of ASCII digits.
    pub fn digit() -> Self {
        Self::from_rule(Rule::Digit)
    }

    /// Accepts answers whose beginning matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns the [`regex::Error`] if `pattern` does not compile.
    pub fn regex(pattern: &str) -> std::result::Result<Self, regex::Error> {
        let anchored = Regex::new(&format!("^(?:{pattern})"))?;
        Ok(Self::from_rule(Rule::Regex(anchored)))
    }

    /// Accepts answers for which `predicate` returns `true`.
    pub fn custom(predicate: impl Fn(&str) -> bool + 'static) -> Self {
        Self::from_rule(Rule::Custom(Box::new(predicate)))
    }

    /// Replaces the failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Returns the failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the rule name (`max_length`, `alpha`, `regex`, `custom`, ...).
    pub fn name(&self) -> &'static str {
        self.rule.name()
    }

    /// Returns `true` if `value` satisfies the rule.
    pub fn is_valid(&self, value: &str) -> bool {
        self.rule.is_valid(value)
    }

    /// Checks `value`, failing with this validator's message.
    pub fn validate(&self, value: &str) -> std::result::Result<(), ValidationError> {
        if self.is_valid(value) {
            Ok(())
        } else {
            Err(ValidationError::new(self.message.clone()))
        }
    }
}

impl PartialEq for Validator {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.rule, &other.rule) && self.message == other.message
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("rule", &self.rule.name())
            .field("message", &self.message)
            .finish()
    }
}
