//! Schemes: sparse configuration templates merged onto questions.
//!
//! Every [`Scheme`] field is optional and `None` means "no effect". How a
//! set field lands on a question depends on its [`MergeStrategy`]:
//!
//! - lists are extended, the question's own entries first;
//! - maps are merged, keys already on the question win;
//! - everything else is replaced outright (an explicit empty string
//!   included).
//!
//! The strategy of each field is fixed by [`SchemeField::strategy`].
//! Merging walks [`Scheme::fields_set`] in [`SchemeField::ALL`] order and
//! applies each field by its strategy.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use quizz_core::{Command, Question, Scheme};
//!
//! let scheme = Rc::new(Scheme {
//!     suffix: Some(" (be honest)".into()),
//!     commands: Some(vec![Command::Skip]),
//!     ..Default::default()
//! });
//!
//! let mut question = Question::new("How old are you?").unwrap().with_command(Command::help());
//! question.update_scheme(&scheme, false).unwrap();
//!
//! assert_eq!(question.suffix, " (be honest)");
//! assert_eq!(question.commands, vec![Command::help(), Command::Skip]);
//! ```

use std::collections::BTreeMap;

use serde_json::Value;

use crate::choice::{DisplayMode, StyleIterator};
use crate::command::Command;
use crate::option::AnswerOption;
use crate::validator::Validator;

/// How a scheme field is combined with the question's current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Scheme value replaces the question's value.
    Replace,
    /// Scheme entries are appended after the question's entries.
    Extend,
    /// Scheme keys are added; keys already on the question are kept.
    MergeKeepTarget,
}

/// A configurable field of a question, as addressed by a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemeField {
    Prompt,
    Validators,
    Options,
    Commands,
    CorrectAnswers,
    Extra,
    Required,
    Strip,
    AppendColumn,
    Suffix,
    Prefix,
    CommandDelimiter,
    OptionIndicator,
    Choices,
    Display,
    Style,
    StyleIterator,
}

impl SchemeField {
    /// Every field, in merge order.
    pub const ALL: [SchemeField; 17] = [
        SchemeField::Prompt,
        SchemeField::Validators,
        SchemeField::Options,
        SchemeField::Commands,
        SchemeField::CorrectAnswers,
        SchemeField::Extra,
        SchemeField::Required,
        SchemeField::Strip,
        SchemeField::AppendColumn,
        SchemeField::Suffix,
        SchemeField::Prefix,
        SchemeField::CommandDelimiter,
        SchemeField::OptionIndicator,
        SchemeField::Choices,
        SchemeField::Display,
        SchemeField::Style,
        SchemeField::StyleIterator,
    ];

    /// Returns the snake_case field name.
    pub fn name(self) -> &'static str {
        match self {
            SchemeField::Prompt => "prompt",
            SchemeField::Validators => "validators",
            SchemeField::Options => "options",
            SchemeField::Commands => "commands",
            SchemeField::CorrectAnswers => "correct_answers",
            SchemeField::Extra => "extra",
            SchemeField::Required => "required",
            SchemeField::Strip => "strip",
            SchemeField::AppendColumn => "append_column",
            SchemeField::Suffix => "suffix",
            SchemeField::Prefix => "prefix",
            SchemeField::CommandDelimiter => "command_delimiter",
            SchemeField::OptionIndicator => "option_indicator",
            SchemeField::Choices => "choices",
            SchemeField::Display => "display",
            SchemeField::Style => "style",
            SchemeField::StyleIterator => "style_iterator",
        }
    }

    /// Returns the merge strategy for this field.
    pub fn strategy(self) -> MergeStrategy {
        match self {
            SchemeField::Validators
            | SchemeField::Options
            | SchemeField::Commands
            | SchemeField::CorrectAnswers
            | SchemeField::Choices => MergeStrategy::Extend,
            SchemeField::Extra => MergeStrategy::MergeKeepTarget,
            _ => MergeStrategy::Replace,
        }
    }

    /// Returns `true` for fields that only exist on multiple choice questions.
    pub fn is_multiple_choice(self) -> bool {
        matches!(
            self,
            SchemeField::Choices
                | SchemeField::Display
                | SchemeField::Style
                | SchemeField::StyleIterator
        )
    }
}

/// A sparse configuration template for questions.
///
/// Schemes are shared through `Rc<Scheme>`; a question remembers which
/// scheme objects it has mounted and ignores repeated merges of the same
/// object unless forced.
#[derive(Debug, Clone, Default)]
pub struct Scheme {
    pub prompt: Option<String>,

    pub validators: Option<Vec<Validator>>,
    pub options: Option<Vec<AnswerOption>>,
    pub commands: Option<Vec<Command>>,
    pub correct_answers: Option<Vec<String>>,
    pub extra: Option<BTreeMap<String, Value>>,

    pub required: Option<bool>,
    pub strip: Option<bool>,
    pub append_column: Option<bool>,

    pub suffix: Option<String>,
    pub prefix: Option<String>,

    pub command_delimiter: Option<String>,
    pub option_indicator: Option<String>,

    // Multiple choice only.
    pub choices: Option<Vec<String>>,
    pub display: Option<DisplayMode>,
    pub style: Option<String>,
    pub style_iterator: Option<StyleIterator>,
}

impl Scheme {
    /// Returns `true` if `field` is set on this scheme.
    pub fn is_set(&self, field: SchemeField) -> bool {
        match field {
            SchemeField::Prompt => self.prompt.is_some(),
            SchemeField::Validators => self.validators.is_some(),
            SchemeField::Options => self.options.is_some(),
            SchemeField::Commands => self.commands.is_some(),
            SchemeField::CorrectAnswers => self.correct_answers.is_some(),
            SchemeField::Extra => self.extra.is_some(),
            SchemeField::Required => self.required.is_some(),
            SchemeField::Strip => self.strip.is_some(),
            SchemeField::AppendColumn => self.append_column.is_some(),
            SchemeField::Suffix => self.suffix.is_some(),
            SchemeField::Prefix => self.prefix.is_some(),
            SchemeField::CommandDelimiter => self.command_delimiter.is_some(),
            SchemeField::OptionIndicator => self.option_indicator.is_some(),
            SchemeField::Choices => self.choices.is_some(),
            SchemeField::Display => self.display.is_some(),
            SchemeField::Style => self.style.is_some(),
            SchemeField::StyleIterator => self.style_iterator.is_some(),
        }
    }

    /// Returns the fields set on this scheme, in merge order.
    pub fn fields_set(&self) -> Vec<SchemeField> {
        SchemeField::ALL
            .into_iter()
            .filter(|field| self.is_set(*field))
            .collect()
    }
}

/// Replaces `target` with a set `incoming` value. Returns whether it applied.
pub(crate) fn replace<T: Clone>(target: &mut T, incoming: &Option<T>) -> bool {
    match incoming {
        Some(value) => {
            *target = value.clone();
            true
        }
        None => false,
    }
}

/// Appends a set `incoming` list after `target`'s entries.
pub(crate) fn extend<T: Clone>(target: &mut Vec<T>, incoming: &Option<Vec<T>>) -> bool {
    match incoming {
        Some(values) => {
            target.extend(values.iter().cloned());
            true
        }
        None => false,
    }
}

/// Adds keys from a set `incoming` map that `target` does not have yet.
pub(crate) fn merge_keep_target<V: Clone>(
    target: &mut BTreeMap<String, V>,
    incoming: &Option<BTreeMap<String, V>>,
) -> bool {
    match incoming {
        Some(values) => {
            for (key, value) in values {
                target
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_table() {
        assert_eq!(SchemeField::Validators.strategy(), MergeStrategy::Extend);
        assert_eq!(SchemeField::Commands.strategy(), MergeStrategy::Extend);
        assert_eq!(SchemeField::CorrectAnswers.strategy(), MergeStrategy::Extend);
        assert_eq!(SchemeField::Extra.strategy(), MergeStrategy::MergeKeepTarget);
        assert_eq!(SchemeField::Prompt.strategy(), MergeStrategy::Replace);
        assert_eq!(SchemeField::StyleIterator.strategy(), MergeStrategy::Replace);
    }

    #[test]
    fn test_fields_set() {
        assert!(Scheme::default().fields_set().is_empty());

        let scheme = Scheme {
            suffix: Some(String::new()),
            choices: Some(vec!["a".into()]),
            ..Default::default()
        };
        assert_eq!(
            scheme.fields_set(),
            vec![SchemeField::Suffix, SchemeField::Choices]
        );
    }

    #[test]
    fn test_merge_keep_target() {
        let mut target = BTreeMap::from([("a".to_string(), 2)]);
        merge_keep_target(&mut target, &Some(BTreeMap::from([("a".to_string(), 1)])));
        assert_eq!(target, BTreeMap::from([("a".to_string(), 2)]));

        merge_keep_target(&mut target, &Some(BTreeMap::from([("b".to_string(), 1)])));
        assert_eq!(
            target,
            BTreeMap::from([("a".to_string(), 2), ("b".to_string(), 1)])
        );
    }

    #[test]
    fn test_extend_keeps_existing_first() {
        let mut target = vec!["y"];
        assert!(extend(&mut target, &Some(vec!["x"])));
        assert_eq!(target, vec!["y", "x"]);
        assert!(!extend(&mut target, &None));
    }

    #[test]
    fn test_replace_applies_empty_string() {
        let mut target = "text".to_string();
        assert!(replace(&mut target, &Some(String::new())));
        assert_eq!(target, "");
        assert!(!replace(&mut target, &None));
    }
}
