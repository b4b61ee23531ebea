//! Conversion from definitions to runnable quizzes.
//!
//! A question is built in three layers: its own fields, then the named
//! scheme it refers to, then the quiz scheme. Each named scheme is converted
//! once and shared, so questions using the same name mount the same scheme
//! object.

use std::collections::BTreeMap;
use std::rc::Rc;

use quizz_core::{Command, MultipleChoice, Question, Quiz, Scheme, Validator};
use serde_json::Value;
use tracing::debug;

use crate::error::{DefinitionError, Result};
use crate::model::{CommandDef, QuestionDef, QuizDefinition, SchemeDef, ValidatorDef};

/// Validator kinds accepted in definitions.
pub const VALIDATOR_KINDS: &[&str] = &[
    "max_length",
    "min_length",
    "alpha",
    "alphanumeric",
    "digit",
    "regex",
];

fn invalid(def: &ValidatorDef, reason: &str) -> DefinitionError {
    DefinitionError::InvalidValidator {
        kind: def.kind.clone(),
        reason: reason.to_string(),
    }
}

fn length_argument(def: &ValidatorDef) -> Result<usize> {
    def.against
        .as_ref()
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| invalid(def, "'against' must be a non-negative integer"))
}

pub(crate) fn validator(def: &ValidatorDef) -> Result<Validator> {
    let validator = match def.kind.as_str() {
        "max_length" => Validator::max_length(length_argument(def)?),
        "min_length" => Validator::min_length(length_argument(def)?),
        "alpha" => Validator::alpha(),
        "alphanumeric" => Validator::alphanumeric(),
        "digit" => Validator::digit(),
        "regex" => {
            let pattern = def
                .against
                .as_ref()
                .and_then(Value::as_str)
                .ok_or_else(|| invalid(def, "'against' must be a pattern string"))?;
            Validator::regex(pattern).map_err(|source| DefinitionError::InvalidRegex {
                pattern: pattern.to_string(),
                source,
            })?
        }
        other => return Err(DefinitionError::UnknownValidator(other.to_string())),
    };

    Ok(match &def.message {
        Some(message) => validator.with_message(message.clone()),
        None => validator,
    })
}

pub(crate) fn command(def: &CommandDef) -> Result<Command> {
    match def {
        CommandDef::Name(name) => {
            Command::builtin(name).ok_or_else(|| DefinitionError::UnknownCommand(name.clone()))
        }
        CommandDef::Help { help, command_list } => Ok(Command::help_with(help.clone(), *command_list)),
    }
}

fn validators(defs: &[ValidatorDef]) -> Result<Vec<Validator>> {
    defs.iter().map(validator).collect()
}

fn commands(defs: &[CommandDef]) -> Result<Vec<Command>> {
    defs.iter().map(command).collect()
}

impl SchemeDef {
    /// Converts this entry into a core [`Scheme`].
    ///
    /// # Errors
    ///
    /// Fails on unknown commands, unknown validator kinds, bad validator
    /// arguments and unknown display names.
    pub fn to_scheme(&self) -> Result<Scheme> {
        Ok(Scheme {
            prompt: self.prompt.clone(),
            validators: self.validators.as_deref().map(validators).transpose()?,
            options: self.options.clone(),
            commands: self.commands.as_deref().map(commands).transpose()?,
            correct_answers: self.correct_answers.clone(),
            extra: self.extra.clone(),
            required: self.required,
            strip: self.strip,
            append_column: self.append_column,
            suffix: self.suffix.clone(),
            prefix: self.prefix.clone(),
            command_delimiter: self.command_delimiter.clone(),
            option_indicator: self.option_indicator.clone(),
            choices: self.choices.clone(),
            display: self.display.as_deref().map(str::parse).transpose()?,
            style: self.style.clone(),
            style_iterator: None,
        })
    }
}

impl QuestionDef {
    /// Builds the question from its own fields, then mounts `named`.
    ///
    /// The question is multiple choice when its own entry says so or when
    /// `named` supplies choices. The named scheme is mounted before the
    /// options are derived, so an entry may give only a `style` and take
    /// its choices from the scheme.
    ///
    /// # Errors
    ///
    /// Fails on invalid commands or validators and on core configuration
    /// errors such as an empty prompt or a multiple choice question without
    /// options.
    pub fn to_question(&self, named: Option<&Rc<Scheme>>) -> Result<Question> {
        let multiple_choice =
            self.is_multiple_choice() || named.is_some_and(|scheme| scheme.choices.is_some());

        let mut question = self
            .options
            .iter()
            .cloned()
            .fold(Question::new(self.prompt.clone())?, Question::with_option);

        let own = Scheme {
            validators: Some(validators(&self.validators)?),
            commands: Some(commands(&self.commands)?),
            correct_answers: Some(self.correct_answers.clone()),
            extra: Some(self.extra.clone()),
            required: self.required,
            strip: self.strip,
            append_column: self.append_column,
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            command_delimiter: self.command_delimiter.clone(),
            option_indicator: self.option_indicator.clone(),
            ..Default::default()
        };
        question.configure(&own)?;

        if multiple_choice {
            let mut choice = MultipleChoice::new(self.choices.clone().unwrap_or_default());
            if let Some(style) = &self.style {
                choice = choice.with_style(style.clone());
            }
            if let Some(display) = &self.display {
                choice = choice.with_display(display.parse()?);
            }
            return Ok(question.into_multiple_choice(choice, named)?);
        }

        if let Some(scheme) = named {
            question.update_scheme(scheme, false)?;
        }
        Ok(question)
    }
}

impl QuizDefinition {
    /// Builds a runnable [`Quiz`].
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::UnknownScheme`] for a question naming an
    /// undeclared scheme, plus any conversion error of its parts.
    pub fn build(&self) -> Result<Quiz> {
        let named: BTreeMap<&str, Rc<Scheme>> = self
            .schemes
            .iter()
            .map(|(name, def)| def.to_scheme().map(|scheme| (name.as_str(), Rc::new(scheme))))
            .collect::<Result<_>>()?;

        let mut questions = Vec::with_capacity(self.questions.len());
        for def in &self.questions {
            let scheme = match &def.scheme {
                Some(name) => Some(
                    named
                        .get(name.as_str())
                        .ok_or_else(|| DefinitionError::UnknownScheme(name.clone()))?,
                ),
                None => None,
            };
            questions.push(def.to_question(scheme)?);
        }

        let quiz = match &self.scheme {
            Some(def) => Quiz::with_scheme(questions, Rc::new(def.to_scheme()?))?,
            None => Quiz::new(questions)?,
        };
        debug!(questions = quiz.questions().len(), "Built quiz from definition");
        Ok(quiz)
    }
}
