//! The question entity: configuration, answer state and scheme mounting.
//!
//! A [`Question`] is either a plain question (free text checked by
//! validators, or a fixed option list) or a multiple choice question whose
//! options are derived from a [`MultipleChoice`] section. Both share the
//! same type so a quiz holds one homogeneous list.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::choice::{DisplayMode, MultipleChoice};
use crate::command::Command;
use crate::console::Console;
use crate::engine::{self, AskOutcome};
use crate::error::{QuizError, Result, ValidationError};
use crate::option::{Answer, AnswerOption};
use crate::scheme::{self, MergeStrategy, Scheme, SchemeField};
use crate::validator::Validator;

/// Extension hook run with the question itself.
pub type QuestionHook = Rc<dyn Fn(&mut Question)>;

/// A question with its configuration and answer state.
///
/// Equality is identity: two questions with the same prompt are still
/// different questions, so `PartialEq` is not implemented.
///
/// # Examples
///
/// ```
/// use quizz_core::{Answer, Question, ScriptedConsole, Validator};
///
/// let mut question = Question::new("Your name")
///     .unwrap()
///     .with_validator(Validator::alpha().with_message("Letters only."));
///
/// let mut console = ScriptedConsole::new(["R2D2", "  Ada "]);
/// question.ask(&mut console).unwrap();
///
/// assert_eq!(question.answer, Some(Answer::Text("Ada".into())));
/// assert_eq!(question.attempt(), 2);
/// assert_eq!(console.outputs(), ["Letters only."]);
/// assert_eq!(console.prompts()[0], "Your name: ");
/// ```
pub struct Question {
    pub prompt: String,

    pub validators: Vec<Validator>,
    /// Effective options. For multiple choice questions this is the derived
    /// set followed by the explicit options, recomputed on every merge.
    pub options: Vec<AnswerOption>,
    pub commands: Vec<Command>,
    pub correct_answers: Vec<String>,
    pub extra: BTreeMap<String, Value>,

    pub required: bool,
    pub strip: bool,
    /// Append `": "` to the prompt when no option display is rendered.
    pub append_column: bool,

    pub suffix: String,
    pub prefix: String,

    pub command_delimiter: String,
    pub option_indicator: String,

    pub answer: Option<Answer>,

    pub(crate) attempt: usize,
    pub(crate) sequence: Option<usize>,
    mounted_schemes: Vec<Rc<Scheme>>,
    choice: Option<MultipleChoice>,
    pre_ask: Option<QuestionHook>,
    post_answer: Option<QuestionHook>,
}

impl Question {
    /// Creates a plain question.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::EmptyPrompt`] if `prompt` is empty.
    pub fn new(prompt: impl Into<String>) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.is_empty() {
            return Err(QuizError::EmptyPrompt);
        }

        Ok(Self {
            prompt,
            validators: Vec::new(),
            options: Vec::new(),
            commands: Vec::new(),
            correct_answers: Vec::new(),
            extra: BTreeMap::new(),
            required: true,
            strip: true,
            append_column: true,
            suffix: String::new(),
            prefix: String::new(),
            command_delimiter: "!".to_string(),
            option_indicator: ") ".to_string(),
            answer: None,
            attempt: 0,
            sequence: None,
            mounted_schemes: Vec::new(),
            choice: None,
            pre_ask: None,
            post_answer: None,
        })
    }

    /// Creates a multiple choice question.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::EmptyPrompt`], [`QuizError::UnknownStyle`] or
    /// [`QuizError::NoOptions`].
    pub fn multiple_choice(prompt: impl Into<String>, choice: MultipleChoice) -> Result<Self> {
        Self::new(prompt)?.into_multiple_choice(choice, None)
    }

    /// Turns this question into a multiple choice question.
    ///
    /// Options already on the question are kept as explicit options ahead
    /// of the ones in `choice`. When `scheme` is given it is mounted before
    /// the options are derived, so it may supply the choices.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::UnknownStyle`] or [`QuizError::NoOptions`], and
    /// the errors of [`update_scheme`](Self::update_scheme).
    pub fn into_multiple_choice(
        mut self,
        mut choice: MultipleChoice,
        scheme: Option<&Rc<Scheme>>,
    ) -> Result<Self> {
        choice
            .primitive_options
            .splice(0..0, std::mem::take(&mut self.options));
        self.choice = Some(choice);
        if let Some(scheme) = scheme {
            self.update_scheme(scheme, false)?;
        }
        if let Some(choice) = &self.choice {
            self.options = choice.derive_options()?;
        }
        Ok(self)
    }

    /// Adds a validator.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Adds an option. On multiple choice questions it is kept with the
    /// explicit options, after the derived ones.
    pub fn with_option(mut self, option: AnswerOption) -> Self {
        if let Some(choice) = self.choice.as_mut() {
            choice.primitive_options.push(option.clone());
        }
        self.options.push(option);
        self
    }

    /// Adds a command.
    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Adds accepted answers for [`has_correct_answer`](Self::has_correct_answer).
    pub fn with_correct_answers<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.correct_answers
            .extend(answers.into_iter().map(Into::into));
        self
    }

    /// Stores an extra value.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_strip(mut self, strip: bool) -> Self {
        self.strip = strip;
        self
    }

    pub fn with_append_column(mut self, append_column: bool) -> Self {
        self.append_column = append_column;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_command_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.command_delimiter = delimiter.into();
        self
    }

    pub fn with_option_indicator(mut self, indicator: impl Into<String>) -> Self {
        self.option_indicator = indicator.into();
        self
    }

    /// Mounts `scheme` (see [`update_scheme`](Self::update_scheme)).
    pub fn with_scheme(mut self, scheme: Rc<Scheme>) -> Result<Self> {
        self.update_scheme(&scheme, false)?;
        Ok(self)
    }

    /// Runs `hook` after the attempt counter is incremented and before
    /// input is read.
    pub fn on_pre_ask(mut self, hook: impl Fn(&mut Question) + 'static) -> Self {
        self.pre_ask = Some(Rc::new(hook));
        self
    }

    /// Runs `hook` after an answer is accepted.
    pub fn on_post_answer(mut self, hook: impl Fn(&mut Question) + 'static) -> Self {
        self.post_answer = Some(Rc::new(hook));
        self
    }

    /// Merges `scheme` onto this question and records it as mounted.
    ///
    /// A scheme object that is already mounted is skipped unless `force`
    /// is set, in which case it is applied again.
    ///
    /// # Errors
    ///
    /// Fails with [`QuizError::EmptyPrompt`] when the scheme carries an
    /// empty prompt, and with the option derivation errors of multiple
    /// choice questions.
    pub fn update_scheme(&mut self, scheme: &Rc<Scheme>, force: bool) -> Result<()> {
        let mounted = self
            .mounted_schemes
            .iter()
            .any(|m| Rc::ptr_eq(m, scheme));
        if mounted && !force {
            debug!(prompt = %self.prompt, "Scheme already mounted, skipping");
            return Ok(());
        }

        self.configure(scheme)?;
        self.mounted_schemes.push(Rc::clone(scheme));
        Ok(())
    }

    /// Applies `scheme` with the same field rules as
    /// [`update_scheme`](Self::update_scheme), without mounting it.
    ///
    /// # Errors
    ///
    /// Same as [`update_scheme`](Self::update_scheme).
    pub fn configure(&mut self, scheme: &Scheme) -> Result<()> {
        let applied = self.merge(scheme)?;
        debug!(prompt = %self.prompt, fields = ?applied, "Applied scheme");
        Ok(())
    }

    /// Applies every set field of `scheme` and returns the ones that landed.
    fn merge(&mut self, scheme: &Scheme) -> Result<Vec<SchemeField>> {
        if scheme.prompt.as_deref() == Some("") {
            return Err(QuizError::EmptyPrompt);
        }

        let applied: Vec<SchemeField> = scheme
            .fields_set()
            .into_iter()
            .filter(|field| self.apply_field(*field, scheme))
            .collect();

        if let Some(choice) = &self.choice {
            self.options = choice.derive_options()?;
        }
        Ok(applied)
    }

    fn apply_field(&mut self, field: SchemeField, s: &Scheme) -> bool {
        if field.is_multiple_choice() && self.choice.is_none() {
            return false;
        }

        match field.strategy() {
            MergeStrategy::Replace => self.replace_field(field, s),
            MergeStrategy::Extend => self.extend_field(field, s),
            MergeStrategy::MergeKeepTarget => self.merge_field(field, s),
        }
    }

    fn replace_field(&mut self, field: SchemeField, s: &Scheme) -> bool {
        match field {
            SchemeField::Prompt => scheme::replace(&mut self.prompt, &s.prompt),
            SchemeField::Required => scheme::replace(&mut self.required, &s.required),
            SchemeField::Strip => scheme::replace(&mut self.strip, &s.strip),
            SchemeField::AppendColumn => scheme::replace(&mut self.append_column, &s.append_column),
            SchemeField::Suffix => scheme::replace(&mut self.suffix, &s.suffix),
            SchemeField::Prefix => scheme::replace(&mut self.prefix, &s.prefix),
            SchemeField::CommandDelimiter => {
                scheme::replace(&mut self.command_delimiter, &s.command_delimiter)
            }
            SchemeField::OptionIndicator => {
                scheme::replace(&mut self.option_indicator, &s.option_indicator)
            }
            SchemeField::Display | SchemeField::Style | SchemeField::StyleIterator => {
                let Some(choice) = self.choice.as_mut() else {
                    return false;
                };
                match field {
                    SchemeField::Display => scheme::replace(&mut choice.display, &s.display),
                    SchemeField::Style => scheme::replace(&mut choice.style, &s.style),
                    _ => match &s.style_iterator {
                        Some(iterator) => {
                            choice.style_iterator = Some(iterator.clone());
                            true
                        }
                        None => false,
                    },
                }
            }
            _ => false,
        }
    }

    fn extend_field(&mut self, field: SchemeField, s: &Scheme) -> bool {
        match field {
            SchemeField::Validators => scheme::extend(&mut self.validators, &s.validators),
            SchemeField::Options => match self.choice.as_mut() {
                Some(choice) => scheme::extend(&mut choice.primitive_options, &s.options),
                None => scheme::extend(&mut self.options, &s.options),
            },
            SchemeField::Commands => scheme::extend(&mut self.commands, &s.commands),
            SchemeField::CorrectAnswers => {
                scheme::extend(&mut self.correct_answers, &s.correct_answers)
            }
            SchemeField::Choices => match self.choice.as_mut() {
                Some(choice) => scheme::extend(&mut choice.choices, &s.choices),
                None => false,
            },
            _ => false,
        }
    }

    fn merge_field(&mut self, field: SchemeField, s: &Scheme) -> bool {
        match field {
            SchemeField::Extra => scheme::merge_keep_target(&mut self.extra, &s.extra),
            _ => false,
        }
    }

    /// Schemes mounted so far, in order (duplicates after forced merges).
    pub fn mounted_schemes(&self) -> &[Rc<Scheme>] {
        &self.mounted_schemes
    }

    /// The multiple choice section, if this is a multiple choice question.
    pub fn multiple_choice_config(&self) -> Option<&MultipleChoice> {
        self.choice.as_ref()
    }

    /// Returns `true` for multiple choice questions.
    pub fn is_multiple_choice(&self) -> bool {
        self.choice.is_some()
    }

    /// Number of times this question has been presented.
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    /// Position in the owning quiz, `0` when the question is standalone.
    pub fn sequence(&self) -> usize {
        self.sequence.unwrap_or(0)
    }

    /// Returns `true` once a quiz has attached this question.
    pub fn is_attached(&self) -> bool {
        self.sequence.is_some()
    }

    pub fn has_answer(&self) -> bool {
        self.answer.is_some()
    }

    /// Returns `true` if the answer (or the selected option's value) is one
    /// of the correct answers.
    pub fn has_correct_answer(&self) -> bool {
        self.answer
            .as_ref()
            .is_some_and(|answer| self.correct_answers.iter().any(|c| c == answer.token()))
    }

    /// Builds the text shown when reading input.
    ///
    /// Composition order: quiz header (when `position` is
    /// `Some((index, total))`), prefix, prompt, suffix, then either the
    /// multiple choice display or the `": "` column marker.
    pub fn render_prompt(&self, position: Option<(usize, usize)>) -> String {
        let mut prompt = String::new();
        if let Some((index, total)) = position {
            prompt.push_str(&self.quiz_header(index, total));
        }
        prompt.push_str(&self.prefix);
        prompt.push_str(&self.prompt);
        prompt.push_str(&self.suffix);

        let display = self.choice.as_ref().map(|c| &c.display);
        if let Some(display) = display.filter(|d| !matches!(d, DisplayMode::Hidden)) {
            if let Some(rendered) = display.render(&prompt, &self.options, &self.option_indicator) {
                return rendered;
            }
        }

        if self.append_column {
            prompt.push_str(": ");
        }
        prompt
    }

    fn quiz_header(&self, index: usize, total: usize) -> String {
        let current = match &self.answer {
            Some(answer) => answer.render(&self.option_indicator),
            None => "No answer".to_string(),
        };
        format!("* Question {}/{}. [{}]\n", index + 1, total, current)
    }

    /// Finds the option whose value equals `value` exactly.
    ///
    /// # Errors
    ///
    /// The [`ValidationError`] lists every available option.
    pub fn match_option(&self, value: &str) -> std::result::Result<AnswerOption, ValidationError> {
        if let Some(option) = self.options.iter().find(|o| o.value == value) {
            return Ok(option.clone());
        }

        let available: String = self
            .options
            .iter()
            .map(|o| format!("\n{}", o.render(&self.option_indicator)))
            .collect();
        Err(ValidationError::new(format!(
            "\nThe selected option is not valid. Available options are: {available}\n"
        )))
    }

    /// Runs every validator; the first rejection wins.
    pub fn validate(&self, answer: &str) -> std::result::Result<(), ValidationError> {
        self.validators
            .iter()
            .try_for_each(|validator| validator.validate(answer))
    }

    /// Asks this question on its own until it resolves.
    ///
    /// Quiz navigation commands fail with [`QuizError::MissingQuiz`] here;
    /// use [`Quiz::start`](crate::Quiz::start) for quiz questions.
    pub fn ask(&mut self, console: &mut dyn Console) -> Result<AskOutcome> {
        engine::ask_standalone(self, console)
    }

    pub(crate) fn run_pre_ask(&mut self) {
        if let Some(hook) = self.pre_ask.clone() {
            hook(self);
        }
    }

    pub(crate) fn run_post_answer(&mut self) {
        if let Some(hook) = self.post_answer.clone() {
            hook(self);
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_multiple_choice() {
            "MultipleChoiceQuestion"
        } else {
            "Question"
        };
        write!(f, "<{kind}: {}>", self.prompt)
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("prompt", &self.prompt)
            .field("options", &self.options)
            .field("commands", &self.commands)
            .field("required", &self.required)
            .field("answer", &self.answer)
            .field("attempt", &self.attempt)
            .field("sequence", &self.sequence)
            .field("multiple_choice", &self.choice)
            .finish_non_exhaustive()
    }
}
