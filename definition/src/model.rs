//! Serializable quiz definitions.
//!
//! A definition declares named schemes, an optional quiz scheme and the
//! ordered questions. Files are YAML or JSON, chosen by extension.
//!
//! # Example YAML
//!
//! ```yaml
//! schemes:
//!   pick:
//!     style: number
//!     display: vertical
//!     commands: [next, previous, jump]
//! scheme:
//!   commands: [finish, answers, help, quit]
//! questions:
//!   - prompt: Pick one
//!     choices: [Cat, Dog]
//!     scheme: pick
//!     correct_answers: ["1"]
//!   - prompt: Your name
//!     validators:
//!       - { kind: alpha, message: "Letters only." }
//!       - { kind: max_length, against: 20 }
//!     required: false
//! ```

use std::collections::BTreeMap;
use std::io::BufReader;
use std::path::Path;

use quizz_core::AnswerOption;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{DefinitionError, Result};

/// A validator entry: a built-in `kind`, an optional failure message and
/// the kind's argument.
///
/// `max_length` and `min_length` take a non-negative integer, `regex` takes
/// a pattern string; the other kinds take no argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorDef {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub against: Option<Value>,
}

/// A command entry: either a built-in name (`skip`, `finish`, ...) or a
/// help command with its own message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandDef {
    Name(String),
    Help {
        help: String,
        #[serde(default = "default_true")]
        command_list: bool,
    },
}

fn default_true() -> bool {
    true
}

/// A sparse scheme; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemeDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validators: Option<Vec<ValidatorDef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<AnswerOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<CommandDef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append_column: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_delimiter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_indicator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// One question.
///
/// The entry is multiple choice when any of `choices`, `style` or
/// `display` is given; a named scheme with `choices` also makes the built
/// question multiple choice. `scheme` names an entry of
/// [`QuizDefinition::schemes`] mounted after the question's own fields and
/// before options are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionDef {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<AnswerOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<ValidatorDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub correct_answers: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append_column: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_delimiter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_indicator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

impl QuestionDef {
    /// Returns `true` if this entry describes a multiple choice question.
    pub fn is_multiple_choice(&self) -> bool {
        self.choices.is_some() || self.style.is_some() || self.display.is_some()
    }
}

/// Top-level quiz definition.
///
/// # Examples
///
/// ```
/// use quizz_definition::QuizDefinition;
///
/// let definition = QuizDefinition::from_yaml_str(
///     "questions:\n  - prompt: Name\n  - prompt: Pet\n    choices: [Cat, Dog]\n",
/// )
/// .unwrap();
/// assert_eq!(definition.questions.len(), 2);
/// assert!(definition.questions[1].is_multiple_choice());
///
/// let quiz = definition.build().unwrap();
/// assert_eq!(quiz.questions()[1].options.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuizDefinition {
    /// Named schemes questions can refer to.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub schemes: BTreeMap<String, SchemeDef>,
    /// Scheme mounted on every question. Without it the quiz only adds the
    /// `finish` command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<SchemeDef>,
    pub questions: Vec<QuestionDef>,
}

/// Serialization format of a definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Picks the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::UnsupportedFormat`] for anything other
    /// than `json`, `yaml` or `yml`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Format::Json),
            Some("yaml" | "yml") => Ok(Format::Yaml),
            _ => Err(DefinitionError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }
}

impl QuizDefinition {
    /// Loads a definition from a `.json`, `.yaml` or `.yml` file.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](DefinitionError::UnsupportedFormat) for
    /// other extensions, [`IoError`](DefinitionError::IoError) if the file
    /// cannot be read, and the parser error if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let reader = BufReader::new(std::fs::File::open(path)?);

        let definition: Self = match format {
            Format::Json => serde_json::from_reader(reader)?,
            Format::Yaml => serde_yaml::from_reader(reader)?,
        };
        debug!(
            path = %path.display(),
            questions = definition.questions.len(),
            schemes = definition.schemes.len(),
            "Loaded quiz definition"
        );
        Ok(definition)
    }

    /// Parses a YAML definition.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Parses a JSON definition.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
schemes:
  pick:
    style: number
    display: vertical
    commands: [next, previous]
scheme:
  commands:
    - finish
    - help: "Answer every question."
      command_list: false
questions:
  - prompt: Pick one
    choices: [Cat, Dog]
    scheme: pick
  - prompt: Your name
    validators:
      - { kind: alpha, message: "Letters only." }
      - { kind: max_length, against: 20 }
    correct_answers: [Ada]
    extra: { points: 5 }
    required: false
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let definition = QuizDefinition::from_yaml_str(sample_yaml()).unwrap();

        let pick = &definition.schemes["pick"];
        assert_eq!(pick.style.as_deref(), Some("number"));
        assert_eq!(pick.display.as_deref(), Some("vertical"));

        let scheme = definition.scheme.as_ref().unwrap();
        assert_eq!(
            scheme.commands.as_ref().unwrap(),
            &vec![
                CommandDef::Name("finish".into()),
                CommandDef::Help {
                    help: "Answer every question.".into(),
                    command_list: false,
                },
            ]
        );

        let name = &definition.questions[1];
        assert!(!name.is_multiple_choice());
        assert_eq!(name.validators[0].kind, "alpha");
        assert_eq!(name.validators[0].message.as_deref(), Some("Letters only."));
        assert_eq!(name.validators[1].against, Some(Value::from(20)));
        assert_eq!(name.extra["points"], Value::from(5));
        assert_eq!(name.required, Some(false));
        assert_eq!(definition.questions[0].scheme.as_deref(), Some("pick"));
    }

    #[test]
    fn test_deserialize_minimal() {
        let definition = QuizDefinition::from_yaml_str("questions: []").unwrap();
        assert!(definition.schemes.is_empty());
        assert!(definition.scheme.is_none());
        assert!(definition.questions.is_empty());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = QuizDefinition::from_yaml_str("questions:\n  - prompt: A\n    colour: red\n");
        assert!(matches!(result, Err(DefinitionError::YamlError(_))));
    }

    #[test]
    fn test_json_matches_yaml() {
        let yaml = QuizDefinition::from_yaml_str(sample_yaml()).unwrap();
        let json = serde_json::to_string(&yaml).unwrap();
        assert_eq!(QuizDefinition::from_json_str(&json).unwrap(), yaml);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("quiz.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("quiz.YML")).unwrap(), Format::Yaml);
        assert!(matches!(
            Format::from_path(Path::new("quiz.toml")),
            Err(DefinitionError::UnsupportedFormat(_))
        ));
    }
}
