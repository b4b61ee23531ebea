//! Error types for loading and building quiz definitions.

use quizz_core::QuizError;
use thiserror::Error;

/// Errors that can occur while reading a definition or turning it into a quiz.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file extension is neither JSON nor YAML.
    #[error("unsupported definition format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),

    /// A question or scheme names a command that does not exist.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// A question refers to a scheme that is not declared under `schemes`.
    #[error("unknown scheme '{0}'")]
    UnknownScheme(String),

    /// A validator kind that is not built in.
    #[error("unknown validator kind '{0}'")]
    UnknownValidator(String),

    /// A validator is missing its argument or the argument has the wrong type.
    #[error("invalid '{kind}' validator: {reason}")]
    InvalidValidator { kind: String, reason: String },

    /// A regex validator pattern does not compile.
    #[error("invalid regex '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The definition parsed but the quiz configuration is invalid.
    #[error("invalid quiz: {0}")]
    Quiz(#[from] QuizError),
}

/// Convenience alias for results with [`DefinitionError`].
pub type Result<T> = std::result::Result<T, DefinitionError>;
