//! Quiz definition files for quizz.
//!
//! This crate reads quizzes declared in YAML or JSON and builds runnable
//! [`Quiz`](quizz_core::Quiz) values from them.
//!
//! # Quick start
//!
//! ```no_run
//! use quizz_core::Terminal;
//! use quizz_definition::QuizDefinition;
//!
//! let definition = QuizDefinition::load("quiz.yaml").unwrap();
//! let mut quiz = definition.build().unwrap();
//! quiz.start(&mut Terminal::new()).unwrap();
//! ```

mod convert;
mod error;
mod model;

pub use convert::VALIDATOR_KINDS;
pub use error::{DefinitionError, Result};
pub use model::{CommandDef, Format, QuestionDef, QuizDefinition, SchemeDef, ValidatorDef};
