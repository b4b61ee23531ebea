//! Interactive console questionnaires.
//!
//! This crate models questions asked on a line-oriented console:
//!
//! - [`Question`]: a prompt with validators, options, commands and answer
//!   state. Multiple choice questions derive their options from a
//!   [`MultipleChoice`] section.
//! - [`Scheme`]: a sparse configuration template merged onto questions
//!   (lists extend, maps keep the question's keys, scalars replace).
//! - [`Quiz`]: an ordered set of questions with navigation, readiness
//!   tracking and the `finish` command.
//! - [`Command`]: in-prompt commands such as `!skip`, `!jump 3` or
//!   `!help`, plus user-defined ones, returning a control [`Signal`].
//! - [`Console`]: the input/output boundary, with [`Terminal`] for the
//!   process and [`ScriptedConsole`] for replayed input.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use quizz_core::*;
//!
//! let scheme = Rc::new(Scheme {
//!     commands: Some(vec![Command::Finish, Command::Skip]),
//!     ..Default::default()
//! });
//!
//! let pet = Question::multiple_choice(
//!     "Best pet?",
//!     MultipleChoice::new(["Cat", "Dog"]).with_style("letter_uppercase"),
//! )
//! .unwrap()
//! .with_correct_answers(["A"]);
//! let name = Question::new("Your name").unwrap().with_required(false);
//!
//! let mut quiz = Quiz::with_scheme(vec![pet, name], scheme).unwrap();
//! let mut console = ScriptedConsole::new(["A", "!skip", "!finish"]);
//!
//! assert_eq!(quiz.start(&mut console).unwrap(), AskOutcome::Break);
//! assert!(quiz.questions()[0].has_correct_answer());
//! assert!(quiz.is_ready());
//! assert!(!quiz.is_done());
//! ```

pub mod choice;
pub mod command;
pub mod console;
mod engine;
pub mod error;
pub mod option;
pub mod question;
pub mod quiz;
pub mod scheme;
pub mod validator;

pub use choice::{BUILTIN_STYLES, DEFAULT_STYLE, DisplayMode, DisplayRenderer, MultipleChoice, StyleIterator};
pub use command::{Command, CommandContext, CommandHandler, CustomCommand, HelpCommand, JumpTarget, Signal};
pub use console::{Console, ScriptedConsole, Terminal};
pub use engine::AskOutcome;
pub use error::{QuizError, Result, ValidationError};
pub use option::{Answer, AnswerOption};
pub use question::{Question, QuestionHook};
pub use quiz::Quiz;
pub use scheme::{MergeStrategy, Scheme, SchemeField};
pub use validator::{DEFAULT_VALIDATION_MESSAGE, Validator};
