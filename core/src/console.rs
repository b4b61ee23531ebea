//! Console boundary: where prompts are read and messages are written.
//!
//! The engine never touches stdin/stdout directly. [`Terminal`] is the
//! process console; [`ScriptedConsole`] replays canned input and records
//! everything the engine shows, which is what tests and embedders use.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Line-oriented input/output used by questions and quizzes.
pub trait Console {
    /// Shows `prompt` and reads one line of input, without its line ending.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Writes one line of output.
    fn write_line(&mut self, line: &str);

    /// Ends the program with `code`. Called by the quit command.
    fn exit(&mut self, code: i32) {
        std::process::exit(code)
    }
}

fn end_of_input() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "end of input")
}

/// Console bound to the process stdin and stdout.
#[derive(Debug, Default)]
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }
}

impl Console for Terminal {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(end_of_input());
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    fn write_line(&mut self, line: &str) {
        // A closed stdout is not the engine's concern.
        let _ = writeln!(io::stdout().lock(), "{line}");
    }
}

/// In-memory console replaying queued input lines.
///
/// Prompts and output lines are recorded in order. Reading past the last
/// queued line fails with [`io::ErrorKind::UnexpectedEof`], and
/// [`exit`](Console::exit) records the code instead of terminating.
///
/// # Examples
///
/// ```
/// use quizz_core::{Console, ScriptedConsole};
///
/// let mut console = ScriptedConsole::new(["yes"]);
/// assert_eq!(console.read_line("Ready? ").unwrap(), "yes");
/// console.write_line("Great.");
///
/// assert_eq!(console.prompts(), ["Ready? "]);
/// assert_eq!(console.outputs(), ["Great."]);
/// assert!(console.read_line("Again? ").is_err());
/// ```
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    prompts: Vec<String>,
    outputs: Vec<String>,
    exit_code: Option<i32>,
}

impl ScriptedConsole {
    /// Creates a console that will answer prompts with `inputs`, in order.
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Queues another input line.
    pub fn push_input(&mut self, line: impl Into<String>) {
        self.inputs.push_back(line.into());
    }

    /// Number of queued lines not read yet.
    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Prompts shown so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Lines written so far.
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// The most recent output line.
    pub fn last_output(&self) -> Option<&str> {
        self.outputs.last().map(String::as_str)
    }

    /// Exit code requested through [`Console::exit`], if any.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.prompts.push(prompt.to_string());
        self.inputs.pop_front().ok_or_else(end_of_input)
    }

    fn write_line(&mut self, line: &str) {
        self.outputs.push(line.to_string());
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}
