//! In-prompt commands.
//!
//! A respondent runs a command by typing the question's delimiter followed
//! by the command expression and optional arguments (`!jump 3`). Commands
//! return an optional [`Signal`] that tells the ask loop what to do next;
//! returning no signal lets the answer flow continue as if nothing was
//! typed (a required question without an answer is asked again).

use std::fmt;
use std::rc::Rc;

use crate::console::Console;
use crate::error::{QuizError, Result};
use crate::question::Question;
use crate::quiz::{QuizState, readiness};

/// Where a [`Signal::Jump`] should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTarget {
    /// Zero-based question index; out of range lands on the first question.
    Index(usize),
    /// The question after the current one.
    Next,
    /// The question before the current one.
    Previous,
}

/// Control signal returned by commands and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Ask the same question again.
    Continue,
    /// Stop asking, leaving the chain without further navigation.
    Break,
    /// Ask another question of the quiz.
    Jump(JumpTarget),
    /// Terminate the program with exit status 0.
    Quit,
}

/// Everything a command may inspect or change while it runs.
///
/// For a standalone question [`questions`](Self::questions) holds just that
/// question and the quiz accessors return `None`.
pub struct CommandContext<'a> {
    questions: &'a mut [Question],
    current: usize,
    quiz: Option<&'a QuizState>,
    console: &'a mut dyn Console,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(
        questions: &'a mut [Question],
        current: usize,
        quiz: Option<&'a QuizState>,
        console: &'a mut dyn Console,
    ) -> Self {
        Self {
            questions,
            current,
            quiz,
            console,
        }
    }

    /// The question the command was typed into.
    pub fn question(&self) -> &Question {
        &self.questions[self.current]
    }

    /// Mutable access to the question the command was typed into.
    pub fn question_mut(&mut self) -> &mut Question {
        &mut self.questions[self.current]
    }

    /// All questions of the quiz, in order.
    pub fn questions(&self) -> &[Question] {
        &self.questions[..]
    }

    /// Returns `true` when the question belongs to a quiz.
    pub fn in_quiz(&self) -> bool {
        self.quiz.is_some()
    }

    /// Current quiz navigation index.
    pub fn quiz_index(&self) -> Option<usize> {
        self.quiz.map(|state| state.index)
    }

    /// Number of presentations the quiz has made so far.
    pub fn inquiries(&self) -> Option<usize> {
        self.quiz.map(|state| state.inquiries)
    }

    /// Whether the quiz is ready to finish.
    pub fn is_ready(&self) -> Option<bool> {
        self.quiz
            .map(|state| readiness(&self.questions[..], state.inquiries).0)
    }

    /// Writes a line to the console.
    pub fn write(&mut self, line: &str) {
        self.console.write_line(line);
    }

    fn require_quiz(&self, command: &str) -> Result<&'a QuizState> {
        self.quiz
            .ok_or_else(|| QuizError::MissingQuiz(command.to_string()))
    }
}

/// Handler of a user-defined command.
pub type CommandHandler = Rc<dyn Fn(&mut CommandContext<'_>, &[&str]) -> Result<Option<Signal>>>;

/// Options of the [`Command::Help`] command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpCommand {
    /// Text printed before the command list.
    pub message: String,
    /// Whether to list the question's commands.
    pub with_command_list: bool,
}

impl Default for HelpCommand {
    fn default() -> Self {
        Self {
            message: String::new(),
            with_command_list: true,
        }
    }
}

/// A user-defined command.
#[derive(Clone)]
pub struct CustomCommand {
    expression: String,
    description: String,
    handler: CommandHandler,
}

/// A command that can be typed at a question prompt.
///
/// # Examples
///
/// ```
/// use quizz_core::{Command, Question, ScriptedConsole, Signal};
///
/// let meow = Command::custom("meow", "Meows.", |ctx, _args| {
///     ctx.write("Meow!");
///     Ok(Some(Signal::Continue))
/// });
///
/// let mut question = Question::new("Pet?").unwrap().with_command(meow);
/// let mut console = ScriptedConsole::new(["!meow", "Cat"]);
/// question.ask(&mut console).unwrap();
///
/// assert_eq!(console.outputs(), ["Meow!"]);
/// assert_eq!(question.attempt(), 2);
/// ```
#[derive(Clone)]
pub enum Command {
    Skip,
    Quit,
    Help(HelpCommand),
    Jump,
    Next,
    Previous,
    Finish,
    Answers,
    Custom(CustomCommand),
}

impl Command {
    /// Expressions of the built-in commands.
    pub const BUILTIN: [&'static str; 8] = [
        "skip", "quit", "help", "jump", "next", "previous", "finish", "answers",
    ];

    /// Help with the default (empty) message and the command list.
    pub fn help() -> Self {
        Command::Help(HelpCommand::default())
    }

    /// Help with a custom message.
    pub fn help_with(message: impl Into<String>, with_command_list: bool) -> Self {
        Command::Help(HelpCommand {
            message: message.into(),
            with_command_list,
        })
    }

    /// A user-defined command.
    pub fn custom(
        expression: impl Into<String>,
        description: impl Into<String>,
        handler: impl Fn(&mut CommandContext<'_>, &[&str]) -> Result<Option<Signal>> + 'static,
    ) -> Self {
        Command::Custom(CustomCommand {
            expression: expression.into(),
            description: description.into(),
            handler: Rc::new(handler),
        })
    }

    /// Looks up a built-in command by expression.
    pub fn builtin(expression: &str) -> Option<Self> {
        let command = match expression {
            "skip" => Command::Skip,
            "quit" => Command::Quit,
            "help" => Command::help(),
            "jump" => Command::Jump,
            "next" => Command::Next,
            "previous" => Command::Previous,
            "finish" => Command::Finish,
            "answers" => Command::Answers,
            _ => return None,
        };
        Some(command)
    }

    /// The word typed after the delimiter.
    pub fn expression(&self) -> &str {
        match self {
            Command::Skip => "skip",
            Command::Quit => "quit",
            Command::Help(_) => "help",
            Command::Jump => "jump",
            Command::Next => "next",
            Command::Previous => "previous",
            Command::Finish => "finish",
            Command::Answers => "answers",
            Command::Custom(custom) => &custom.expression,
        }
    }

    /// One-line description shown by the help command.
    pub fn description(&self) -> &str {
        match self {
            Command::Skip => "Skips this question without answering.",
            Command::Quit => "Quits the program.",
            Command::Help(_) => "Shows the help message.",
            Command::Jump => "Jumps to specified question. Usage: jump <number>",
            Command::Next => "Jumps to next question.",
            Command::Previous => "Jumps to previous question.",
            Command::Finish => "Finishes the quiz.",
            Command::Answers => "Shows the current answers for each question in the quiz.",
            Command::Custom(custom) => &custom.description,
        }
    }

    /// Runs the command against the question in `ctx`.
    ///
    /// # Errors
    ///
    /// Quiz commands (`jump`, `next`, `previous`, `finish`, `answers`) fail
    /// with [`QuizError::MissingQuiz`] on a standalone question.
    pub fn execute(&self, ctx: &mut CommandContext<'_>, args: &[&str]) -> Result<Option<Signal>> {
        match self {
            Command::Skip => {
                ctx.write("You decided to skip this question.");
                ctx.question_mut().answer = None;
                Ok(None)
            }
            Command::Quit => Ok(Some(Signal::Quit)),
            Command::Help(help) => {
                let mut message = help.message.clone();
                if help.with_command_list {
                    message.push_str(&available_commands(ctx.question()));
                }
                ctx.write(&message);
                Ok(Some(Signal::Continue))
            }
            Command::Jump => jump(ctx, args),
            Command::Next => {
                ctx.require_quiz(self.expression())?;
                Ok(Some(Signal::Jump(JumpTarget::Next)))
            }
            Command::Previous => {
                ctx.require_quiz(self.expression())?;
                Ok(Some(Signal::Jump(JumpTarget::Previous)))
            }
            Command::Finish => finish(ctx),
            Command::Answers => answers(ctx),
            Command::Custom(custom) => (custom.handler)(ctx, args),
        }
    }
}

fn available_commands(question: &Question) -> String {
    let delimiter = &question.command_delimiter;
    let lines: String = question
        .commands
        .iter()
        .map(|cmd| format!("{delimiter}{}: {}\n", cmd.expression(), cmd.description()))
        .collect();
    format!("\nAvailable commands are:\n{lines}")
}

fn jump(ctx: &mut CommandContext<'_>, args: &[&str]) -> Result<Option<Signal>> {
    ctx.require_quiz("jump")?;

    let Some(raw) = args.first() else {
        ctx.write("Please specify a question number to jump.");
        return Ok(Some(Signal::Continue));
    };

    let is_digit = !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit());
    let number = raw.parse::<usize>().ok();

    if !is_digit || number == Some(0) {
        ctx.write("Question number needs to be a positive integer.");
        return Ok(Some(Signal::Continue));
    }

    let count = ctx.questions().len();
    match number {
        Some(number) if number <= count => {
            ctx.write(&format!("Jumped to question {raw}."));
            Ok(Some(Signal::Jump(JumpTarget::Index(number - 1))))
        }
        // Digits that overflow usize are out of range too.
        _ => {
            let shown = number.map_or_else(|| raw.to_string(), |n| n.to_string());
            ctx.write(&format!("Can't jump to question {shown}, no such question."));
            Ok(Some(Signal::Continue))
        }
    }
}

fn finish(ctx: &mut CommandContext<'_>) -> Result<Option<Signal>> {
    let state = ctx.require_quiz("finish")?;
    let (ready, _) = readiness(ctx.questions(), state.inquiries);
    if ready {
        return Ok(Some(Signal::Break));
    }

    let missing: Vec<String> = ctx
        .questions()
        .iter()
        .enumerate()
        .filter(|(_, q)| q.required && !q.has_answer())
        .map(|(i, _)| (i + 1).to_string())
        .collect();
    ctx.write(&format!(
        "There are still some required questions to answer: ({})",
        missing.join(", ")
    ));
    Ok(Some(Signal::Continue))
}

fn answers(ctx: &mut CommandContext<'_>) -> Result<Option<Signal>> {
    ctx.require_quiz("answers")?;

    let clauses: Vec<String> = ctx
        .questions()
        .iter()
        .enumerate()
        .map(|(i, q)| match &q.answer {
            Some(answer) => format!(
                "{}. {} -> [{}]",
                i + 1,
                q.prompt,
                answer.render(&q.option_indicator)
            ),
            None => format!("~{}. {} -> [No answer]", i + 1, q.prompt),
        })
        .collect();
    ctx.write(&format!("\nCurrent answers:\n{}\n", clauses.join("\n")));
    Ok(Some(Signal::Continue))
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Command::Help(a), Command::Help(b)) => a == b,
            (Command::Custom(a), Command::Custom(b)) => {
                a.expression == b.expression && Rc::ptr_eq(&a.handler, &b.handler)
            }
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Help(help) => f.debug_tuple("Help").field(help).finish(),
            Command::Custom(custom) => f.debug_tuple("Custom").field(&custom.expression).finish(),
            other => f.write_str(other.expression()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    fn run(
        command: &Command,
        questions: &mut [Question],
        state: Option<&QuizState>,
        args: &[&str],
    ) -> (Result<Option<Signal>>, ScriptedConsole) {
        let mut console = ScriptedConsole::default();
        let result = {
            let mut ctx = CommandContext::new(questions, 0, state, &mut console);
            command.execute(&mut ctx, args)
        };
        (result, console)
    }

    fn questions(n: usize) -> Vec<Question> {
        (1..=n)
            .map(|i| Question::new(format!("Q{i}")).unwrap())
            .collect()
    }

    #[test]
    fn test_builtin_lookup_matches_expression() {
        for name in Command::BUILTIN {
            let command = Command::builtin(name).unwrap();
            assert_eq!(command.expression(), name);
        }
        assert!(Command::builtin("meow").is_none());
    }

    #[test]
    fn test_skip_clears_answer() {
        let mut qs = questions(1);
        qs[0].answer = Some(crate::Answer::Text("x".into()));
        let (result, console) = run(&Command::Skip, &mut qs, None, &[]);
        assert_eq!(result.unwrap(), None);
        assert!(qs[0].answer.is_none());
        assert_eq!(console.outputs(), ["You decided to skip this question."]);
    }

    #[test]
    fn test_help_lists_commands() {
        let mut qs = vec![
            Question::new("Q")
                .unwrap()
                .with_command(Command::help_with("Hi!", true))
                .with_command(Command::Skip),
        ];
        let (result, console) = run(&Command::help_with("Hi!", true), &mut qs, None, &[]);
        assert_eq!(result.unwrap(), Some(Signal::Continue));
        assert_eq!(
            console.outputs(),
            ["Hi!\nAvailable commands are:\n!help: Shows the help message.\n!skip: Skips this question without answering.\n"]
        );
    }

    #[test]
    fn test_help_without_command_list() {
        let mut qs = questions(1);
        let (_, console) = run(&Command::help_with("Only this.", false), &mut qs, None, &[]);
        assert_eq!(console.outputs(), ["Only this."]);
    }

    #[test]
    fn test_jump_argument_errors() {
        let state = QuizState::default();
        let mut qs = questions(3);

        let (result, console) = run(&Command::Jump, &mut qs, Some(&state), &[]);
        assert_eq!(result.unwrap(), Some(Signal::Continue));
        assert_eq!(console.outputs(), ["Please specify a question number to jump."]);

        for bad in ["0", "-1", "two", "1.5"] {
            let (result, console) = run(&Command::Jump, &mut qs, Some(&state), &[bad]);
            assert_eq!(result.unwrap(), Some(Signal::Continue));
            assert_eq!(
                console.outputs(),
                ["Question number needs to be a positive integer."],
                "argument {bad}"
            );
        }

        let (result, console) = run(&Command::Jump, &mut qs, Some(&state), &["4"]);
        assert_eq!(result.unwrap(), Some(Signal::Continue));
        assert_eq!(console.outputs(), ["Can't jump to question 4, no such question."]);
    }

    #[test]
    fn test_jump_to_question() {
        let state = QuizState::default();
        let mut qs = questions(3);
        let (result, console) = run(&Command::Jump, &mut qs, Some(&state), &["3"]);
        assert_eq!(result.unwrap(), Some(Signal::Jump(JumpTarget::Index(2))));
        assert_eq!(console.outputs(), ["Jumped to question 3."]);
    }

    #[test]
    fn test_quiz_commands_need_quiz() {
        let mut qs = questions(1);
        for command in [Command::Jump, Command::Next, Command::Previous, Command::Finish, Command::Answers] {
            let (result, _) = run(&command, &mut qs, None, &["1"]);
            assert!(matches!(result, Err(QuizError::MissingQuiz(_))), "{command:?}");
        }
    }

    #[test]
    fn test_finish_lists_missing_required() {
        let state = QuizState::default();
        let mut qs = questions(3);
        qs[1].required = false;

        let (result, console) = run(&Command::Finish, &mut qs, Some(&state), &[]);
        assert_eq!(result.unwrap(), Some(Signal::Continue));
        assert_eq!(
            console.outputs(),
            ["There are still some required questions to answer: (1, 3)"]
        );
    }

    #[test]
    fn test_answers_lists_every_question() {
        let state = QuizState::default();
        let mut qs = questions(2);
        qs[0].answer = Some(crate::Answer::Option(crate::AnswerOption::new("A", "Cat")));

        let (_, console) = run(&Command::Answers, &mut qs, Some(&state), &[]);
        assert_eq!(
            console.outputs(),
            ["\nCurrent answers:\n1. Q1 -> [A) Cat]\n~2. Q2 -> [No answer]\n"]
        );
    }

    #[test]
    fn test_command_equality() {
        assert_eq!(Command::Skip, Command::Skip);
        assert_ne!(Command::Skip, Command::Quit);
        assert_eq!(Command::help(), Command::help());

        let custom = Command::custom("x", "", |_, _| Ok(None));
        assert_eq!(custom, custom.clone());
        assert_ne!(custom, Command::custom("x", "", |_, _| Ok(None)));
    }
}
