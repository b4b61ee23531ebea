use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use quizz_core::{AskOutcome, Console, Terminal};
use quizz_definition::QuizDefinition;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod report;

use report::{QuizReport, ReportFormat, format_report};

#[derive(Debug, Parser)]
#[command(name = "quizz")]
#[command(about = "Run console quizzes from YAML or JSON definition files")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a quiz on the terminal and print an answer report.
    Run(RunArgs),
    /// Build a quiz definition without running it.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Quiz definition file (.yaml, .yml or .json).
    file: PathBuf,
    /// Report format.
    #[arg(long, default_value = "table")]
    format: ReportFormat,
    /// Write the report to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Quiz definition file (.yaml, .yml or .json).
    file: PathBuf,
}

/// Terminal console that records a quit request instead of exiting, so the
/// report can still be written.
#[derive(Debug, Default)]
struct Session {
    terminal: Terminal,
    exit_code: Option<i32>,
}

impl Console for Session {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.terminal.read_line(prompt)
    }

    fn write_line(&mut self, line: &str) {
        self.terminal.write_line(line);
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Run(args) => run_quiz(args),
        Command::Check(args) => run_check(args),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn load(path: &Path) -> Result<QuizDefinition, String> {
    QuizDefinition::load(path).map_err(|err| format!("Failed to load '{}': {err}", path.display()))
}

fn run_quiz(args: RunArgs) -> Result<i32, String> {
    let definition = load(&args.file)?;
    let mut quiz = definition
        .build()
        .map_err(|err| format!("Failed to build '{}': {err}", args.file.display()))?;
    info!(file = %args.file.display(), "Running quiz");

    let mut session = Session::default();
    let outcome = quiz.start(&mut session).map_err(|err| err.to_string())?;
    debug!(?outcome, "Quiz chain ended");

    let report = QuizReport::new(args.file.display().to_string(), &quiz, outcome);
    let raw = format_report(&report, args.format)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| {
                        format!(
                            "Failed to create output directory '{}': {err}",
                            parent.display()
                        )
                    })?;
                }
            }
            fs::write(path, raw)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            println!("Wrote report to '{}'.", path.display());
        }
        None => print!("{raw}"),
    }

    let code = match outcome {
        AskOutcome::Quit => session.exit_code.unwrap_or(0),
        _ => 0,
    };
    Ok(code)
}

fn run_check(args: CheckArgs) -> Result<i32, String> {
    let definition = load(&args.file)?;
    let quiz = definition
        .build()
        .map_err(|err| format!("Failed to build '{}': {err}", args.file.display()))?;

    let questions = quiz.questions();
    let multiple_choice = questions.iter().filter(|q| q.is_multiple_choice()).count();
    println!(
        "Checked '{}': {} question(s), {} required, {} multiple choice, {} named scheme(s).",
        args.file.display(),
        questions.len(),
        quiz.min_inquiries(),
        multiple_choice,
        definition.schemes.len()
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run_arguments() {
        let cli = Cli::try_parse_from([
            "quizz", "-vv", "run", "quiz.yaml", "--format", "json", "--output", "out.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.file, PathBuf::from("quiz.yaml"));
        assert_eq!(args.format, ReportFormat::Json);
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["quizz", "run", "quiz.yaml", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_session_records_exit() {
        let mut session = Session::default();
        session.exit(0);
        assert_eq!(session.exit_code, Some(0));
    }
}
