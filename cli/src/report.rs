//! Answer reports written after a quiz run.

use quizz_core::{AskOutcome, Question, Quiz};
use serde::Serialize;

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Json,
    Yaml,
    Table,
}

/// Per-question entry of a [`QuizReport`].
#[derive(Debug, Clone, Serialize)]
pub struct QuestionReport {
    /// 1-based position in the quiz.
    pub number: usize,
    pub prompt: String,
    pub answer: Option<String>,
    /// `None` when the question declares no correct answers.
    pub correct: Option<bool>,
    pub attempts: usize,
    pub required: bool,
}

impl QuestionReport {
    fn from_question(number: usize, question: &Question) -> Self {
        let correct = (!question.correct_answers.is_empty()).then(|| question.has_correct_answer());
        Self {
            number,
            prompt: question.prompt.clone(),
            answer: question
                .answer
                .as_ref()
                .map(|a| a.render(&question.option_indicator)),
            correct,
            attempts: question.attempt(),
            required: question.required,
        }
    }
}

/// Summary of a finished (or quit) quiz run.
#[derive(Debug, Clone, Serialize)]
pub struct QuizReport {
    pub source: String,
    pub outcome: String,
    pub finished_at: String,
    pub inquiries: usize,
    pub ready: bool,
    pub done: bool,
    /// Number of questions answered correctly.
    pub score: usize,
    /// Number of questions that declare correct answers.
    pub graded: usize,
    pub questions: Vec<QuestionReport>,
}

fn outcome_name(outcome: AskOutcome) -> &'static str {
    match outcome {
        AskOutcome::Resolved => "resolved",
        AskOutcome::Break => "finished",
        AskOutcome::Quit => "quit",
    }
}

impl QuizReport {
    pub fn new(source: impl Into<String>, quiz: &Quiz, outcome: AskOutcome) -> Self {
        let questions: Vec<QuestionReport> = quiz
            .questions()
            .iter()
            .enumerate()
            .map(|(i, q)| QuestionReport::from_question(i + 1, q))
            .collect();

        Self {
            source: source.into(),
            outcome: outcome_name(outcome).to_string(),
            finished_at: chrono::Utc::now().to_rfc3339(),
            inquiries: quiz.inquiries(),
            ready: quiz.is_ready(),
            done: quiz.is_done(),
            score: questions.iter().filter(|q| q.correct == Some(true)).count(),
            graded: questions.iter().filter(|q| q.correct.is_some()).count(),
            questions,
        }
    }
}

/// Formats a report in the requested format.
pub fn format_report(report: &QuizReport, format: ReportFormat) -> Result<String, String> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        ReportFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        ReportFormat::Table => Ok(report_to_table(report)),
    }
}

fn report_to_table(report: &QuizReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} ({}, {} inquiries, score {}/{})\n",
        report.source, report.outcome, report.inquiries, report.score, report.graded
    ));
    for q in &report.questions {
        let mark = match q.correct {
            Some(true) => "OK",
            Some(false) => "WRONG",
            None => "-",
        };
        out.push_str(&format!(
            "{:>3}. {:<30} {:<20} {:<6} attempts={}\n",
            q.number,
            q.prompt,
            q.answer.as_deref().unwrap_or("No answer"),
            mark,
            q.attempts,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use quizz_core::{Answer, ScriptedConsole};

    use super::*;

    fn answered_quiz() -> Quiz {
        let questions = vec![
            Question::new("Capital of France")
                .unwrap()
                .with_correct_answers(["Paris"]),
            Question::new("Favourite colour").unwrap().with_required(false),
        ];
        let mut quiz = Quiz::new(questions).unwrap();
        let mut console = ScriptedConsole::new(["Paris", "", "!finish"]);
        quiz.start(&mut console).unwrap();
        quiz
    }

    #[test]
    fn test_report_fields() {
        let quiz = answered_quiz();
        let report = QuizReport::new("quiz.yaml", &quiz, AskOutcome::Break);

        assert_eq!(report.outcome, "finished");
        assert_eq!(report.inquiries, 3);
        assert!(report.ready);
        assert!(!report.done);
        assert_eq!((report.score, report.graded), (1, 1));

        let first = &report.questions[0];
        assert_eq!(first.answer.as_deref(), Some("Paris"));
        assert_eq!(first.correct, Some(true));
        assert_eq!(first.attempts, 1);

        let second = &report.questions[1];
        assert_eq!(second.answer, None);
        assert_eq!(second.correct, None);
        assert!(!second.required);
    }

    #[test]
    fn test_option_answers_render_with_indicator() {
        let mut quiz = Quiz::new(vec![Question::new("Pet").unwrap()]).unwrap();
        quiz.questions_mut()[0].answer =
            Some(Answer::Option(quizz_core::AnswerOption::new("a", "Cat")));
        let report = QuizReport::new("q", &quiz, AskOutcome::Quit);
        assert_eq!(report.outcome, "quit");
        assert_eq!(report.questions[0].answer.as_deref(), Some("a) Cat"));
    }

    #[test]
    fn test_format_report() {
        let quiz = answered_quiz();
        let report = QuizReport::new("quiz.yaml", &quiz, AskOutcome::Break);

        let json = format_report(&report, ReportFormat::Json).unwrap();
        assert!(json.contains("\"finished_at\""));
        assert!(json.contains("\"prompt\": \"Capital of France\""));

        let yaml = format_report(&report, ReportFormat::Yaml).unwrap();
        assert!(yaml.contains("outcome: finished"));

        let table = format_report(&report, ReportFormat::Table).unwrap();
        assert!(table.starts_with("quiz.yaml (finished, 3 inquiries, score 1/1)"));
        assert!(table.contains("OK"));
        assert!(table.contains("No answer"));
    }
}
