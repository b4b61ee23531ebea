//! Quiz orchestration over an ordered list of questions.

use std::rc::Rc;

use tracing::{debug, info};

use crate::command::Command;
use crate::console::Console;
use crate::engine::{self, AskOutcome, Step};
use crate::error::{QuizError, Result};
use crate::question::Question;
use crate::scheme::Scheme;

/// Navigation state shared with running commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QuizState {
    pub(crate) index: usize,
    pub(crate) inquiries: usize,
    pub(crate) ready_verbose: bool,
    pub(crate) done_verbose: bool,
}

impl Default for QuizState {
    fn default() -> Self {
        Self {
            index: 0,
            inquiries: 0,
            ready_verbose: true,
            done_verbose: true,
        }
    }
}

/// Returns `(ready, done)` for `questions` after `inquiries` presentations.
///
/// Ready: at least as many presentations as required questions, and every
/// required question answered. Done: ready and every question answered.
pub(crate) fn readiness(questions: &[Question], inquiries: usize) -> (bool, bool) {
    let min_inquiries = questions.iter().filter(|q| q.required).count();
    let ready = inquiries >= min_inquiries
        && questions
            .iter()
            .filter(|q| q.required)
            .all(Question::has_answer);
    let done = ready && questions.iter().all(Question::has_answer);
    (ready, done)
}

/// An ordered set of questions asked as one test.
///
/// Questions are owned by the quiz; the quiz scheme is mounted on each of
/// them when the quiz is built and again on [`update`](Self::update).
///
/// # Examples
///
/// ```
/// use quizz_core::{Question, Quiz, ScriptedConsole};
///
/// let mut quiz = Quiz::new(vec![
///     Question::new("Name").unwrap(),
///     Question::new("Surname").unwrap(),
/// ])
/// .unwrap();
///
/// let mut console = ScriptedConsole::new(["Ada", "Lovelace", "!finish"]);
/// quiz.start(&mut console).unwrap();
///
/// assert!(quiz.is_done());
/// assert_eq!(quiz.inquiries(), 3);
/// ```
#[derive(Debug)]
pub struct Quiz {
    questions: Vec<Question>,
    state: QuizState,
    scheme: Rc<Scheme>,
}

impl Quiz {
    /// Builds a quiz whose scheme adds the `finish` command.
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        let scheme = Scheme {
            commands: Some(vec![Command::Finish]),
            ..Default::default()
        };
        Self::with_scheme(questions, Rc::new(scheme))
    }

    /// Builds a quiz mounting `scheme` on every question.
    ///
    /// # Errors
    ///
    /// Fails when the scheme cannot be merged onto a question.
    pub fn with_scheme(questions: Vec<Question>, scheme: Rc<Scheme>) -> Result<Self> {
        let mut quiz = Self {
            questions,
            state: QuizState::default(),
            scheme,
        };
        quiz.update(false)?;
        Ok(quiz)
    }

    /// Attaches every question and mounts the quiz scheme on it.
    ///
    /// Call after changing the list through
    /// [`questions_mut`](Self::questions_mut).
    pub fn update(&mut self, force_scheme: bool) -> Result<()> {
        for (sequence, question) in self.questions.iter_mut().enumerate() {
            question.sequence = Some(sequence);
            question.update_scheme(&self.scheme, force_scheme)?;
        }
        Ok(())
    }

    /// Appends a question and attaches it.
    pub fn push(&mut self, question: Question) -> Result<()> {
        self.questions.push(question);
        self.update(false)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn questions_mut(&mut self) -> &mut Vec<Question> {
        &mut self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }

    pub fn scheme(&self) -> &Rc<Scheme> {
        &self.scheme
    }

    /// Index of the question asked last (or to be asked by `start`).
    pub fn index(&self) -> usize {
        self.state.index
    }

    /// Number of presentations made so far, retries included.
    pub fn inquiries(&self) -> usize {
        self.state.inquiries
    }

    pub fn required_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.required)
    }

    /// Presentations needed before the quiz can be ready.
    pub fn min_inquiries(&self) -> usize {
        self.required_questions().count()
    }

    /// All required questions answered, after at least
    /// [`min_inquiries`](Self::min_inquiries) presentations.
    pub fn is_ready(&self) -> bool {
        readiness(&self.questions, self.state.inquiries).0
    }

    /// Ready, and every question answered.
    pub fn is_done(&self) -> bool {
        readiness(&self.questions, self.state.inquiries).1
    }

    /// The question at `index`; out of range (negative included) gives the
    /// first question, and `None` only for an empty quiz.
    pub fn jump(&self, index: isize) -> Option<&Question> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.questions.get(i))
            .or_else(|| self.questions.first())
    }

    /// Asks the question at the current index, then follows navigation
    /// until a command ends the chain.
    ///
    /// # Errors
    ///
    /// [`QuizError::EmptyQuiz`] when there are no questions, and any error
    /// raised while asking (end of input included).
    pub fn start(&mut self, console: &mut dyn Console) -> Result<AskOutcome> {
        self.ask(self.state.index, console)
    }

    /// Asks the question at `index` (wrapping to the first when out of
    /// range), then follows navigation.
    pub fn ask(&mut self, index: usize, console: &mut dyn Console) -> Result<AskOutcome> {
        if self.questions.is_empty() {
            return Err(QuizError::EmptyQuiz);
        }
        info!(questions = self.questions.len(), "Starting quiz");

        let total = self.questions.len();
        let mut current = if index < total { index } else { 0 };
        loop {
            self.state.index = current;
            self.state.inquiries += 1;
            self.notify(console);

            let signal =
                engine::present(&mut self.questions, current, Some(&self.state), console)?;
            match engine::transition(
                signal,
                &self.questions[current],
                current,
                Some(total),
                console,
            )? {
                Step::Stay => {}
                Step::Goto(next) => {
                    debug!(from = current, to = next, "Moving to question");
                    current = next;
                }
                Step::End(outcome) => {
                    info!(?outcome, inquiries = self.state.inquiries, "Quiz ended");
                    return Ok(outcome);
                }
            }
        }
    }

    /// Writes the ready/done notice before a question is presented.
    fn notify(&mut self, console: &mut dyn Console) {
        let (ready, done) = readiness(&self.questions, self.state.inquiries);
        if done {
            console.write_line(done_message(self.state.done_verbose));
            self.state.done_verbose = false;
        } else if ready {
            let optional: Vec<String> = self
                .questions
                .iter()
                .filter(|q| !q.required && !q.has_answer())
                .map(|q| (q.sequence() + 1).to_string())
                .collect();
            console.write_line(&ready_message(self.state.ready_verbose, &optional.join(", ")));
            self.state.ready_verbose = false;
        }
    }
}

fn ready_message(verbose: bool, sequences: &str) -> String {
    if verbose {
        format!(
            "\nYou now have answered all the required questions on this test. \
             You may finish, but There are still some optional questions left ({sequences}).\n"
        )
    } else {
        format!("\n[Ready, some optional questions left ({sequences}).]\n")
    }
}

fn done_message(verbose: bool) -> &'static str {
    if verbose {
        "\nYou now have answered all the questions on this test. \
         You may finish or revise your questions if you want.\n"
    } else {
        "\n[Completed, waiting for finish command.]\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    fn quiz(n: usize) -> Quiz {
        let questions = (1..=n)
            .map(|i| Question::new(format!("Q{i}")).unwrap())
            .collect();
        Quiz::new(questions).unwrap()
    }

    #[test]
    fn test_new_attaches_and_mounts() {
        let quiz = quiz(3);
        for (i, question) in quiz.questions().iter().enumerate() {
            assert!(question.is_attached());
            assert_eq!(question.sequence(), i);
            assert_eq!(question.commands, vec![Command::Finish]);
            assert!(Rc::ptr_eq(&question.mounted_schemes()[0], quiz.scheme()));
        }
    }

    #[test]
    fn test_update_does_not_remount() {
        let mut quiz = quiz(2);
        quiz.update(false).unwrap();
        assert_eq!(quiz.questions()[0].commands.len(), 1);
        quiz.update(true).unwrap();
        assert_eq!(quiz.questions()[0].commands.len(), 2);
    }

    #[test]
    fn test_push_attaches() {
        let mut quiz = quiz(1);
        quiz.push(Question::new("Late").unwrap()).unwrap();
        let late = quiz.question(1).unwrap();
        assert_eq!(late.sequence(), 1);
        assert_eq!(late.commands, vec![Command::Finish]);
    }

    #[test]
    fn test_jump_wraps_to_first() {
        let quiz = quiz(3);
        assert_eq!(quiz.jump(1).unwrap().prompt, "Q2");
        assert_eq!(quiz.jump(99).unwrap().prompt, "Q1");
        assert_eq!(quiz.jump(-1).unwrap().prompt, "Q1");
    }

    #[test]
    fn test_empty_quiz_cannot_start() {
        let mut quiz = Quiz::new(Vec::new()).unwrap();
        assert!(quiz.jump(0).is_none());
        let mut console = ScriptedConsole::default();
        assert!(matches!(quiz.start(&mut console), Err(QuizError::EmptyQuiz)));
    }

    #[test]
    fn test_min_inquiries_counts_required() {
        let mut quiz = quiz(3);
        quiz.questions_mut()[0].required = false;
        assert_eq!(quiz.min_inquiries(), 2);
        assert_eq!(quiz.required_questions().count(), 2);
    }

    #[test]
    fn test_readiness_needs_inquiries() {
        let mut questions = vec![Question::new("Q").unwrap()];
        questions[0].answer = Some(crate::Answer::Text("a".into()));
        assert_eq!(readiness(&questions, 0), (false, false));
        assert_eq!(readiness(&questions, 1), (true, true));
    }

    #[test]
    fn test_ready_message_lists_optional_questions() {
        assert_eq!(
            ready_message(false, "2, 3"),
            "\n[Ready, some optional questions left (2, 3).]\n"
        );
        assert!(ready_message(true, "2").contains("optional questions left (2)."));
    }
}
