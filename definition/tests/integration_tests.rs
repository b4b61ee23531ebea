use std::io::Write;
use std::path::PathBuf;

use quizz_core::{Answer, AnswerOption, AskOutcome, ScriptedConsole};
use quizz_definition::{DefinitionError, QuizDefinition};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SAMPLE_YAML: &str = r#"
schemes:
  pick:
    style: letter_uppercase
    display: vertical
    commands: [next, previous]
scheme:
  commands: [finish, answers, quit]
questions:
  - prompt: Best pet?
    choices: [Cat, Dog]
    scheme: pick
    correct_answers: [A]
  - prompt: Your name
    validators:
      - { kind: alpha, message: "Letters only." }
    required: false
"#;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    path
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn test_load_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "quiz.yaml", SAMPLE_YAML);

    let definition = QuizDefinition::load(&path).unwrap();
    assert_eq!(definition.questions.len(), 2);
    assert!(definition.schemes.contains_key("pick"));
}

#[test]
fn test_load_json_file() {
    let dir = TempDir::new().unwrap();
    let json = r#"{
        "questions": [
            { "prompt": "Name", "validators": [{ "kind": "min_length", "against": 2 }] }
        ]
    }"#;
    let path = write_file(&dir, "quiz.json", json);

    let definition = QuizDefinition::load(&path).unwrap();
    assert_eq!(definition.questions[0].prompt, "Name");
    assert_eq!(definition.questions[0].validators[0].kind, "min_length");
}

#[test]
fn test_load_rejects_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "quiz.toml", "questions = []");
    assert!(matches!(
        QuizDefinition::load(&path),
        Err(DefinitionError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = QuizDefinition::load(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(DefinitionError::IoError(_))));
}

#[test]
fn test_load_malformed_yaml() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "quiz.yml", "questions: [prompt: ");
    assert!(matches!(
        QuizDefinition::load(&path),
        Err(DefinitionError::YamlError(_))
    ));
}

// ---------------------------------------------------------------------------
// Building and running
// ---------------------------------------------------------------------------

#[test]
fn test_built_quiz_runs() {
    let mut quiz = QuizDefinition::from_yaml_str(SAMPLE_YAML)
        .unwrap()
        .build()
        .unwrap();
    let mut console = ScriptedConsole::new(["A", "R2", "Ada", "!finish"]);

    assert_eq!(quiz.start(&mut console).unwrap(), AskOutcome::Break);

    let pet = &quiz.questions()[0];
    assert_eq!(pet.answer, Some(Answer::Option(AnswerOption::new("A", "Cat"))));
    assert!(pet.has_correct_answer());
    assert_eq!(
        console.prompts()[0],
        "* Question 1/2. [No answer]\nBest pet?\nA) Cat\nB) Dog\nYour answer: "
    );

    let name = &quiz.questions()[1];
    assert_eq!(name.answer, Some(Answer::Text("Ada".into())));
    assert_eq!(name.attempt(), 2);
    assert!(console.outputs().iter().any(|line| line == "Letters only."));
}

#[test]
fn test_command_order_follows_layers() {
    let quiz = QuizDefinition::from_yaml_str(
        r#"
schemes:
  nav: { commands: [next] }
scheme: { commands: [finish] }
questions:
  - { prompt: A, commands: [skip], scheme: nav }
"#,
    )
    .unwrap()
    .build()
    .unwrap();

    let expressions: Vec<_> = quiz.questions()[0]
        .commands
        .iter()
        .map(|c| c.expression().to_string())
        .collect();
    assert_eq!(expressions, vec!["skip", "next", "finish"]);
}

#[test]
fn test_unknown_command_is_definition_error() {
    let definition =
        QuizDefinition::from_yaml_str("questions:\n  - { prompt: A, commands: [teleport] }\n")
            .unwrap();
    let err = definition.build().unwrap_err();
    assert_eq!(err.to_string(), "unknown command 'teleport'");
}

#[test]
fn test_multiple_choice_without_options_fails() {
    let definition =
        QuizDefinition::from_yaml_str("questions:\n  - { prompt: A, choices: [] }\n").unwrap();
    assert!(matches!(definition.build(), Err(DefinitionError::Quiz(_))));
}
