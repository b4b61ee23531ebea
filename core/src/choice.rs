//! Multiple choice configuration: option labeling styles and display modes.
//!
//! A multiple choice question derives its options by zipping a token
//! sequence (the style) with its raw `choices`. Options supplied explicitly
//! are tracked apart from the derived ones so the derived set can be
//! regenerated after a scheme merge without duplicating them.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::{QuizError, Result};
use crate::option::AnswerOption;

/// Names of the built-in labeling styles.
pub const BUILTIN_STYLES: &[&str] = &["letter", "letter_uppercase", "number", "number_fromzero"];

/// Style used when none is configured.
pub const DEFAULT_STYLE: &str = "letter";

type Tokens = Box<dyn Iterator<Item = String>>;

fn builtin_tokens(style: &str) -> Option<Tokens> {
    let tokens: Tokens = match style {
        "letter" => Box::new(('a'..='z').chain('A'..='Z').map(String::from)),
        "letter_uppercase" => Box::new(('A'..='Z').map(String::from)),
        "number" => Box::new((1u64..).map(|n| n.to_string())),
        "number_fromzero" => Box::new((0u64..).map(|n| n.to_string())),
        _ => return None,
    };
    Some(tokens)
}

/// A caller-supplied source of option tokens, finite or unbounded.
///
/// The source is a factory so the sequence can restart every time options
/// are regenerated.
///
/// # Examples
///
/// ```
/// use quizz_core::StyleIterator;
///
/// let love = StyleIterator::from_tokens(["l", "o", "v", "e"]);
/// assert_eq!(love.tokens().collect::<Vec<_>>(), vec!["l", "o", "v", "e"]);
///
/// let roman = StyleIterator::new(|| Box::new(["i", "ii", "iii"].into_iter().map(String::from)));
/// assert_eq!(roman.tokens().count(), 3);
/// ```
#[derive(Clone)]
pub struct StyleIterator(Rc<dyn Fn() -> Tokens>);

impl StyleIterator {
    /// Wraps a factory producing a fresh token sequence on each call.
    pub fn new(factory: impl Fn() -> Box<dyn Iterator<Item = String>> + 'static) -> Self {
        Self(Rc::new(factory))
    }

    /// Uses a fixed list of tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        Self::new(move || Box::new(tokens.clone().into_iter()))
    }

    /// Starts a new token sequence.
    pub fn tokens(&self) -> Box<dyn Iterator<Item = String>> {
        (self.0)()
    }
}

impl fmt::Debug for StyleIterator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StyleIterator(..)")
    }
}

/// Renderer for [`DisplayMode::Custom`]: receives the composed prompt and
/// the rendered option lines.
pub type DisplayRenderer = Rc<dyn Fn(&str, &[String]) -> String>;

/// How options are laid out under the prompt.
#[derive(Clone, Default)]
pub enum DisplayMode {
    /// Options on one line, separated by two spaces.
    #[default]
    Horizontal,
    /// One option per line.
    Vertical,
    /// Options are not shown.
    Hidden,
    /// Caller-supplied layout.
    Custom(DisplayRenderer),
}

impl DisplayMode {
    /// Builds a custom display from a renderer.
    pub fn custom(renderer: impl Fn(&str, &[String]) -> String + 'static) -> Self {
        DisplayMode::Custom(Rc::new(renderer))
    }

    /// Returns the display name (`horizontal`, `vertical`, `hidden`, `custom`).
    pub fn name(&self) -> &'static str {
        match self {
            DisplayMode::Horizontal => "horizontal",
            DisplayMode::Vertical => "vertical",
            DisplayMode::Hidden => "hidden",
            DisplayMode::Custom(_) => "custom",
        }
    }

    /// Lays out `options` under `prompt`. Returns `None` for
    /// [`DisplayMode::Hidden`].
    pub fn render(&self, prompt: &str, options: &[AnswerOption], indicator: &str) -> Option<String> {
        let lines: Vec<String> = options.iter().map(|o| o.render(indicator)).collect();
        match self {
            DisplayMode::Horizontal => Some(separated(prompt, &lines, "  ")),
            DisplayMode::Vertical => Some(separated(prompt, &lines, "\n")),
            DisplayMode::Hidden => None,
            DisplayMode::Custom(renderer) => Some(renderer(prompt, &lines)),
        }
    }
}

fn separated(prompt: &str, lines: &[String], sep: &str) -> String {
    format!("{prompt}\n{}\nYour answer: ", lines.join(sep))
}

impl FromStr for DisplayMode {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "horizontal" => Ok(DisplayMode::Horizontal),
            "vertical" => Ok(DisplayMode::Vertical),
            "hidden" | "none" => Ok(DisplayMode::Hidden),
            other => Err(QuizError::UnknownDisplay(other.to_string())),
        }
    }
}

impl fmt::Debug for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Multiple choice section of a question.
///
/// # Examples
///
/// ```
/// use quizz_core::{DisplayMode, MultipleChoice, Question};
///
/// let question = Question::multiple_choice(
///     "Best pet?",
///     MultipleChoice::new(["Cat", "Dog"]).with_style("number"),
/// )
/// .unwrap();
///
/// let values: Vec<_> = question.options.iter().map(|o| o.value.as_str()).collect();
/// assert_eq!(values, vec!["1", "2"]);
/// ```
#[derive(Debug, Clone)]
pub struct MultipleChoice {
    /// Raw labels turned into options.
    pub choices: Vec<String>,
    /// Option layout.
    pub display: DisplayMode,
    /// Name of a built-in labeling style.
    pub style: String,
    /// Token source taking precedence over `style`.
    pub style_iterator: Option<StyleIterator>,
    pub(crate) primitive_options: Vec<AnswerOption>,
}

impl Default for MultipleChoice {
    fn default() -> Self {
        Self {
            choices: Vec::new(),
            display: DisplayMode::default(),
            style: DEFAULT_STYLE.to_string(),
            style_iterator: None,
            primitive_options: Vec::new(),
        }
    }
}

impl MultipleChoice {
    /// Creates a multiple choice section from raw labels.
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Sets the layout.
    pub fn with_display(mut self, display: DisplayMode) -> Self {
        self.display = display;
        self
    }

    /// Sets the built-in style name.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Sets a custom token source.
    pub fn with_style_iterator(mut self, iterator: StyleIterator) -> Self {
        self.style_iterator = Some(iterator);
        self
    }

    /// Adds an explicit option, listed after the derived ones.
    pub fn with_option(mut self, option: AnswerOption) -> Self {
        self.primitive_options.push(option);
        self
    }

    /// Returns the explicitly supplied options.
    pub fn primitive_options(&self) -> &[AnswerOption] {
        &self.primitive_options
    }

    fn tokens(&self) -> Result<Tokens> {
        if let Some(iterator) = &self.style_iterator {
            return Ok(iterator.tokens());
        }
        builtin_tokens(&self.style).ok_or_else(|| QuizError::UnknownStyle(self.style.clone()))
    }

    /// Derives the effective option list: styled choices, then explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::UnknownStyle`] when no token source resolves and
    /// [`QuizError::NoOptions`] when the result would be empty.
    pub fn derive_options(&self) -> Result<Vec<AnswerOption>> {
        let mut options: Vec<AnswerOption> = self
            .tokens()?
            .zip(&self.choices)
            .map(|(value, expression)| AnswerOption::new(value, expression.clone()))
            .collect();
        options.extend(self.primitive_options.iter().cloned());

        if options.is_empty() {
            return Err(QuizError::NoOptions);
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(mc: &MultipleChoice) -> Vec<String> {
        mc.derive_options()
            .unwrap()
            .into_iter()
            .map(|o| o.value)
            .collect()
    }

    #[test]
    fn test_builtin_styles() {
        let choices = ["one", "two", "three"];
        let cases = [
            ("letter", vec!["a", "b", "c"]),
            ("letter_uppercase", vec!["A", "B", "C"]),
            ("number", vec!["1", "2", "3"]),
            ("number_fromzero", vec!["0", "1", "2"]),
        ];

        for (style, expected) in cases {
            let mc = MultipleChoice::new(choices).with_style(style);
            assert_eq!(values(&mc), expected, "style {style}");
        }
    }

    #[test]
    fn test_letter_style_continues_with_uppercase() {
        let choices: Vec<String> = (0..28).map(|i| format!("choice {i}")).collect();
        let tokens = values(&MultipleChoice::new(choices));
        assert_eq!(tokens[25], "z");
        assert_eq!(tokens[26], "A");
        assert_eq!(tokens[27], "B");
    }

    #[test]
    fn test_short_style_iterator_truncates_choices() {
        let mc = MultipleChoice::new(["a", "b", "c"])
            .with_style_iterator(StyleIterator::from_tokens(["x", "y"]));
        assert_eq!(values(&mc), vec!["x", "y"]);
    }

    #[test]
    fn test_style_iterator_takes_precedence() {
        let mc = MultipleChoice::new(["a"])
            .with_style("bogus")
            .with_style_iterator(StyleIterator::from_tokens(["?"]));
        assert_eq!(values(&mc), vec!["?"]);
    }

    #[test]
    fn test_unknown_style_names_builtins() {
        let err = MultipleChoice::new(["a"])
            .with_style("roman")
            .derive_options()
            .unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, QuizError::UnknownStyle(_)));
        assert!(message.contains("letter, letter_uppercase, number, number_fromzero"));
    }

    #[test]
    fn test_primitive_options_follow_derived() {
        let mc = MultipleChoice::new(["Cat"]).with_option(AnswerOption::new("x", "None"));
        let options = mc.derive_options().unwrap();
        assert_eq!(options[0], AnswerOption::new("a", "Cat"));
        assert_eq!(options[1], AnswerOption::new("x", "None"));
    }

    #[test]
    fn test_empty_choices_fail() {
        let mc = MultipleChoice::new(Vec::<String>::new());
        assert!(matches!(mc.derive_options(), Err(QuizError::NoOptions)));
    }

    #[test]
    fn test_display_layouts() {
        let options = vec![AnswerOption::new("a", "Cat"), AnswerOption::new("b", "Dog")];

        let horizontal = DisplayMode::Horizontal.render("Pet?", &options, ") ");
        assert_eq!(horizontal.as_deref(), Some("Pet?\na) Cat  b) Dog\nYour answer: "));

        let vertical = DisplayMode::Vertical.render("Pet?", &options, ") ");
        assert_eq!(vertical.as_deref(), Some("Pet?\na) Cat\nb) Dog\nYour answer: "));

        assert!(DisplayMode::Hidden.render("Pet?", &options, ") ").is_none());

        let custom = DisplayMode::custom(|prompt, lines| format!("{prompt} [{}] ", lines.join("|")));
        assert_eq!(
            custom.render("Pet?", &options, "=").as_deref(),
            Some("Pet? [a=Cat|b=Dog] ")
        );
    }

    #[test]
    fn test_display_from_str() {
        assert!(matches!("vertical".parse::<DisplayMode>(), Ok(DisplayMode::Vertical)));
        assert!(matches!(
            "diagonal".parse::<DisplayMode>(),
            Err(QuizError::UnknownDisplay(name)) if name == "diagonal"
        ));
    }
}
