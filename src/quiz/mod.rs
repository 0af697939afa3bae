// src/quiz/mod.rs
// Quiz domain types: requests, questions, quizzes

pub mod normalize;
pub mod prompt;
pub mod session;

use crate::error::{QuizError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub use normalize::{build_quiz, normalize};
pub use prompt::build_prompt;
pub use session::{QuizOutcome, QuizSession, ScoreReport, generate_quiz};

/// Smallest quiz a user can ask for
pub const MIN_QUESTIONS: usize = 1;
/// Largest quiz a user can ask for
pub const MAX_QUESTIONS: usize = 20;

/// Answer line used when the backend never stated one
pub const ANSWER_NOT_PROVIDED: &str = "Answer: Not provided";

/// First standalone capital A-D; "Answer" itself must not count as an A
static ANSWER_LETTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-D])\b").expect("valid answer letter regex"));
/// Letter right after "answer:", in either case
static LABELED_ANSWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\banswer\s*:\s*([A-D])\b").expect("valid labeled answer regex"));

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

/// Option label of a multiple-choice question
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Label {
    A,
    B,
    C,
    D,
}

impl Label {
    pub const ALL: [Label; 4] = [Label::A, Label::B, Label::C, Label::D];

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Label::A),
            'B' => Some(Label::B),
            'C' => Some(Label::C),
            'D' => Some(Label::D),
            _ => None,
        }
    }
}

/// What the user asked for; validated once, then read-only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    topic: String,
    difficulty: Difficulty,
    count: usize,
}

impl QuizRequest {
    pub fn new(topic: impl Into<String>, difficulty: Difficulty, count: usize) -> Result<Self> {
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return Err(QuizError::InvalidInput("topic must not be empty".into()));
        }
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&count) {
            return Err(QuizError::InvalidInput(format!(
                "question count must be between {} and {}, got {}",
                MIN_QUESTIONS, MAX_QUESTIONS, count
            )));
        }
        Ok(Self {
            topic,
            difficulty,
            count,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// One multiple-choice question.
///
/// `correct_answer` is whatever the backend gave: a bare letter from JSON
/// output, or a whole "Answer: ..." line from prose. Use
/// [`Question::correct_label`] to compare against a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub options: BTreeMap<Label, String>,
    #[serde(rename = "answer")]
    pub correct_answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// Options rendered as "A) text", in label order
    pub fn option_lines(&self) -> Vec<String> {
        self.options
            .iter()
            .map(|(label, text)| format!("{}) {}", label, text))
            .collect()
    }

    /// The answer's A-D letter, if one can be read without guessing
    pub fn correct_label(&self) -> Option<Label> {
        extract_answer_label(&self.correct_answer)
    }

    /// True when all four canonical options are present
    pub fn has_all_options(&self) -> bool {
        Label::ALL.iter().all(|l| self.options.contains_key(l)) && self.options.len() == 4
    }
}

/// Extract the answer letter; never guesses.
///
/// A bare letter or one directly after `answer:` may be lowercase. Anywhere
/// else only a standalone capital counts, since "a" is usually the article.
pub fn extract_answer_label(answer: &str) -> Option<Label> {
    let trimmed = answer.trim();
    let mut chars = trimmed.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Label::from_char(c);
    }

    LABELED_ANSWER
        .captures(trimmed)
        .or_else(|| ANSWER_LETTER.captures(trimmed))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
        .and_then(Label::from_char)
}

/// A normalized quiz; never longer than the request asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quiz {
    pub topic: String,
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl fmt::Display for Quiz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.topic, self.difficulty)?;
        for (i, q) in self.questions.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Q{}. {}", i + 1, q.text)?;
            for line in q.option_lines() {
                writeln!(f, "   {}", line)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn question(answer: &str) -> Question {
        Question {
            text: "What is 2+2?".into(),
            options: BTreeMap::from([(Label::A, "3".into()), (Label::B, "4".into())]),
            correct_answer: answer.into(),
            explanation: None,
        }
    }

    #[test]
    fn test_difficulty_parse_and_display() {
        assert_eq!(Difficulty::from_str("easy").unwrap(), Difficulty::Easy);
        assert_eq!(Difficulty::from_str("HARD").unwrap(), Difficulty::Hard);
        assert!(Difficulty::from_str("extreme").is_err());
        assert_eq!(Difficulty::Medium.to_string(), "medium");
    }

    #[test]
    fn test_label_parse() {
        assert_eq!(Label::from_str("b").unwrap(), Label::B);
        assert_eq!(Label::from_char('d'), Some(Label::D));
        assert_eq!(Label::from_char('E'), None);
        assert_eq!(Label::C.to_string(), "C");
    }

    #[test]
    fn test_request_validation() {
        assert!(QuizRequest::new("Rust", Difficulty::Easy, 1).is_ok());
        assert!(QuizRequest::new("Rust", Difficulty::Easy, 20).is_ok());
        assert!(matches!(
            QuizRequest::new("Rust", Difficulty::Easy, 0),
            Err(QuizError::InvalidInput(_))
        ));
        assert!(QuizRequest::new("Rust", Difficulty::Easy, 21).is_err());
        assert!(QuizRequest::new("   ", Difficulty::Easy, 3).is_err());
    }

    #[test]
    fn test_request_trims_topic() {
        let req = QuizRequest::new("  Python basics ", Difficulty::Medium, 3).unwrap();
        assert_eq!(req.topic(), "Python basics");
        assert_eq!(req.difficulty(), Difficulty::Medium);
        assert_eq!(req.count(), 3);
    }

    #[test]
    fn test_correct_label_bare_letter() {
        assert_eq!(question("B").correct_label(), Some(Label::B));
    }

    #[test]
    fn test_correct_label_skips_answer_word() {
        assert_eq!(question("Answer: B").correct_label(), Some(Label::B));
        assert_eq!(question("The correct answer is C) Paris").correct_label(), Some(Label::C));
    }

    #[test]
    fn test_correct_label_never_guesses() {
        assert_eq!(question(ANSWER_NOT_PROVIDED).correct_label(), None);
        assert_eq!(question("").correct_label(), None);
        assert_eq!(question("e").correct_label(), None);
        assert_eq!(question("it is a trick").correct_label(), None);
    }

    #[test]
    fn test_correct_label_lowercase_when_unambiguous() {
        assert_eq!(question("c").correct_label(), Some(Label::C));
        assert_eq!(question(" d ").correct_label(), Some(Label::D));
        assert_eq!(question("Answer: b").correct_label(), Some(Label::B));
        assert_eq!(question("Correct answer: a) Paris").correct_label(), Some(Label::A));
    }

    #[test]
    fn test_option_lines() {
        assert_eq!(question("B").option_lines(), vec!["A) 3", "B) 4"]);
        assert!(!question("B").has_all_options());
    }

    #[test]
    fn test_question_serializes_to_prompt_schema() {
        let value = serde_json::to_value(question("B")).unwrap();
        assert_eq!(value["question"], "What is 2+2?");
        assert_eq!(value["options"]["B"], "4");
        assert_eq!(value["answer"], "B");
        assert!(value.get("explanation").is_none());
    }

    #[test]
    fn test_quiz_display() {
        let quiz = Quiz {
            topic: "Math".into(),
            difficulty: Difficulty::Easy,
            questions: vec![question("B")],
        };
        let rendered = quiz.to_string();
        assert!(rendered.starts_with("Math (easy)"));
        assert!(rendered.contains("Q1. What is 2+2?"));
        assert!(rendered.contains("   B) 4"));
    }
}
