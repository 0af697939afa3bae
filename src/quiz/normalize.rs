// src/quiz/normalize.rs
// Turn free-form backend text into quiz questions
//
// Strategies run in order and the first one that yields a result wins:
//   1. strict JSON   - text is a JSON array of questions or {"questions": [...]}
//   2. fenced JSON   - the same, wrapped in a ``` code block
//   3. tolerant      - "Q1: ..." prose split into question/option/answer lines
// The tolerant strategy always yields, so normalization never fails.

use crate::quiz::{ANSWER_NOT_PROVIDED, Label, Question, Quiz, QuizRequest};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

static QUESTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Q\d+[:.\-]").expect("valid regex"));
static OPTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([A-D])[).]\s*(.*)$").expect("valid regex"));
static EXPLANATION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^explanation\s*:\s*(.*)$").expect("valid regex"));
static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[A-Za-z]*[ \t]*\r?\n?(.*?)```").expect("valid regex"));

type Strategy = fn(&str) -> Option<Vec<Question>>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("strict_json", parse_strict_json as Strategy),
    ("fenced_json", parse_fenced_json as Strategy),
    ("tolerant", parse_tolerant as Strategy),
];

/// Normalize raw backend text into at most `requested_count` questions.
///
/// Never fails: malformed input degrades to fewer questions, possibly none.
/// An empty result is the caller's signal that the quiz was unusable.
pub fn normalize(raw: &str, requested_count: usize) -> Vec<Question> {
    let mut questions = STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            let parsed = strategy(raw);
            match &parsed {
                Some(qs) => debug!(strategy = *name, questions = qs.len(), "Normalized backend output"),
                None => debug!(strategy = *name, "Strategy did not apply, falling through"),
            }
            parsed
        })
        .unwrap_or_default();

    questions.truncate(requested_count);
    questions
}

/// Normalize and attach the request's topic and difficulty
pub fn build_quiz(request: &QuizRequest, raw: &str) -> Quiz {
    Quiz {
        topic: request.topic().to_string(),
        difficulty: request.difficulty(),
        questions: normalize(raw, request.count()),
    }
}

// ============================================================================
// Strict JSON
// ============================================================================

fn parse_strict_json(raw: &str) -> Option<Vec<Question>> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with('[') || trimmed.starts_with('{')) {
        return None;
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "Backend output is not valid JSON");
            return None;
        }
    };

    let items = match &value {
        Value::Array(items) => items,
        Value::Object(map) => map.get("questions")?.as_array()?,
        _ => return None,
    };

    // A decoded question list is final; off-schema items are dropped, never re-read as prose
    let questions: Vec<Question> = items.iter().filter_map(question_from_json).collect();
    let skipped = items.len() - questions.len();
    if skipped > 0 {
        debug!(skipped, kept = questions.len(), "Dropped off-schema questions");
    }
    Some(questions)
}

fn question_from_json(value: &Value) -> Option<Question> {
    let text = value.get("question")?.as_str()?.trim().to_string();
    let options = options_from_json(value.get("options")?)?;
    let correct_answer = value
        .get("answer")
        .and_then(scalar_to_string)
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| ANSWER_NOT_PROVIDED.to_string());
    let explanation = value
        .get("explanation")
        .and_then(scalar_to_string)
        .filter(|e| !e.is_empty());

    Some(Question {
        text,
        options,
        correct_answer,
        explanation,
    })
}

/// Exactly A-D: either an object keyed by label or a four-element array
fn options_from_json(value: &Value) -> Option<BTreeMap<Label, String>> {
    let options: BTreeMap<Label, String> = match value {
        Value::Object(map) => {
            let mut options = BTreeMap::new();
            for (key, text) in map {
                let mut chars = key.trim().chars();
                let label = chars.next().and_then(Label::from_char)?;
                if chars.next().is_some() {
                    return None;
                }
                options.insert(label, scalar_to_string(text)?);
            }
            options
        }
        Value::Array(items) if items.len() == Label::ALL.len() => Label::ALL
            .iter()
            .zip(items)
            .map(|(label, text)| Some((*label, scalar_to_string(text)?)))
            .collect::<Option<_>>()?,
        _ => return None,
    };

    (options.len() == Label::ALL.len()).then_some(options)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ============================================================================
// Fenced JSON
// ============================================================================

fn parse_fenced_json(raw: &str) -> Option<Vec<Question>> {
    CODE_FENCE
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|body| body.as_str().trim())
        .filter(|body| body.starts_with('[') || body.starts_with('{'))
        .find_map(parse_strict_json)
}

// ============================================================================
// Tolerant pattern parsing
// ============================================================================

fn parse_tolerant(raw: &str) -> Option<Vec<Question>> {
    Some(
        QUESTION_MARKER
            .split(raw)
            .filter(|segment| !segment.trim().is_empty())
            .filter_map(parse_segment)
            .collect(),
    )
}

fn parse_segment(segment: &str) -> Option<Question> {
    let lines: Vec<&str> = segment
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let (first, rest) = lines.split_first()?;

    let mut options = BTreeMap::new();
    for line in rest {
        let Some(caps) = OPTION_LINE.captures(line) else {
            continue;
        };
        let label = caps[1].chars().next().and_then(Label::from_char);
        if let Some(label) = label {
            options
                .entry(label)
                .or_insert_with(|| caps[2].trim().to_string());
        }
    }

    let correct_answer = lines
        .iter()
        .find(|line| line.to_lowercase().contains("answer"))
        .map(|line| line.to_string())
        .unwrap_or_else(|| ANSWER_NOT_PROVIDED.to_string());

    let explanation = rest
        .iter()
        .find_map(|line| EXPLANATION_LINE.captures(line))
        .map(|caps| caps[1].trim().to_string())
        .filter(|e| !e.is_empty());

    Some(Question {
        text: first.to_string(),
        options,
        correct_answer,
        explanation,
    })
}
