// tests/normalize_test.rs
// End-to-end normalization: backend text in, quiz and score out

use quizgen::quiz::{
    ANSWER_NOT_PROVIDED, Difficulty, Label, QuizOutcome, QuizRequest, QuizSession, build_quiz,
    normalize,
};
use serde_json::json;

fn question_json(n: usize) -> serde_json::Value {
    json!({
        "question": format!("Question {}?", n),
        "options": {"A": "one", "B": "two", "C": "three", "D": "four"},
        "answer": "C",
        "explanation": format!("Because {}.", n)
    })
}

// ============================================================================
// Strict JSON
// ============================================================================

#[test]
fn test_questions_object_returned_in_order_and_truncated() {
    let payload = json!({
        "topic": "Numbers",
        "difficulty": "medium",
        "questions": (1..=6).map(question_json).collect::<Vec<_>>()
    });

    let qs = normalize(&payload.to_string(), 4);

    assert_eq!(qs.len(), 4);
    for (i, q) in qs.iter().enumerate() {
        assert_eq!(q.text, format!("Question {}?", i + 1));
        assert!(q.has_all_options());
        assert_eq!(q.correct_label(), Some(Label::C));
    }
}

#[test]
fn test_bare_array_returned_unchanged() {
    let payload = json!([question_json(1), question_json(2)]);

    let qs = normalize(&payload.to_string(), 10);

    assert_eq!(qs.len(), 2);
    assert_eq!(qs[1].text, "Question 2?");
    assert_eq!(qs[1].explanation.as_deref(), Some("Because 2."));
}

#[test]
fn test_pretty_json_with_surrounding_whitespace() {
    let payload = format!("\n\n  {}  \n", serde_json::to_string_pretty(&json!([question_json(1)])).unwrap());
    assert_eq!(normalize(&payload, 1).len(), 1);
}

#[test]
fn test_json_in_code_fence_with_commentary() {
    let payload = format!(
        "Sure! Here's your quiz:\n\n```json\n{}\n```\n\nLet me know if you want more.",
        json!({"questions": [question_json(1)]})
    );

    let qs = normalize(&payload, 3);

    assert_eq!(qs.len(), 1);
    assert!(qs[0].has_all_options());
}

#[test]
fn test_off_schema_item_dropped_without_losing_the_rest() {
    let mut short = question_json(3);
    short["options"] = json!({"A": "one", "B": "two", "C": "three"});
    let payload = json!({
        "questions": [question_json(1), question_json(2), short, question_json(4)]
    });

    let qs = normalize(&serde_json::to_string_pretty(&payload).unwrap(), 5);

    let texts: Vec<&str> = qs.iter().map(|q| q.text.as_str()).collect();
    assert_eq!(texts, vec!["Question 1?", "Question 2?", "Question 4?"]);
    assert!(qs.iter().all(|q| q.has_all_options()));
}

// ============================================================================
// Tolerant parsing
// ============================================================================

#[test]
fn test_prose_question_from_template() {
    let qs = normalize("Q1: What is 2+2?\nA) 3\nB) 4\nAnswer: B", 5);

    assert_eq!(qs.len(), 1);
    assert_eq!(qs[0].text, "What is 2+2?");
    assert_eq!(qs[0].option_lines(), vec!["A) 3".to_string(), "B) 4".to_string()]);
    assert!(qs[0].correct_answer.contains('B'));
}

#[test]
fn test_prose_quiz_with_full_options() {
    let raw = "\
Q1: Which keyword declares an immutable binding in Rust?
A) var
B) let
C) const fn
D) mut
Answer: B
Explanation: let bindings are immutable by default.

Q2: Which type owns a heap-allocated string?
A. &str
B. char
C. String
D. Box<str>
The answer is C
";
    let qs = normalize(raw, 5);

    assert_eq!(qs.len(), 2);
    assert!(qs.iter().all(|q| q.has_all_options()));
    assert_eq!(qs[0].correct_label(), Some(Label::B));
    assert_eq!(
        qs[0].explanation.as_deref(),
        Some("let bindings are immutable by default.")
    );
    assert_eq!(qs[1].options[&Label::A], "&str");
    assert_eq!(qs[1].correct_label(), Some(Label::C));
}

#[test]
fn test_prose_without_answer_uses_sentinel() {
    let qs = normalize("Q1: Pick one\nA) x\nB) y", 5);
    assert_eq!(qs[0].correct_answer, ANSWER_NOT_PROVIDED);
}

#[test]
fn test_empty_and_whitespace_yield_no_questions() {
    assert!(normalize("", 3).is_empty());
    assert!(normalize(" \n \r\n\t", 3).is_empty());
}

#[test]
fn test_length_bounded_for_all_counts() {
    let prose: String = (1..=8).map(|i| format!("Q{}: item {}\nAnswer: A\n", i, i)).collect();
    let json = json!({"questions": (1..=8).map(question_json).collect::<Vec<_>>()}).to_string();
    for raw in [prose.as_str(), json.as_str(), "", "no markers at all"] {
        for requested in 0..=10 {
            assert!(normalize(raw, requested).len() <= requested);
        }
    }
}

// ============================================================================
// Quiz, outcome and scoring
// ============================================================================

#[test]
fn test_partial_quiz_flows_through_to_scoring() {
    let request = QuizRequest::new("Rust", Difficulty::Easy, 5).unwrap();
    let quiz = build_quiz(
        &request,
        "Q1: First?\nA) a\nB) b\nAnswer: A\nQ2: Second?\nA) a\nB) b\nCorrect answer is B",
    );

    assert_eq!(
        QuizOutcome::classify(&quiz, request.count()),
        QuizOutcome::Partial {
            produced: 2,
            requested: 5
        }
    );

    let mut session = QuizSession::new(quiz);
    session.select(0, Label::A).unwrap();
    session.select(1, Label::A).unwrap();
    let report = session.score();
    assert_eq!(report.correct, 1);
    assert_eq!(report.total, 2);
}

#[test]
fn test_empty_quiz_is_flagged() {
    let request = QuizRequest::new("Rust", Difficulty::Hard, 3).unwrap();
    let quiz = build_quiz(&request, "   ");
    let outcome = QuizOutcome::classify(&quiz, request.count());
    assert_eq!(outcome, QuizOutcome::Empty);
    assert!(outcome.user_message().unwrap().contains("empty or invalid"));
}

#[test]
fn test_lowercase_json_answer_scores() {
    let request = QuizRequest::new("Letters", Difficulty::Easy, 1).unwrap();
    let raw = r#"[{"question": "Pick", "options": {"A": "w", "B": "x", "C": "y", "D": "z"}, "answer": "c"}]"#;
    let quiz = build_quiz(&request, raw);
    assert_eq!(quiz.questions[0].correct_label(), Some(Label::C));

    let mut session = QuizSession::new(quiz);
    session.select(0, Label::C).unwrap();
    let report = session.score();
    assert_eq!(report.correct, 1);
    assert_eq!(report.total, 1);
}
