// src/quiz/prompt.rs
// Instruction template sent to the backend

use crate::quiz::Difficulty;

/// Render the quiz instruction for a topic, difficulty and question count.
///
/// No validation happens here; callers validate through
/// [`QuizRequest::new`](crate::quiz::QuizRequest::new). The "JSON only"
/// instruction is advisory and the normalizer does not rely on it.
pub fn build_prompt(topic: &str, difficulty: Difficulty, count: usize) -> String {
    format!(
        r#"You are a quiz generator. Create {count} multiple-choice questions on the topic "{topic}".
Difficulty: {difficulty}.
Each question must include exactly 4 options labeled A, B, C, D and provide the correct option letter.
Return ONLY valid JSON with this schema:

{{
  "topic": "{topic}",
  "difficulty": "{difficulty}",
  "questions": [
    {{
      "question": "string",
      "options": {{"A": "string", "B": "string", "C": "string", "D": "string"}},
      "answer": "A|B|C|D",
      "explanation": "short explanation"
    }}
  ]
}}

Do not include backticks or commentary. Return JSON only.
"#
    )
}
