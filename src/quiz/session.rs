// src/quiz/session.rs
// One interactive quiz: generation, collected answers, scoring

use crate::error::{QuizError, Result};
use crate::llm::{GenerateParams, LlmClient};
use crate::quiz::{Label, Quiz, QuizRequest, build_prompt, build_quiz};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Selected label per question index
pub type AnswerSet = BTreeMap<usize, Label>;

/// How well the backend met the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizOutcome {
    /// Nothing usable came back
    Empty,
    /// Usable, but fewer questions than asked for
    Partial { produced: usize, requested: usize },
    Complete,
}

impl QuizOutcome {
    pub fn classify(quiz: &Quiz, requested: usize) -> Self {
        match quiz.len() {
            0 => QuizOutcome::Empty,
            n if n < requested => QuizOutcome::Partial {
                produced: n,
                requested,
            },
            _ => QuizOutcome::Complete,
        }
    }

    /// Message for the user, if the outcome deserves one
    pub fn user_message(&self) -> Option<String> {
        match self {
            QuizOutcome::Empty => Some("The quiz was empty or invalid. Try again.".to_string()),
            QuizOutcome::Partial {
                produced,
                requested,
            } => Some(format!(
                "Only {} of {} requested questions could be read from the response.",
                produced, requested
            )),
            QuizOutcome::Complete => None,
        }
    }
}

/// Build the prompt, call the backend and normalize its reply
pub async fn generate_quiz(
    client: &dyn LlmClient,
    params: &GenerateParams,
    request: &QuizRequest,
) -> Result<Quiz> {
    let prompt = build_prompt(request.topic(), request.difficulty(), request.count());
    let raw = client.generate(&prompt, params).await?;
    let quiz = build_quiz(request, &raw);

    match QuizOutcome::classify(&quiz, request.count()) {
        QuizOutcome::Complete => {
            info!(provider = %client.provider_type(), questions = quiz.len(), "Quiz generated")
        }
        outcome => warn!(
            provider = %client.provider_type(),
            questions = quiz.len(),
            requested = request.count(),
            ?outcome,
            "Quiz generated with degraded output"
        ),
    }

    Ok(quiz)
}

/// Result for one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionResult {
    pub index: usize,
    pub selected: Option<Label>,
    /// `None` when the answer line held no recognizable letter
    pub expected: Option<Label>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    pub correct: usize,
    pub total: usize,
    pub results: Vec<QuestionResult>,
}

impl ScoreReport {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 * 100.0 / self.total as f64
        }
    }
}

/// Quiz plus the user's answers, passed explicitly to scoring
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    answers: AnswerSet,
}

impl QuizSession {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            answers: AnswerSet::new(),
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Record (or replace) the answer to question `index`
    pub fn select(&mut self, index: usize, label: Label) -> Result<()> {
        if index >= self.quiz.len() {
            return Err(QuizError::InvalidInput(format!(
                "question {} does not exist (quiz has {})",
                index + 1,
                self.quiz.len()
            )));
        }
        self.answers.insert(index, label);
        Ok(())
    }

    /// Compare each selection with the letter extracted from the answer line
    pub fn score(&self) -> ScoreReport {
        let results: Vec<QuestionResult> = self
            .quiz
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = self.answers.get(&index).copied();
                let expected = question.correct_label();
                QuestionResult {
                    index,
                    selected,
                    expected,
                    is_correct: selected.is_some() && selected == expected,
                }
            })
            .collect();

        ScoreReport {
            correct: results.iter().filter(|r| r.is_correct).count(),
            total: results.len(),
            results,
        }
    }
}
