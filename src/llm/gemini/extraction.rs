// src/llm/gemini/extraction.rs
// Response extraction helpers for Gemini API responses

use crate::llm::gemini::types::{GeminiContent, GeminiResponse};

/// Extract text content from the first candidate (non-thought parts only)
pub fn extract_content(response: &GeminiResponse) -> Option<String> {
    let content = response
        .candidates
        .as_ref()
        .and_then(|c| c.first())
        .and_then(|candidate| candidate.content.as_ref())?;

    let text = join_text_parts(content);
    if text.trim().is_empty() {
        None
    } else {
        Some(text.trim().to_string())
    }
}

fn join_text_parts(content: &GeminiContent) -> String {
    content
        .parts
        .iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text.as_deref())
        .collect()
}

/// Why nothing came back, when the API says so
pub fn block_reason(response: &GeminiResponse) -> Option<String> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.clone())
    {
        return Some(format!("prompt blocked: {}", reason));
    }
    response
        .candidates
        .as_ref()
        .and_then(|c| c.first())
        .and_then(|candidate| candidate.finish_reason.as_deref())
        .filter(|reason| *reason != "STOP" && *reason != "MAX_TOKENS")
        .map(|reason| format!("finish reason: {}", reason))
}
