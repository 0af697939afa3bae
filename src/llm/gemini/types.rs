// src/llm/gemini/types.rs
// Wire types for the generateContent endpoint

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: Some(text.into()),
                thought: false,
            }],
        }
    }
}

/// Only text parts matter here; other part kinds deserialize with `text: None`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub thought: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Option<Vec<GeminiCandidate>>,
    #[serde(rename = "promptFeedback", default)]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(rename = "usageMetadata", default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PromptFeedback {
    #[serde(rename = "blockReason", default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    pub prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    pub candidates_token_count: Option<u32>,
    #[serde(rename = "totalTokenCount", default)]
    pub total_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case_config() {
        let req = GeminiRequest {
            contents: vec![GeminiContent::user_text("hi")],
            generation_config: GenerationConfig {
                temperature: 0.5,
                max_output_tokens: 512,
            },
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 512);
        assert_eq!(value["generationConfig"]["temperature"], 0.5);
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert!(value["contents"][0]["parts"][0].get("thought").is_none());
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let resp: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.candidates.is_none());
        assert!(resp.usage_metadata.is_none());
    }

    #[test]
    fn test_non_text_part_deserializes() {
        let part: GeminiPart =
            serde_json::from_str(r#"{"functionCall": {"name": "x", "args": {}}}"#).unwrap();
        assert!(part.text.is_none());
        assert!(!part.thought);
    }
}
