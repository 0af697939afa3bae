// src/llm/huggingface.rs
// Hugging Face Inference API client (text-generation task)

use crate::error::BackendError;
use crate::llm::http_client::{HttpRequest, LlmHttpClient};
use crate::llm::provider::{GenerateParams, LlmClient, Provider};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tracing::{Span, debug, info, instrument};
use uuid::Uuid;

const HF_API_BASE: &str = "https://api-inference.huggingface.co/models";

/// Inference API requests can sit behind a cold model for a while
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Hugging Face Inference API client
pub struct HuggingFaceClient {
    base_url: String,
    http: LlmHttpClient,
}

impl HuggingFaceClient {
    pub fn new(http: LlmHttpClient) -> Self {
        Self::with_base_url(http, HF_API_BASE.to_string())
    }

    /// Point at a different inference host (self-hosted TGI, proxies)
    pub fn with_base_url(http: LlmHttpClient, base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!("{}/{}", self.base_url, model_id)
    }
}

/// Pull the completion out of whichever shape the Inference API returned.
///
/// Known shapes are `[{"generated_text": ...}]` and `{"generated_text": ...}`.
/// Anything else is handed back serialized so callers can see what arrived.
pub fn extract_generated_text(body: &str) -> String {
    let data: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return body.trim().to_string(),
    };

    let text = data
        .as_array()
        .and_then(|items| items.first())
        .and_then(|first| first.get("generated_text"))
        .or_else(|| data.get("generated_text"))
        .and_then(Value::as_str);

    match text {
        Some(t) => t.trim().to_string(),
        None => data.to_string(),
    }
}

#[async_trait]
impl LlmClient for HuggingFaceClient {
    fn provider_type(&self) -> Provider {
        Provider::HuggingFace
    }

    #[instrument(skip(self, prompt, params), fields(request_id, model = %params.model_id))]
    async fn generate(&self, prompt: &str, params: &GenerateParams) -> Result<String, BackendError> {
        let token = params
            .credential()
            .ok_or_else(|| BackendError::missing_credential(Provider::HuggingFace))?;

        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();
        Span::current().record("request_id", &request_id);

        info!(
            request_id = %request_id,
            model = %params.model_id,
            max_new_tokens = params.max_tokens,
            "Starting Hugging Face generation request"
        );

        let request = HttpRequest::post_json(
            self.endpoint(&params.model_id),
            json!({
                "inputs": prompt,
                "parameters": {
                    "max_new_tokens": params.max_tokens,
                    "temperature": params.temperature,
                    "return_full_text": false
                }
            }),
        )
        .header("Authorization", format!("Bearer {}", token))
        .timeout(REQUEST_TIMEOUT);

        let body = self
            .http
            .execute_with_retry(&request_id, Provider::HuggingFace, &request)
            .await?;

        if body.trim().is_empty() {
            return Err(BackendError::empty_response(Provider::HuggingFace));
        }

        let text = extract_generated_text(&body);
        if text.is_empty() {
            return Err(BackendError::empty_response(Provider::HuggingFace));
        }

        let duration_ms = start_time.elapsed().as_millis() as u64;
        debug!(request_id = %request_id, chars = text.len(), "Hugging Face response extracted");
        info!(request_id = %request_id, duration_ms, "Hugging Face generation complete");

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_list_shape() {
        let body = r#"[{"generated_text": "  {\"questions\": []}  "}]"#;
        assert_eq!(extract_generated_text(body), r#"{"questions": []}"#);
    }

    #[test]
    fn test_extract_object_shape() {
        let body = r#"{"generated_text": "Q1: What?"}"#;
        assert_eq!(extract_generated_text(body), "Q1: What?");
    }

    #[test]
    fn test_extract_unknown_shape_serializes_payload() {
        let body = r#"{"error": "something odd", "estimated_time": 20.0}"#;
        let text = extract_generated_text(body);
        assert!(text.contains("something odd"));
        assert!(text.contains("estimated_time"));
    }

    #[test]
    fn test_extract_list_without_field_serializes_payload() {
        let body = r#"[{"summary_text": "nope"}]"#;
        assert_eq!(extract_generated_text(body), r#"[{"summary_text":"nope"}]"#);
    }

    #[test]
    fn test_extract_non_json_body_is_returned_raw() {
        assert_eq!(extract_generated_text("  plain text  "), "plain text");
    }

    #[test]
    fn test_endpoint_includes_model() {
        let client = HuggingFaceClient::new(LlmHttpClient::from_client(reqwest::Client::new()));
        assert_eq!(
            client.endpoint("mistralai/Mixtral-8x7B-Instruct-v0.1"),
            "https://api-inference.huggingface.co/models/mistralai/Mixtral-8x7B-Instruct-v0.1"
        );
    }

    #[test]
    fn test_custom_base_url_trims_slash() {
        let client = HuggingFaceClient::with_base_url(
            LlmHttpClient::from_client(reqwest::Client::new()),
            "http://localhost:8080/models/".into(),
        );
        assert_eq!(client.endpoint("m"), "http://localhost:8080/models/m");
        assert_eq!(client.provider_type(), Provider::HuggingFace);
    }
}
