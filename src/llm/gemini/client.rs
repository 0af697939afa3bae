// src/llm/gemini/client.rs
// Google Gemini API client (non-streaming generateContent)

use crate::error::{BackendError, BackendErrorKind};
use crate::llm::gemini::extraction::{block_reason, extract_content};
use crate::llm::gemini::types::{GeminiContent, GeminiRequest, GeminiResponse, GenerationConfig};
use crate::llm::http_client::{HttpRequest, LlmHttpClient};
use crate::llm::provider::{GenerateParams, LlmClient, Provider};
use async_trait::async_trait;
use std::time::Instant;
use tracing::{Span, debug, info, instrument};
use uuid::Uuid;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Google Gemini API client
pub struct GeminiClient {
    base_url: String,
    http: LlmHttpClient,
}

impl GeminiClient {
    pub fn new(http: LlmHttpClient) -> Self {
        Self::with_base_url(http, GEMINI_API_BASE.to_string())
    }

    pub fn with_base_url(http: LlmHttpClient, base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!("{}/{}:generateContent", self.base_url, model_id)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn provider_type(&self) -> Provider {
        Provider::Gemini
    }

    #[instrument(skip(self, prompt, params), fields(request_id, model = %params.model_id))]
    async fn generate(&self, prompt: &str, params: &GenerateParams) -> Result<String, BackendError> {
        let api_key = params
            .credential()
            .ok_or_else(|| BackendError::missing_credential(Provider::Gemini))?;

        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();
        Span::current().record("request_id", &request_id);

        info!(
            request_id = %request_id,
            model = %params.model_id,
            max_output_tokens = params.max_tokens,
            "Starting Gemini generation request"
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent::user_text(prompt)],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_tokens,
            },
        };
        let body = serde_json::to_value(&request).map_err(|e| {
            BackendError::new(Provider::Gemini, BackendErrorKind::InvalidResponse, e.to_string())
        })?;

        // Key goes in a header rather than the query string so it stays out of URL logs
        let http_request = HttpRequest::post_json(self.endpoint(&params.model_id), body)
            .header("x-goog-api-key", api_key);

        let response_body = self
            .http
            .execute_with_retry(&request_id, Provider::Gemini, &http_request)
            .await?;

        if response_body.trim().is_empty() {
            return Err(BackendError::empty_response(Provider::Gemini));
        }

        let data: GeminiResponse = serde_json::from_str(&response_body).map_err(|e| {
            BackendError::new(
                Provider::Gemini,
                BackendErrorKind::InvalidResponse,
                format!("Failed to parse Gemini response: {}", e),
            )
        })?;

        if let Some(ref usage) = data.usage_metadata {
            debug!(
                request_id = %request_id,
                prompt_tokens = usage.prompt_token_count,
                completion_tokens = usage.candidates_token_count.unwrap_or(0),
                total_tokens = usage.total_token_count,
                "Gemini usage"
            );
        }

        let text = match extract_content(&data) {
            Some(text) => text,
            None => {
                let mut err = BackendError::empty_response(Provider::Gemini);
                if let Some(reason) = block_reason(&data) {
                    err.cause = format!("empty response ({})", reason);
                }
                return Err(err);
            }
        };

        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!(request_id = %request_id, duration_ms, "Gemini generation complete");

        Ok(text)
    }
}
