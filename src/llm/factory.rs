// src/llm/factory.rs
// Provider factory: one client per configured backend

use crate::llm::gemini::GeminiClient;
use crate::llm::http_client::LlmHttpClient;
use crate::llm::huggingface::HuggingFaceClient;
use crate::llm::provider::{LlmClient, Provider};
use std::sync::Arc;
use tracing::info;

/// Builds the client for a provider over a shared reqwest client
pub struct ProviderFactory {
    client: reqwest::Client,
}

impl ProviderFactory {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Create the client for `provider`
    pub fn client_for(&self, provider: Provider) -> Arc<dyn LlmClient> {
        let http = LlmHttpClient::from_client(self.client.clone());
        info!(provider = %provider, "LLM client initialized");
        match provider {
            Provider::HuggingFace => Arc::new(HuggingFaceClient::new(http)),
            Provider::Gemini => Arc::new(GeminiClient::new(http)),
        }
    }
}
