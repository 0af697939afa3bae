// src/llm/provider.rs
// LLM provider abstraction layer

use crate::error::BackendError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// LLM provider types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    #[serde(rename = "hf")]
    HuggingFace,
    Gemini,
}

impl Provider {
    /// Parse provider from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hf" | "huggingface" => Some(Self::HuggingFace),
            "gemini" => Some(Self::Gemini),
            _ => None,
        }
    }

    /// Get the environment variable name for this provider's credential
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            Self::HuggingFace => "HUGGINGFACE_API_TOKEN",
            Self::Gemini => "GOOGLE_API_KEY",
        }
    }

    /// Get the environment variable name for this provider's model override
    pub fn model_env_var(&self) -> &'static str {
        match self {
            Self::HuggingFace => "HF_MODEL_ID",
            Self::Gemini => "GEMINI_MODEL_ID",
        }
    }

    /// Default model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::HuggingFace => "mistralai/Mixtral-8x7B-Instruct-v0.1",
            Self::Gemini => "gemini-1.5-flash",
        }
    }

    /// Default completion length for this provider
    pub fn default_max_tokens(&self) -> u32 {
        match self {
            Self::HuggingFace => 256,
            Self::Gemini => 512,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HuggingFace => write!(f, "hf"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

/// Per-call generation settings, including the caller's credential
#[derive(Clone, PartialEq)]
pub struct GenerateParams {
    pub credential: Option<String>,
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerateParams {
    /// Provider defaults with the given credential
    pub fn for_provider(provider: Provider, credential: Option<String>) -> Self {
        Self {
            credential,
            model_id: provider.default_model().to_string(),
            max_tokens: provider.default_max_tokens(),
            temperature: 0.7,
        }
    }

    /// Credential if present and non-blank
    pub fn credential(&self) -> Option<&str> {
        self.credential
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

// Keep credentials out of logs
impl fmt::Debug for GenerateParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerateParams")
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("model_id", &self.model_id)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Trait for LLM clients - all providers must implement this
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one prompt and return one text completion
    async fn generate(&self, prompt: &str, params: &GenerateParams) -> Result<String, BackendError>;

    /// Get the provider type
    fn provider_type(&self) -> Provider;
}
