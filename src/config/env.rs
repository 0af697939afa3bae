// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use crate::error::{QuizError, Result};
use crate::llm::{GenerateParams, Provider};
use tracing::{debug, info, warn};

/// Provider selection plus everything needed to call it
#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    pub provider: Provider,
    pub params: GenerateParams,
}

impl QuizConfig {
    /// Load from the process environment, after reading `.env` if present
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            debug!(error = %e, "No .env file loaded");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from the process environment with an explicit provider choice
    pub fn from_env_with_provider(provider: Provider) -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            debug!(error = %e, "No .env file loaded");
        }
        Self::for_provider(provider, |name| std::env::var(name).ok())
    }

    /// Load using `lookup` for variable access
    ///
    /// `PROVIDER` picks the backend (default `hf`); an unknown value is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match read_var(&lookup, "PROVIDER") {
            None => Provider::default(),
            Some(name) => Provider::from_str(&name).ok_or_else(|| {
                QuizError::Config(format!(
                    "unknown provider '{}'; set PROVIDER to 'hf' or 'gemini'",
                    name
                ))
            })?,
        };
        Self::for_provider(provider, lookup)
    }

    /// Build params for `provider`; a missing credential is left for `generate` to report
    pub fn for_provider<F>(provider: Provider, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credential = match provider {
            Provider::HuggingFace => read_var(&lookup, "HUGGINGFACE_API_TOKEN"),
            Provider::Gemini => {
                read_var(&lookup, "GOOGLE_API_KEY").or_else(|| read_var(&lookup, "GEMINI_API_KEY"))
            }
        };
        if credential.is_none() {
            warn!(
                provider = %provider,
                env_var = provider.api_key_env_var(),
                "No credential configured - generation will fail until one is set"
            );
        }

        let mut params = GenerateParams::for_provider(provider, credential);
        if let Some(model) = read_var(&lookup, provider.model_env_var()) {
            params.model_id = model;
        }
        if let Some(raw) = read_var(&lookup, "QUIZ_MAX_TOKENS") {
            params.max_tokens = raw.parse().map_err(|_| {
                QuizError::Config(format!("QUIZ_MAX_TOKENS must be a positive integer, got '{}'", raw))
            })?;
        }
        if let Some(raw) = read_var(&lookup, "QUIZ_TEMPERATURE") {
            params.temperature = raw
                .parse()
                .ok()
                .filter(|t: &f32| (0.0..=2.0).contains(t))
                .ok_or_else(|| {
                    QuizError::Config(format!(
                        "QUIZ_TEMPERATURE must be a number between 0 and 2, got '{}'",
                        raw
                    ))
                })?;
        }

        info!(provider = %provider, model = %params.model_id, "Configuration loaded");
        Ok(Self { provider, params })
    }
}

/// Read a single variable, filtering empty values
fn read_var<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
