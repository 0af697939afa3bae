// src/llm/mod.rs
// LLM inference clients (Hugging Face, Gemini)

mod factory;
pub mod gemini;
pub mod http_client;
mod huggingface;
mod provider;

pub use factory::ProviderFactory;
pub use gemini::GeminiClient;
pub use http_client::{HttpRequest, HttpResponse, LlmHttpClient, RetryPolicy, Transport, TransportError};
pub use huggingface::{HuggingFaceClient, extract_generated_text};
pub use provider::{GenerateParams, LlmClient, Provider};
