// src/llm/gemini/mod.rs
// Google Gemini API client

mod client;
mod extraction;
pub mod types;

pub use client::GeminiClient;
pub use extraction::extract_content;
