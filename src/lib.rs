// src/lib.rs

pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod quiz;

pub use error::{BackendError, BackendErrorKind, QuizError, Result};
