// src/config/mod.rs
// Configuration loading

pub mod env;

pub use env::QuizConfig;
