//! Scam detection and honeypot engagement over a hosted LLM, with regex
//! extraction of payment identifiers as a deterministic cross-check.

pub mod classifier;
pub mod config;
pub mod extract;
pub mod gemini;
pub mod honeypot;
pub mod llm;
pub mod sanitize;
pub mod server;

pub use config::{Config, ConfigError};
pub use gemini::GeminiClient;
pub use server::{AppState, router};
