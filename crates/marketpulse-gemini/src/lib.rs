//! Gemini-backed marketplace intelligence tasks.
//!
//! [`GeminiClient`] wraps the `generateContent` REST endpoint; the task
//! methods (`analyze_listing`, `extract_listing`, `analyze_trends`, ...) build
//! prompts and schemas, call it, and normalize the answers into the types of
//! `marketpulse-core`.

pub mod client;
pub mod error;
pub mod fallback;
mod listing;
mod market;
pub mod normalize;
pub mod prompts;
pub mod schema;
pub mod types;
mod wire;

pub use client::{GeminiClient, GenerateRequest, GenerateResponse, Mode};
pub use error::GeminiError;
pub use market::EMPTY_AUDIT_MESSAGE;
