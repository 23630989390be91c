//! LLM integration
//!
//! Provides the client trait and OpenAI-compatible implementation used
//! for both embedding generation and chat completion, plus an
//! in-memory embedding cache.

mod cache;
mod client;

pub use client::{ChatMessage, LlmClient, OpenAiClient};
