//! LLM Provider Clients and Abstractions
//!
//! This module hides the model provider behind the [`LLMClient`] trait. The
//! responder only ever sees a [`Completion`]: a text reply or a structured
//! tool-call request.
//!
//! # Supported Providers
//!
//! - [`openai::OpenAIClient`] - any OpenAI-compatible `/chat/completions`
//!   endpoint (OpenAI, OpenRouter, Ollama's `/v1`, vLLM, LM Studio, ...)
//!
//! # Example
//!
//! ```ignore
//! use roundtable::llm::{create_client, Completion};
//!
//! let client = create_client(&config.provider)?;
//! match client.complete("gpt-4o-mini", &messages, None).await? {
//!     Completion::Text(text) => println!("{}", text),
//!     Completion::ToolCall(call) => println!("wants {}", call.name),
//! }
//! ```

/// Core LLM client trait and completion type.
pub mod client;
/// OpenAI-compatible chat completions client.
pub mod openai;

pub use client::{create_client, Completion, LLMClient};
