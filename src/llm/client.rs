//! LLM client abstraction
//!
//! The rest of the crate talks to language models only through [`LLMClient`].
//! A single client serves every agent; the agent's model identifier is passed
//! through on each call and is opaque to the core.

use crate::types::{Message, Result, ToolCall, ToolDefinition};
use crate::utils::toml_config::ProviderConfig;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Generic LLM client trait for provider abstraction
///
/// All providers implement this trait, so the responder can be exercised
/// against a scripted client in tests and a real endpoint in production.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Run one chat completion.
    ///
    /// `tools` is `None` when the caller wants a plain text answer; the
    /// model must not be offered any tool in that case.
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<Completion>;

    /// Human-readable provider name, for logs
    fn provider_name(&self) -> &str;
}

/// Outcome of a completion: either text or a request to call one tool, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Text(String),
    ToolCall(ToolCall),
}

impl Completion {
    pub fn is_tool_call(&self) -> bool {
        matches!(self, Completion::ToolCall(_))
    }
}

/// Build the configured provider client.
///
/// # Errors
///
/// Returns a configuration error when the API key variable named in the
/// provider section is not set.
pub fn create_client(config: &ProviderConfig) -> Result<Arc<dyn LLMClient>> {
    let api_key = config.api_key()?;
    Ok(Arc::new(super::openai::OpenAIClient::new(
        config.base_url.clone(),
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_kind() {
        assert!(!Completion::Text("hi".into()).is_tool_call());
        assert!(Completion::ToolCall(ToolCall {
            id: "1".into(),
            name: "calculator".into(),
            arguments: "{}".into(),
        })
        .is_tool_call());
    }

    #[test]
    fn test_missing_api_key_is_a_configuration_error() {
        let config = ProviderConfig {
            base_url: "http://localhost:1".to_string(),
            api_key_env: "ROUNDTABLE_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            request_timeout_secs: 5,
        };
        let err = match create_client(&config) {
            Ok(_) => panic!("Expected error"),
            Err(e) => e,
        };
        assert!(matches!(err, crate::types::AppError::Configuration(_)));
    }
}
