//! Mock implementations for testing.
//!
//! This module provides mock LLM clients and tools that can be used across
//! different test files without duplication.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use roundtable::llm::{Completion, LLMClient};
use roundtable::tools::Tool;
use roundtable::types::{AppError, Message, Result, ToolCall, ToolDefinition};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// One call received by [`MockLLMClient`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub messages: Vec<Message>,
    /// Names of the tools offered, `None` when no schema was attached
    pub tools: Option<Vec<String>>,
}

enum Behavior {
    /// Same text for every call
    Constant(String),
    /// Reply with the model identifier
    EchoModel,
    /// Pop replies in order, fail once exhausted
    Scripted(Mutex<VecDeque<Completion>>),
    Failing,
    Slow(Duration),
}

/// Mock LLM client with configurable replies that records every call.
///
/// # Examples
///
/// ```ignore
/// // Always answer "Hello, world!"
/// let client = MockLLMClient::new("Hello, world!");
///
/// // Ask for a tool, then summarize
/// let client = MockLLMClient::scripted(vec![tool_call("calculator", "{}"), text("done")]);
///
/// // Always fail
/// let client = MockLLMClient::failing();
/// ```
pub struct MockLLMClient {
    behavior: Behavior,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLLMClient {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self::with_behavior(Behavior::Constant(response.to_string()))
    }

    /// Create a mock client that answers with the requested model name.
    pub fn echo_model() -> Self {
        Self::with_behavior(Behavior::EchoModel)
    }

    /// Create a mock client that returns the given completions in order.
    pub fn scripted(replies: Vec<Completion>) -> Self {
        Self::with_behavior(Behavior::Scripted(Mutex::new(replies.into())))
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self::with_behavior(Behavior::Failing)
    }

    /// Create a mock client that sleeps before answering.
    pub fn slow(delay: Duration) -> Self {
        Self::with_behavior(Behavior::Slow(delay))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<Completion> {
        self.calls.lock().push(RecordedCall {
            model: model.to_string(),
            messages: messages.to_vec(),
            tools: tools.map(|defs| defs.iter().map(|d| d.name.clone()).collect()),
        });

        match &self.behavior {
            Behavior::Constant(text) => Ok(Completion::Text(text.clone())),
            Behavior::EchoModel => Ok(Completion::Text(model.to_string())),
            Behavior::Scripted(replies) => replies
                .lock()
                .pop_front()
                .ok_or_else(|| AppError::ModelCall("mock script exhausted".to_string())),
            Behavior::Failing => Err(AppError::ModelCall("Mock LLM failure".to_string())),
            Behavior::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Completion::Text("finally".to_string()))
            }
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

pub fn text(content: &str) -> Completion {
    Completion::Text(content.to_string())
}

pub fn tool_call(name: &str, arguments: &str) -> Completion {
    Completion::ToolCall(ToolCall {
        id: format!("call_{}", name),
        name: name.to_string(),
        arguments: arguments.to_string(),
    })
}

/// A tool that always fails.
pub struct FailingTool;

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "explode"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _args: &[Value]) -> Result<Value> {
        Err(AppError::ToolExecution {
            tool: "explode".to_string(),
            message: "boom".to_string(),
        })
    }
}

/// A tool that records the arguments it was called with.
#[derive(Default)]
pub struct RecordingTool {
    pub seen: Mutex<Vec<Vec<Value>>>,
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> &str {
        "record"
    }

    fn description(&self) -> &str {
        "Echoes its arguments"
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, args: &[Value]) -> Result<Value> {
        self.seen.lock().push(args.to_vec());
        Ok(json!({ "received": args.len() }))
    }
}

/// Wrap a mock for use where an `Arc<dyn LLMClient>` is required.
pub fn shared(client: MockLLMClient) -> (Arc<MockLLMClient>, Arc<dyn LLMClient>) {
    let concrete = Arc::new(client);
    let dynamic: Arc<dyn LLMClient> = concrete.clone();
    (concrete, dynamic)
}
