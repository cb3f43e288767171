//! Single-turn responder
//!
//! Produces exactly one turn for one agent: one model call, and when the
//! model asks for a tool, one tool execution followed by one summary call.
//!
//! ```text
//! transcript ──► [system prompt + transcript] ──► model (agent's tools offered)
//!                                                   │
//!                       ┌───────── text ────────────┤
//!                       ▼                           ▼ tool call
//!               assistant message          registry lookup ── missing ──► "not found" message
//!                                                   │
//!                                              execute tool
//!                                                   │
//!                              [.. + tool-call echo + tool result] ──► model (no tools)
//!                                                   │
//!                                                   ▼
//!                                          assistant summary
//! ```
//!
//! Model and tool failures are not recovered here; they are returned to the
//! caller, which decides what happens to the conversation.

use crate::agents::Agent;
use crate::llm::{Completion, LLMClient};
use crate::tools::ToolRegistry;
use crate::types::{AppError, Message, Result, ToolCall};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

const FENCE: &str = "```";

/// Result of one agent turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnResponse {
    /// The turn's assistant message, not yet attributed to the agent
    pub message: Message,
    pub tool_invocation: Option<ToolInvocation>,
    /// Tool-call echo and tool result, in order, when a tool ran
    pub appended_messages: Vec<Message>,
}

/// What was called during a turn and what the summary call was given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: Vec<Value>,
    pub follow_up_messages: Vec<Message>,
}

pub struct TurnResponder {
    llm: Arc<dyn LLMClient>,
    tool_registry: Arc<ToolRegistry>,
    call_timeout: Duration,
    code_artifact_path: Option<PathBuf>,
}

impl TurnResponder {
    pub fn new(
        llm: Arc<dyn LLMClient>,
        tool_registry: Arc<ToolRegistry>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            llm,
            tool_registry,
            call_timeout,
            code_artifact_path: None,
        }
    }

    /// Write the fenced code block of plain replies to `path`
    pub fn with_code_artifact_path(mut self, path: Option<PathBuf>) -> Self {
        self.code_artifact_path = path;
        self
    }

    /// Produce the next turn for `agent` given the shared transcript.
    ///
    /// # Errors
    ///
    /// Model-call, tool-execution and timeout errors are returned unchanged.
    pub async fn respond(&self, agent: &Agent, transcript: &[Message]) -> Result<TurnResponse> {
        let mut working = Vec::with_capacity(transcript.len() + 3);
        working.push(Message::system(agent.system_prompt.clone()));
        working.extend_from_slice(transcript);

        let tools = self.tool_registry.get_tool_definitions_for(&agent.tools);
        let offered = if tools.is_empty() {
            None
        } else {
            Some(tools.as_slice())
        };

        debug!(
            agent_id = agent.id,
            model = %agent.model,
            tools = tools.len(),
            "requesting completion"
        );

        let completion = self
            .bounded(
                "model call",
                self.llm.complete(&agent.model, &working, offered),
            )
            .await?;

        match completion {
            Completion::Text(text) => {
                if let Some(path) = &self.code_artifact_path {
                    if let Some(code) = extract_code_block(&text) {
                        write_artifact(path, &code).await;
                    }
                }
                Ok(TurnResponse {
                    message: Message::assistant(text),
                    tool_invocation: None,
                    appended_messages: Vec::new(),
                })
            }
            Completion::ToolCall(call) => self.run_tool(agent, working, call).await,
        }
    }

    async fn run_tool(
        &self,
        agent: &Agent,
        mut working: Vec<Message>,
        call: ToolCall,
    ) -> Result<TurnResponse> {
        let arguments = parse_arguments(&call.name, &call.arguments);

        let Some(tool) = self.tool_registry.get(&call.name) else {
            warn!(agent_id = agent.id, tool = %call.name, "model requested an unknown tool");
            return Ok(TurnResponse {
                message: Message::assistant(format!("Tool '{}' not found.", call.name)),
                tool_invocation: None,
                appended_messages: Vec::new(),
            });
        };

        info!(agent_id = agent.id, tool = %call.name, args = arguments.len(), "executing tool");
        let result = self
            .bounded("tool execution", tool.execute(&arguments))
            .await?;

        let echo = Message::assistant_tool_call(call.clone());
        let tool_result = Message::tool_result(call.id.clone(), result.to_string());
        working.push(echo.clone());
        working.push(tool_result.clone());

        let summary = match self
            .bounded("model call", self.llm.complete(&agent.model, &working, None))
            .await?
        {
            Completion::Text(text) => text,
            Completion::ToolCall(extra) => {
                warn!(
                    agent_id = agent.id,
                    tool = %extra.name,
                    "tool call in summary reply ignored"
                );
                String::new()
            }
        };

        Ok(TurnResponse {
            message: Message::assistant(summary),
            tool_invocation: Some(ToolInvocation {
                name: call.name,
                arguments,
                follow_up_messages: working,
            }),
            appended_messages: vec![echo, tool_result],
        })
    }

    async fn bounded<T>(&self, what: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(format!(
                "{} exceeded {}s",
                what,
                self.call_timeout.as_secs_f64()
            ))),
        }
    }
}

/// Turn a raw argument payload into positional values.
///
/// Object properties keep the order the model wrote them in. Anything that
/// is not an object or array yields no arguments.
pub fn parse_arguments(tool: &str, raw: &str) -> Vec<Value> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map.into_iter().map(|(_, v)| v).collect(),
        Ok(Value::Array(items)) => items,
        Ok(other) => {
            warn!(tool, payload = %other, "tool arguments are not an object, ignoring them");
            Vec::new()
        }
        Err(e) => {
            warn!(tool, error = %e, "malformed tool arguments, calling with none");
            Vec::new()
        }
    }
}

/// Text between the first and last code fence, without the opening info string.
pub fn extract_code_block(text: &str) -> Option<String> {
    let start = text.find(FENCE)?;
    let end = text.rfind(FENCE)?;
    if end < start + FENCE.len() {
        return None;
    }

    let inner = &text[start + FENCE.len()..end];
    let body = match inner.split_once('\n') {
        Some((_info, rest)) => rest,
        None => inner,
    };
    Some(body.strip_suffix('\n').unwrap_or(body).to_string())
}

async fn write_artifact(path: &Path, code: &str) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            warn!(path = %path.display(), error = %e, "could not create artifact directory");
            return;
        }
    }
    match tokio::fs::write(path, code).await {
        Ok(()) => debug!(path = %path.display(), bytes = code.len(), "code artifact written"),
        Err(e) => warn!(path = %path.display(), error = %e, "could not write code artifact"),
    }
}
