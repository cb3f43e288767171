use serde::{Deserialize, Serialize};

/// Identifier assigned to an agent at creation time.
pub type AgentId = u64;

// ============= Message Types =============

/// A single transcript entry.
///
/// Each role carries only the fields that mean something for it: only
/// assistant messages can be attributed to an agent or carry a tool-call
/// request, and only tool messages carry the correlation id of the call they
/// answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_call: Option<ToolCall>,
    },
    Tool {
        content: String,
        tool_call_id: String,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    /// Unattributed assistant text.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: content.into(),
            name: None,
            tool_call: None,
        }
    }

    /// The model's tool-call request, echoed back into the transcript.
    pub fn assistant_tool_call(call: ToolCall) -> Self {
        Message::Assistant {
            content: String::new(),
            name: None,
            tool_call: Some(call),
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Message::Tool {
            content: content.into(),
            tool_call_id: tool_call_id.into(),
        }
    }

    pub fn role(&self) -> MessageRole {
        match self {
            Message::System { .. } => MessageRole::System,
            Message::User { .. } => MessageRole::User,
            Message::Assistant { .. } => MessageRole::Assistant,
            Message::Tool { .. } => MessageRole::Tool,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System { content }
            | Message::User { content }
            | Message::Assistant { content, .. }
            | Message::Tool { content, .. } => content,
        }
    }

    /// Author name, for assistant messages attributed to an agent.
    pub fn name(&self) -> Option<&str> {
        match self {
            Message::Assistant { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    /// Attribute an assistant message to an agent. Other roles are returned as-is.
    pub fn attributed_to(self, agent_name: &str) -> Self {
        match self {
            Message::Assistant {
                content, tool_call, ..
            } => Message::Assistant {
                content,
                name: Some(agent_name.to_string()),
                tool_call,
            },
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Tool => "tool",
        }
    }
}

// ============= Tool Types =============

/// Schema the model sees for one tool.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A request from the model to invoke one named tool.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolCall {
    /// Correlation id chosen by the model provider
    pub id: String,
    pub name: String,
    /// Raw JSON argument payload, exactly as the model produced it
    pub arguments: String,
}

// ============= API Request/Response Types =============

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignToolRequest {
    pub tool: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationRequest {
    pub agent_ids: Vec<AgentId>,
    pub user_input: String,
    #[serde(default)]
    pub max_turns: Option<usize>,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Agent {agent_id} already has tool '{tool}'")]
    DuplicateTool { agent_id: AgentId, tool: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Model call failed: {0}")]
    ModelCall(String),

    #[error("Tool '{tool}' failed: {message}")]
    ToolExecution { tool: String, message: String },

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateTool { .. } => StatusCode::CONFLICT,
            AppError::UnknownTool(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ModelCall(_) => StatusCode::BAD_GATEWAY,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::ToolExecution { .. }
            | AppError::Configuration(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serializes_with_role_tag() {
        let msg = Message::assistant("hi").attributed_to("alice");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
        assert_eq!(json["name"], "alice");
        assert!(json.get("tool_call").is_none());

        let tool = Message::tool_result("call_1", "{\"result\":3}");
        let json = serde_json::to_value(&tool).unwrap();
        assert_eq!(json["role"], "tool");
        assert_eq!(json["tool_call_id"], "call_1");
    }

    #[test]
    fn test_attribution_leaves_other_roles_untouched() {
        let msg = Message::user("hello").attributed_to("bob");
        assert_eq!(msg, Message::user("hello"));
        assert_eq!(msg.name(), None);
    }

    #[test]
    fn test_tool_call_echo_has_empty_content() {
        let msg = Message::assistant_tool_call(ToolCall {
            id: "call_9".to_string(),
            name: "calculator".to_string(),
            arguments: "{}".to_string(),
        });
        assert_eq!(msg.role(), MessageRole::Assistant);
        assert_eq!(msg.content(), "");
    }

    #[test]
    fn test_error_status_codes() {
        use axum::http::StatusCode;
        use axum::response::IntoResponse;

        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                AppError::DuplicateTool {
                    agent_id: 1,
                    tool: "calculator".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                AppError::UnknownTool("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::ModelCall("x".into()), StatusCode::BAD_GATEWAY),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
