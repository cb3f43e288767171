use crate::llm::client::{Completion, LLMClient};
use crate::types::{AppError, Message, Result, ToolCall, ToolDefinition};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessage, ChatCompletionTool,
        ChatCompletionToolChoiceOption, ChatCompletionToolType, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse, FunctionCall, FunctionObject,
    },
    Client,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAIClient {
    client: Client<OpenAIConfig>,
}

impl OpenAIClient {
    pub fn new(api_base: String, api_key: String, timeout: Duration) -> Result<Self> {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base.trim_end_matches('/'));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client: Client::with_config(config).with_http_client(http),
        })
    }

    fn to_request_message(message: &Message) -> Result<ChatCompletionRequestMessage> {
        let message = match message {
            Message::System { content } => ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage::from(content.clone()),
            ),
            Message::User { content } => ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage::from(content.clone()),
            ),
            Message::Assistant {
                content,
                name,
                tool_call,
            } => {
                let mut args = ChatCompletionRequestAssistantMessageArgs::default();
                // providers reject empty strings next to tool_calls
                if !(content.is_empty() && tool_call.is_some()) {
                    args.content(content.clone());
                }
                if let Some(name) = name {
                    args.name(sanitize_name(name));
                }
                if let Some(call) = tool_call {
                    args.tool_calls(vec![ChatCompletionMessageToolCall {
                        id: call.id.clone(),
                        r#type: ChatCompletionToolType::Function,
                        function: FunctionCall {
                            name: call.name.clone(),
                            arguments: call.arguments.clone(),
                        },
                    }]);
                }
                ChatCompletionRequestMessage::Assistant(args.build().map_err(build_error)?)
            }
            Message::Tool {
                content,
                tool_call_id,
            } => ChatCompletionRequestMessage::Tool(
                ChatCompletionRequestToolMessageArgs::default()
                    .content(content.clone())
                    .tool_call_id(tool_call_id.clone())
                    .build()
                    .map_err(build_error)?,
            ),
        };
        Ok(message)
    }

    fn to_tool(tool: &ToolDefinition) -> ChatCompletionTool {
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                parameters: Some(tool.parameters.clone()),
                strict: None,
            },
        }
    }

    fn into_completion(response: CreateChatCompletionResponse) -> Result<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ModelCall("No choices in model response".to_string()))?;

        let mut calls = choice.message.tool_calls.unwrap_or_default().into_iter();
        if let Some(first) = calls.next() {
            let ignored = calls.count();
            if ignored > 0 {
                warn!(
                    tool = %first.function.name,
                    ignored,
                    "model requested several tool calls, only the first is honored"
                );
            }
            return Ok(Completion::ToolCall(ToolCall {
                id: first.id,
                name: first.function.name,
                arguments: first.function.arguments,
            }));
        }

        Ok(Completion::Text(choice.message.content.unwrap_or_default()))
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<Completion> {
        let chat_messages = messages
            .iter()
            .map(Self::to_request_message)
            .collect::<Result<Vec<_>>>()?;
        let tools: Vec<ChatCompletionTool> = tools
            .unwrap_or_default()
            .iter()
            .map(Self::to_tool)
            .collect();

        debug!(
            model,
            messages = chat_messages.len(),
            tools = tools.len(),
            "sending chat completion"
        );

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(model).messages(chat_messages);
        if !tools.is_empty() {
            args.tools(tools)
                .tool_choice(ChatCompletionToolChoiceOption::Auto);
        }
        let request = args.build().map_err(build_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::ModelCall(format!("Model provider error: {}", e)))?;

        Self::into_completion(response)
    }

    fn provider_name(&self) -> &str {
        "openai-compatible"
    }
}

fn build_error(e: async_openai::error::OpenAIError) -> AppError {
    AppError::Internal(format!("Failed to build chat request: {}", e))
}

/// Providers only accept `[A-Za-z0-9_-]{1,64}` in the `name` field.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect();
    if cleaned.is_empty() {
        "agent".to_string()
    } else {
        cleaned
    }
}
