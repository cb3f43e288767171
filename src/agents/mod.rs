//! Agents and the single-turn responder
//!
//! An [`Agent`] is plain data: identity, model, prompt and the names of the
//! tools it may call. The [`AgentStore`] owns every agent for the lifetime of
//! the process, and the [`TurnResponder`] turns one agent plus a transcript
//! into exactly one turn.

/// Single-turn response state machine.
pub mod responder;
/// Process-wide agent store.
pub mod store;

use crate::types::{AgentId, Message};
use serde::{Deserialize, Serialize};

pub use responder::{ToolInvocation, TurnResponder, TurnResponse};
pub use store::AgentStore;

/// Prompt used when an agent is created without one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful agent.";

/// A named configuration (model + prompt + tool set) that can take turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    /// Opaque model identifier passed through to the provider
    pub model: String,
    pub system_prompt: String,
    /// Names of assigned tools, in assignment order
    pub tools: Vec<String>,
    /// Reserved for per-agent history; the shared transcript is authoritative
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Message>,
}

impl Agent {
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t == name)
    }
}
