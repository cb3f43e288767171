//! # Roundtable - turn-based multi-agent conversations
//!
//! Register agents (name + model + system prompt + tools), then let them
//! answer a user's opening message in round-robin order. An agent may call
//! one server-side tool per turn; the result is fed back to the model for a
//! natural-language summary before the next agent speaks.
//!
//! ## Overview
//!
//! Roundtable can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `roundtable-server` binary
//! 2. **As a library** - Drive a [`Conductor`] from your own code
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use roundtable::{AgentStore, Conductor, ConfigManager, ToolRegistry, llm::create_client};
//! use std::sync::Arc;
//!
//! let config_manager = Arc::new(ConfigManager::new("roundtable.toml")?);
//! let config = config_manager.config();
//!
//! let tools = Arc::new(ToolRegistry::from_config(&config.tools));
//! let store = Arc::new(AgentStore::new(tools));
//! let ada = store.create_agent("Ada", "gpt-4o-mini", None)?;
//! store.assign_tool(ada.id, "calculator")?;
//!
//! let conductor = Conductor::new(store, create_client(&config.provider)?, config_manager);
//! let outcome = conductor.run(&[ada.id], "What is 6 * 7?", 1).await;
//! ```
//!
//! ## Modules
//!
//! - [`agents`] - Agent records, the agent store and the single-turn responder
//! - [`conversation`] - Round-robin conductor and append-only transcript
//! - [`tools`] - Tool trait, registry and built-in tools
//! - [`llm`] - Model provider abstraction
//! - [`api`] - REST API handlers and routes
//! - [`types`] - Messages, requests and error handling

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Agents, agent store and single-turn responder.
pub mod agents;
/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// Round-robin conversations.
pub mod conversation;
/// LLM provider clients and abstractions.
pub mod llm;
/// Built-in tools and the tool registry.
pub mod tools;
/// Core types (messages, requests, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use agents::{Agent, AgentStore, TurnResponder};
pub use conversation::{Conductor, ConversationOutcome, ConversationStatus};
pub use llm::{Completion, LLMClient};
pub use tools::registry::ToolRegistry;
pub use types::{AppError, Message, Result};
pub use utils::toml_config::{ConfigManager, RoundtableConfig};

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML configuration with hot-reload support
    pub config_manager: Arc<ConfigManager>,
    /// Every agent created in this process
    pub agent_store: Arc<AgentStore>,
    /// Tools that can be assigned to agents
    pub tool_registry: Arc<ToolRegistry>,
    /// Runs conversations against the store
    pub conductor: Arc<Conductor>,
}

impl AppState {
    /// Wire up the registry, the store (seeded from `[[agents]]`) and the conductor.
    pub fn new(config_manager: Arc<ConfigManager>, llm: Arc<dyn LLMClient>) -> Result<Self> {
        let config = config_manager.config();

        let tool_registry = Arc::new(ToolRegistry::from_config(&config.tools));
        let agent_store = Arc::new(AgentStore::from_seeds(
            Arc::clone(&tool_registry),
            &config.agents,
        )?);
        let conductor = Arc::new(Conductor::new(
            Arc::clone(&agent_store),
            llm,
            Arc::clone(&config_manager),
        ));

        Ok(Self {
            config_manager,
            agent_store,
            tool_registry,
            conductor,
        })
    }
}
