use crate::agents::{Agent, DEFAULT_SYSTEM_PROMPT};
use crate::tools::ToolRegistry;
use crate::types::{AgentId, AppError, Result};
use crate::utils::toml_config::AgentSeed;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Holds every agent created in this process, in insertion order.
///
/// Agents are never removed. The store is shared behind an `Arc` by the HTTP
/// layer and the conductor; readers get cloned snapshots so no lock is held
/// across a model call.
pub struct AgentStore {
    agents: RwLock<Vec<Agent>>,
    next_id: AtomicU64,
    tool_registry: Arc<ToolRegistry>,
}

impl AgentStore {
    pub fn new(tool_registry: Arc<ToolRegistry>) -> Self {
        Self {
            agents: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            tool_registry,
        }
    }

    /// Create a store and populate it from `[[agents]]` seed entries
    pub fn from_seeds(tool_registry: Arc<ToolRegistry>, seeds: &[AgentSeed]) -> Result<Self> {
        let store = Self::new(tool_registry);
        for seed in seeds {
            let agent = store.create_agent(&seed.name, &seed.model, seed.system_prompt.as_deref())?;
            for tool in &seed.tools {
                store.assign_tool(agent.id, tool)?;
            }
        }
        Ok(store)
    }

    pub fn tool_registry(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    /// Create an agent. A missing or blank prompt falls back to the default one.
    ///
    /// # Errors
    ///
    /// `Validation` when `name` or `model` is empty.
    pub fn create_agent(
        &self,
        name: &str,
        model: &str,
        system_prompt: Option<&str>,
    ) -> Result<Agent> {
        let name = name.trim();
        let model = model.trim();
        if name.is_empty() {
            return Err(AppError::Validation("agent name is required".to_string()));
        }
        if model.is_empty() {
            return Err(AppError::Validation("agent model is required".to_string()));
        }

        let system_prompt = system_prompt
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
            .to_string();

        let agent = Agent {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            name: name.to_string(),
            model: model.to_string(),
            system_prompt,
            tools: Vec::new(),
            history: Vec::new(),
        };

        self.agents.write().push(agent.clone());
        info!(agent_id = agent.id, name = %agent.name, model = %agent.model, "agent created");
        Ok(agent)
    }

    pub fn find_agent(&self, id: AgentId) -> Option<Agent> {
        self.agents.read().iter().find(|a| a.id == id).cloned()
    }

    /// All agents, in creation order
    pub fn list_agents(&self) -> Vec<Agent> {
        self.agents.read().clone()
    }

    pub fn len(&self) -> usize {
        self.agents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.read().is_empty()
    }

    /// Give an agent access to a registered tool.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown agent, `UnknownTool` when the registry has no
    /// such tool, `DuplicateTool` when the agent already holds it. The agent
    /// is left unchanged on error.
    pub fn assign_tool(&self, agent_id: AgentId, tool_name: &str) -> Result<Agent> {
        let mut agents = self.agents.write();
        let agent = agents
            .iter_mut()
            .find(|a| a.id == agent_id)
            .ok_or_else(|| AppError::NotFound(format!("agent {}", agent_id)))?;

        if !self.tool_registry.discover().contains_key(tool_name) {
            return Err(AppError::UnknownTool(tool_name.to_string()));
        }
        if agent.has_tool(tool_name) {
            return Err(AppError::DuplicateTool {
                agent_id,
                tool: tool_name.to_string(),
            });
        }

        agent.tools.push(tool_name.to_string());
        info!(agent_id, tool = %tool_name, "tool assigned");
        Ok(agent.clone())
    }
}
