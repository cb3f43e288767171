use crate::types::{AppError, Result, ToolDefinition};
use crate::utils::toml_config::ToolConfig;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// A server-side function the model can ask to run.
///
/// Arguments arrive positionally, in the order the model listed them in its
/// JSON payload.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    async fn execute(&self, args: &[Value]) -> Result<Value>;
}

/// A tool's schema paired with its executable entry point.
#[derive(Clone)]
pub struct ToolDescriptor {
    pub definition: ToolDefinition,
    tool: Arc<dyn Tool>,
}

impl ToolDescriptor {
    fn from_tool(tool: Arc<dyn Tool>) -> Self {
        Self {
            definition: ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            },
            tool,
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub async fn execute(&self, args: &[Value]) -> Result<Value> {
        self.tool.execute(args).await
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

/// Plugin table of every tool the server can expose.
///
/// Populated once at startup; lookups never touch the file system.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a new registry with every built-in tool (calculator, clock, text stats)
    pub fn with_default_tools() -> Self {
        let mut registry = Self::new();
        for tool in builtin_tools() {
            registry.register(tool);
        }
        registry
    }

    /// Create a registry with the built-in tools, skipping those disabled in config
    pub fn from_config(tools: &HashMap<String, ToolConfig>) -> Self {
        let mut registry = Self::new();
        for tool in builtin_tools() {
            let enabled = tools.get(tool.name()).map(|c| c.enabled).unwrap_or(true);
            if enabled {
                registry.register(tool);
            }
        }
        registry
    }

    /// Register a tool. A tool with the same name replaces the earlier one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            warn!(tool = %name, "tool name registered twice, keeping the later one");
        }
    }

    /// Fresh name -> descriptor mapping of everything currently registered
    pub fn discover(&self) -> HashMap<String, ToolDescriptor> {
        self.tools
            .iter()
            .map(|(name, tool)| (name.clone(), ToolDescriptor::from_tool(Arc::clone(tool))))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<ToolDescriptor> {
        self.tools
            .get(name)
            .map(|tool| ToolDescriptor::from_tool(Arc::clone(tool)))
    }

    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .discover()
            .into_values()
            .map(|descriptor| descriptor.definition)
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Definitions for the given names, in the order given. Unknown names are skipped.
    pub fn get_tool_definitions_for(&self, names: &[String]) -> Vec<ToolDefinition> {
        names
            .iter()
            .filter_map(|name| self.get(name))
            .map(|descriptor| descriptor.definition)
            .collect()
    }

    pub async fn execute(&self, name: &str, args: &[Value]) -> Result<Value> {
        match self.get(name) {
            Some(descriptor) => descriptor.execute(args).await,
            None => Err(AppError::UnknownTool(name.to_string())),
        }
    }

    /// Get a sorted list of all registered tool names
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a tool is registered
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }
}

fn builtin_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(crate::tools::calculator::Calculator),
        Arc::new(crate::tools::clock::CurrentTime),
        Arc::new(crate::tools::text::TextStats),
    ]
}
