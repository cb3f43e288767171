//! TOML-based configuration for Roundtable
//!
//! This module provides declarative configuration for the HTTP server, the
//! model provider, conversation defaults, tools, and seed agents via a TOML
//! file (`roundtable.toml`).
//!
//! # Hot Reloading
//!
//! Configuration changes can be picked up at runtime. Use [`ConfigManager`]
//! for lock-free access to the current configuration; conversation defaults
//! are read at the start of every run, so a reload applies to the next
//! conversation. Tools and seed agents are only read at startup.

use arc_swap::ArcSwap;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Root configuration structure loaded from roundtable.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundtableConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Per-tool switches, keyed by tool name
    #[serde(default)]
    pub tools: HashMap<String, ToolConfig>,

    /// Agents created at startup, in order
    #[serde(default)]
    pub agents: Vec<AgentSeed>,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ProviderConfig {
    /// Resolve the API key from the environment.
    ///
    /// Local servers (Ollama, LM Studio) ignore the key, so an empty
    /// `api_key_env` means "send no key".
    pub fn api_key(&self) -> crate::types::Result<String> {
        if self.api_key_env.is_empty() {
            return Ok(String::new());
        }
        std::env::var(&self.api_key_env)
            .map_err(|_| ConfigError::MissingEnvVar(self.api_key_env.clone()).into())
    }
}

// ============= Conversation Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Turn budget used when a request does not give one
    #[serde(default = "default_max_turns")]
    pub default_max_turns: usize,

    /// Largest turn budget a single request may ask for
    #[serde(default = "default_max_turns_limit")]
    pub max_turns_limit: usize,

    /// Upper bound on any single model call or tool execution
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,

    /// Where the last fenced code block of a reply is written. Unset disables it.
    #[serde(default)]
    pub code_artifact_path: Option<PathBuf>,
}

fn default_max_turns() -> usize {
    6
}

fn default_max_turns_limit() -> usize {
    100
}

fn default_call_timeout() -> u64 {
    120
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            default_max_turns: default_max_turns(),
            max_turns_limit: default_max_turns_limit(),
            call_timeout_secs: default_call_timeout(),
            code_artifact_path: None,
        }
    }
}

impl ConversationConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

// ============= Tool Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ============= Agent Seeds =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSeed {
    pub name: String,

    /// Opaque model identifier passed to the provider
    pub model: String,

    #[serde(default)]
    pub system_prompt: Option<String>,

    #[serde(default)]
    pub tools: Vec<String>,
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Tool '{0}' referenced by agent '{1}' does not exist or is disabled")]
    MissingTool(String, String),

    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),
}

impl From<ConfigError> for crate::types::AppError {
    fn from(err: ConfigError) -> Self {
        crate::types::AppError::Configuration(err.to_string())
    }
}

impl RoundtableConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RoundtableConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.conversation.default_max_turns == 0 {
            return Err(ConfigError::ValidationError(
                "conversation.default_max_turns must be greater than zero".to_string(),
            ));
        }
        if self.conversation.max_turns_limit < self.conversation.default_max_turns {
            return Err(ConfigError::ValidationError(format!(
                "conversation.max_turns_limit ({}) is below default_max_turns ({})",
                self.conversation.max_turns_limit, self.conversation.default_max_turns
            )));
        }
        if self.conversation.call_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "conversation.call_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.provider.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider.request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let builtin = crate::tools::ToolRegistry::with_default_tools();
        for name in self.tools.keys() {
            if !builtin.has_tool(name) {
                return Err(ConfigError::ValidationError(format!(
                    "[tools.{}] does not name a built-in tool",
                    name
                )));
            }
        }

        for (index, seed) in self.agents.iter().enumerate() {
            if seed.name.trim().is_empty() || seed.model.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "agents[{}] needs a non-empty name and model",
                    index
                )));
            }

            for tool_name in &seed.tools {
                let enabled = self.tools.get(tool_name).map(|t| t.enabled).unwrap_or(true);
                if !builtin.has_tool(tool_name) || !enabled {
                    return Err(ConfigError::MissingTool(
                        tool_name.clone(),
                        seed.name.clone(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Names of every built-in tool not switched off in `[tools]`
    pub fn enabled_tools(&self) -> Vec<String> {
        crate::tools::ToolRegistry::from_config(&self.tools).tool_names()
    }
}

// ============= Hot Reloading Configuration Manager =============

/// Thread-safe configuration manager with hot reloading support
pub struct ConfigManager {
    config: Arc<ArcSwap<RoundtableConfig>>,
    config_path: PathBuf,
    watcher: RwLock<Option<RecommendedWatcher>>,
}

impl ConfigManager {
    /// Create a new configuration manager and load the initial config
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(ConfigError::ReadError)?
                .join(path)
        };

        let config = RoundtableConfig::load(&path)?;

        Ok(Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: path,
            watcher: RwLock::new(None),
        })
    }

    /// Create a config manager directly from a config (useful for testing).
    /// It has no backing file, so `reload` and `start_watching` will fail.
    pub fn from_config(config: RoundtableConfig) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: PathBuf::from("roundtable.toml"),
            watcher: RwLock::new(None),
        }
    }

    /// Get the current configuration (lockless read)
    pub fn config(&self) -> Arc<RoundtableConfig> {
        self.config.load_full()
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Manually reload the configuration from disk. The old config stays on failure.
    pub fn reload(&self) -> Result<(), ConfigError> {
        info!(path = ?self.config_path, "Reloading configuration");

        let new_config = RoundtableConfig::load(&self.config_path)?;
        self.config.store(Arc::new(new_config));

        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Start watching the config file for changes. Must run inside a tokio runtime.
    pub fn start_watching(&self) -> Result<(), ConfigError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        let _ = tx.send(());
                    }
                }
                Err(e) => {
                    error!("Config watcher error: {:?}", e);
                }
            }
        })?;

        if let Some(parent) = self.config_path.parent() {
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }
        *self.watcher.write() = Some(watcher);

        let config_path = self.config_path.clone();
        let config_arc = Arc::clone(&self.config);

        tokio::spawn(async move {
            let debounce = Duration::from_millis(500);
            let mut last_reload: Option<std::time::Instant> = None;

            while rx.recv().await.is_some() {
                if last_reload.is_some_and(|t| t.elapsed() < debounce) {
                    continue;
                }

                // let the writer finish
                tokio::time::sleep(Duration::from_millis(100)).await;

                match RoundtableConfig::load(&config_path) {
                    Ok(new_config) => {
                        config_arc.store(Arc::new(new_config));
                        info!("Configuration hot-reloaded successfully");
                        last_reload = Some(std::time::Instant::now());
                    }
                    Err(e) => {
                        warn!("Failed to hot-reload config: {}. Keeping previous config.", e);
                    }
                }
            }
        });

        info!("Configuration hot-reload watcher started");
        Ok(())
    }

    /// Stop watching for configuration changes
    pub fn stop_watching(&self) {
        *self.watcher.write() = None;
        info!("Configuration hot-reload watcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_config() -> &'static str {
        r#"
[server]
host = "0.0.0.0"
port = 4000
log_level = "debug"

[provider]
base_url = "http://localhost:11434/v1"
api_key_env = ""

[conversation]
default_max_turns = 4
call_timeout_secs = 30
code_artifact_path = "artifacts/code.txt"

[tools.text_stats]
enabled = false

[[agents]]
name = "Ada"
model = "llama3.2"
system_prompt = "You are a mathematician."
tools = ["calculator"]

[[agents]]
name = "Grace"
model = "llama3.2"
"#
    }

    #[test]
    fn test_parse_full_config() {
        let config = RoundtableConfig::from_toml_str(sample_config()).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.provider.base_url, "http://localhost:11434/v1");
        assert_eq!(config.conversation.default_max_turns, 4);
        assert_eq!(
            config.conversation.code_artifact_path,
            Some(PathBuf::from("artifacts/code.txt"))
        );
        assert_eq!(config.agents.len(), 2);
        assert_eq!(config.agents[0].tools, vec!["calculator"]);
        assert!(config.agents[1].system_prompt.is_none());
        assert_eq!(config.enabled_tools(), vec!["calculator", "current_time"]);
    }

    #[test]
    fn test_defaults_from_empty_file() {
        let config = RoundtableConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.conversation.default_max_turns, 6);
        assert_eq!(config.conversation.max_turns_limit, 100);
        assert_eq!(config.provider.api_key_env, "OPENAI_API_KEY");
        assert!(config.agents.is_empty());
    }

    #[test]
    fn test_zero_turn_budget_rejected() {
        let err = RoundtableConfig::from_toml_str("[conversation]\ndefault_max_turns = 0\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_turn_limit_below_default_rejected() {
        let err = RoundtableConfig::from_toml_str(
            "[conversation]\ndefault_max_turns = 8\nmax_turns_limit = 4\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError(ref m) if m.contains("max_turns_limit")
        ));
    }

    #[test]
    fn test_seed_agent_with_disabled_tool_rejected() {
        let toml = r#"
[tools.calculator]
enabled = false

[[agents]]
name = "Ada"
model = "m"
tools = ["calculator"]
"#;
        let err = RoundtableConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingTool(ref t, ref a) if t == "calculator" && a == "Ada"
        ));
    }

    #[test]
    fn test_seed_agent_with_unknown_tool_rejected() {
        let toml = "[[agents]]\nname = \"Ada\"\nmodel = \"m\"\ntools = [\"teleport\"]\n";
        assert!(matches!(
            RoundtableConfig::from_toml_str(toml),
            Err(ConfigError::MissingTool(_, _))
        ));
    }

    #[test]
    fn test_seed_agent_without_model_rejected() {
        let toml = "[[agents]]\nname = \"Ada\"\nmodel = \"  \"\n";
        assert!(matches!(
            RoundtableConfig::from_toml_str(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_unknown_tool_section_rejected() {
        assert!(RoundtableConfig::from_toml_str("[tools.teleport]\nenabled = true\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = RoundtableConfig::load("/definitely/not/here/roundtable.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_manager_reload_keeps_old_config_on_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[conversation]\ndefault_max_turns = 3\n").unwrap();

        let manager = ConfigManager::new(file.path()).unwrap();
        assert_eq!(manager.config().conversation.default_max_turns, 3);

        std::fs::write(file.path(), "[conversation]\ndefault_max_turns = 9\n").unwrap();
        manager.reload().unwrap();
        assert_eq!(manager.config().conversation.default_max_turns, 9);

        std::fs::write(file.path(), "[conversation]\ndefault_max_turns = 0\n").unwrap();
        assert!(manager.reload().is_err());
        assert_eq!(manager.config().conversation.default_max_turns, 9);
    }

    #[test]
    fn test_empty_api_key_env_means_no_key() {
        let provider = ProviderConfig {
            api_key_env: String::new(),
            ..ProviderConfig::default()
        };
        assert_eq!(provider.api_key().unwrap(), "");
    }
}
