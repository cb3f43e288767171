use anyhow::{Context, Result};
use roundtable::{
    cli::{output::Output, Cli, Commands},
    llm::create_client,
    tools::ToolRegistry,
    types::ConversationRequest,
    AgentStore, AppState, ConfigManager,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let config_manager = match ConfigManager::new(&cli.config) {
        Ok(manager) => Arc::new(manager),
        Err(e) => {
            output.error(&e.to_string());
            output.hint("Create a roundtable.toml or point --config at one.");
            std::process::exit(1);
        }
    };

    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config_manager.config().server.log_level.clone()
    };
    init_tracing(&log_level, cli.json_logs);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config_manager, &output).await,
        Commands::Chat {
            agents,
            turns,
            message,
        } => chat(config_manager, agents, turns, message, &output).await,
        Commands::Agents => list_agents(&config_manager, &output),
        Commands::Tools => {
            list_tools(&config_manager, &output);
            Ok(())
        }
        Commands::Config { validate } => {
            show_config(&config_manager, validate, &output);
            Ok(())
        }
    }
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "roundtable={level},roundtable_server={level},tower_http={level}",
            level = level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve(config_manager: Arc<ConfigManager>, output: &Output) -> Result<()> {
    output.banner();
    let config = config_manager.config();

    output.step(1, 3, "Connecting model provider");
    let llm = create_client(&config.provider).context("failed to build model provider client")?;

    output.step(2, 3, "Registering tools and seed agents");
    let state = AppState::new(Arc::clone(&config_manager), llm)?;
    output.kv("tools", &state.tool_registry.tool_names().join(", "));
    output.kv("agents", &state.agent_store.len().to_string());

    if let Err(e) = config_manager.start_watching() {
        output.warning(&format!("Config hot-reload disabled: {}", e));
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    output.step(3, 3, &format!("Listening on http://{}", addr));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "roundtable-server started");

    axum::serve(listener, roundtable::api::routes::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("roundtable-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

async fn chat(
    config_manager: Arc<ConfigManager>,
    agents: Vec<u64>,
    turns: Option<usize>,
    message: String,
    output: &Output,
) -> Result<()> {
    let config = config_manager.config();
    let llm = create_client(&config.provider).context("failed to build model provider client")?;
    let state = AppState::new(config_manager, llm)?;

    let outcome = state
        .conductor
        .run_request(ConversationRequest {
            agent_ids: agents,
            user_input: message,
            max_turns: turns,
        })
        .await?;

    output.transcript(&outcome);
    Ok(())
}

fn list_agents(config_manager: &ConfigManager, output: &Output) -> Result<()> {
    let config = config_manager.config();
    let store = AgentStore::from_seeds(
        Arc::new(ToolRegistry::from_config(&config.tools)),
        &config.agents,
    )?;

    output.header("Agents");
    if store.is_empty() {
        output.info("No agents configured. Add [[agents]] entries to the config.");
        return Ok(());
    }

    output.table_header(&["Id", "Name", "Model", "Tools"]);
    for agent in store.list_agents() {
        let id = agent.id.to_string();
        let tools = agent.tools.join(",");
        output.table_row(&[&id, &agent.name, &agent.model, &tools]);
    }
    Ok(())
}

fn list_tools(config_manager: &ConfigManager, output: &Output) {
    let registry = ToolRegistry::from_config(&config_manager.config().tools);

    output.header("Tools");
    for definition in registry.get_tool_definitions() {
        output.list_item(&format!("{} - {}", definition.name, definition.description));
    }
}

fn show_config(config_manager: &ConfigManager, validate: bool, output: &Output) {
    // ConfigManager::new already validated the file
    if validate {
        output.success(&format!(
            "{} is valid",
            config_manager.path().display()
        ));
        return;
    }

    let config = config_manager.config();
    output.header("Configuration");
    output.kv("file", &config_manager.path().display().to_string());
    output.kv(
        "server",
        &format!("{}:{}", config.server.host, config.server.port),
    );
    output.kv("log level", &config.server.log_level);
    output.kv("provider", &config.provider.base_url);
    output.kv("api key env", &config.provider.api_key_env);
    output.kv(
        "default max turns",
        &config.conversation.default_max_turns.to_string(),
    );
    output.kv(
        "max turns limit",
        &config.conversation.max_turns_limit.to_string(),
    );
    output.kv(
        "call timeout",
        &format!("{}s", config.conversation.call_timeout_secs),
    );
    output.kv(
        "code artifact",
        &config
            .conversation
            .code_artifact_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "disabled".to_string()),
    );
    output.kv("enabled tools", &config.enabled_tools().join(", "));
    output.kv("seed agents", &config.agents.len().to_string());
}
