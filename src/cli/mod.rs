//! CLI module for Roundtable
//!
//! Provides command-line interface parsing for the roundtable-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use crate::types::AgentId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Roundtable - turn-based multi-agent conversations
#[derive(Parser, Debug)]
#[command(
    name = "roundtable-server",
    version,
    about = "Roundtable - turn-based multi-agent conversation server",
    long_about = "Registers agents (model + prompt + tools) and runs round-robin conversations\n\
                  between them over an OpenAI-compatible model provider.\n\n\
                  Run without arguments to start the HTTP server.",
    after_help = "EXAMPLES:\n    \
                  roundtable-server                          # Start the server (requires roundtable.toml)\n    \
                  roundtable-server --config my.toml         # Use a custom config file\n    \
                  roundtable-server chat -a 1 -a 2 \"Hello\"   # One-shot conversation with seeded agents\n    \
                  roundtable-server config --validate        # Check the configuration"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "roundtable.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Run one conversation between seeded agents and print the transcript
    Chat {
        /// Agent id, in speaking order (repeatable)
        #[arg(short, long = "agent", required = true)]
        agents: Vec<AgentId>,

        /// Turn budget (defaults to conversation.default_max_turns)
        #[arg(short, long)]
        turns: Option<usize>,

        /// Opening user message
        message: String,
    },

    /// List agents seeded from the configuration
    Agents,

    /// List available tools
    Tools,

    /// Show configuration information
    Config {
        /// Validate the configuration file and exit
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["roundtable-server"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("roundtable.toml"));
    }

    #[test]
    fn test_chat_arguments() {
        let cli = Cli::try_parse_from([
            "roundtable-server",
            "--no-color",
            "chat",
            "-a",
            "1",
            "--agent",
            "2",
            "--turns",
            "4",
            "What is 2 + 2?",
        ])
        .unwrap();

        assert!(cli.no_color);
        match cli.command {
            Some(Commands::Chat {
                agents,
                turns,
                message,
            }) => {
                assert_eq!(agents, vec![1, 2]);
                assert_eq!(turns, Some(4));
                assert_eq!(message, "What is 2 + 2?");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_chat_requires_an_agent() {
        assert!(Cli::try_parse_from(["roundtable-server", "chat", "hi"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "roundtable-server",
            "config",
            "--validate",
            "--config",
            "other.toml",
            "--json-logs",
        ])
        .unwrap();
        assert!(cli.json_logs);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(matches!(cli.command, Some(Commands::Config { validate: true })));
    }
}
