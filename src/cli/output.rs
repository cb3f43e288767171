//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the Roundtable CLI.

use crate::conversation::{ConversationOutcome, ConversationStatus};
use crate::types::Message;
use owo_colors::OwoColorize;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the startup banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n   {} {}\n",
                "Roundtable".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!("\n   Roundtable v{}\n", env!("CARGO_PKG_VERSION"));
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a step message (for multi-step operations)
    pub fn step(&self, step_num: u32, total: u32, message: &str) {
        if self.colored {
            println!(
                "  {} {}",
                format!("[{}/{}]", step_num, total).dimmed(),
                message.bright_white()
            );
        } else {
            println!("  [{}/{}] {}", step_num, total, message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {}", message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a table header row
    pub fn table_header(&self, columns: &[&str]) {
        let header = pad_columns(columns);
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(columns.len() * 16).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(columns.len() * 16));
        }
    }

    /// Print a table row
    pub fn table_row(&self, values: &[&str]) {
        println!("    {}", pad_columns(values));
    }

    /// Print one transcript entry, labelled by role and author
    pub fn message(&self, message: &Message) {
        let label = message_label(message);
        let content = match message {
            Message::Assistant {
                tool_call: Some(call),
                ..
            } => format!("calls {}({})", call.name, call.arguments),
            other => other.content().to_string(),
        };

        if !self.colored {
            println!("  {}: {}", label, content);
            return;
        }

        match message {
            Message::User { .. } => println!("  {} {}", label.bright_green().bold(), content),
            Message::Assistant { .. } => println!("  {} {}", label.bright_cyan().bold(), content),
            Message::Tool { .. } => println!("  {} {}", label.magenta(), content.dimmed()),
            Message::System { .. } => println!("  {} {}", label.yellow().bold(), content.yellow()),
        }
    }

    /// Print a whole conversation and how it ended
    pub fn transcript(&self, outcome: &ConversationOutcome) {
        self.header(&format!("Conversation {}", outcome.conversation_id));
        for message in &outcome.messages {
            self.message(message);
        }
        self.newline();

        let turns = format!("{} turn(s)", outcome.turns_taken);
        match &outcome.status {
            ConversationStatus::Completed => self.success(&format!("Completed after {}", turns)),
            ConversationStatus::AgentNotFound { agent_id } => {
                self.warning(&format!("Stopped after {}: agent {} not found", turns, agent_id))
            }
            ConversationStatus::TurnFailed { agent_id, error } => self.error(&format!(
                "Aborted after {}: agent {} failed: {}",
                turns, agent_id, error
            )),
        }
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}

fn pad_columns(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("{:<15}", v))
        .collect::<Vec<_>>()
        .join(" ")
}

fn message_label(message: &Message) -> String {
    match message {
        Message::Assistant {
            name: Some(name), ..
        } => format!("[{}]", name),
        Message::Tool { tool_call_id, .. } => format!("[tool {}]", tool_call_id),
        other => format!("[{}]", other.role().as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolCall;
    use uuid::Uuid;

    #[test]
    fn test_output_no_color() {
        let output = Output::no_color();
        assert!(!output.colored);
        assert!(Output::default().colored);
    }

    #[test]
    fn test_message_labels() {
        assert_eq!(message_label(&Message::user("hi")), "[user]");
        assert_eq!(
            message_label(&Message::assistant("x").attributed_to("Ada")),
            "[Ada]"
        );
        assert_eq!(message_label(&Message::assistant("x")), "[assistant]");
        assert_eq!(message_label(&Message::tool_result("c1", "4")), "[tool c1]");
    }

    #[test]
    fn test_table_row_formatting() {
        assert_eq!(pad_columns(&["a", "b"]), format!("{:<15} {:<15}", "a", "b"));
        assert_eq!(pad_columns(&[]), "");
    }

    #[test]
    fn test_output_methods_no_panic() {
        let outcome = ConversationOutcome {
            conversation_id: Uuid::new_v4(),
            messages: vec![
                Message::user("2 + 2?"),
                Message::assistant_tool_call(ToolCall {
                    id: "c1".into(),
                    name: "calculator".into(),
                    arguments: "{}".into(),
                })
                .attributed_to("Ada"),
                Message::tool_result("c1", "{\"result\":4.0}"),
                Message::assistant("4").attributed_to("Ada"),
                Message::system("Agent 9 not found."),
            ],
            turns_taken: 1,
            status: ConversationStatus::AgentNotFound { agent_id: 9 },
        };

        for output in [Output::no_color(), Output::new()] {
            output.banner();
            output.step(1, 2, "step");
            output.kv("key", "value");
            output.list_item("item");
            output.hint("hint");
            output.table_header(&["Id", "Name"]);
            output.table_row(&["1", "Ada"]);
            output.transcript(&outcome);
        }
    }
}
