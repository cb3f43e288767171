//! Built-in Tools for Agent Capabilities
//!
//! Tools are server-resident functions a model can ask to run in the middle of
//! an agent's turn. Every tool is registered once at startup in the
//! [`ToolRegistry`](crate::tools::registry::ToolRegistry); agents are then
//! assigned a subset of them by name.
//!
//! # Available Tools
//!
//! | Tool | Positional arguments | Result |
//! |------|----------------------|--------|
//! | `calculator` | `operation`, `a`, `b` | `{"result": f64}` |
//! | `current_time` | `timezone` (optional, `UTC` or `+HH:MM`) | `{"iso8601": ..., "unix": ...}` |
//! | `text_stats` | `text` | `{"characters", "words", "lines"}` |
//!
//! # Argument Order
//!
//! Models send arguments as a JSON object. The object's properties are applied
//! to the tool positionally, in the order the model wrote them:
//!
//! ```ignore
//! // {"operation": "add", "a": 2, "b": 3} becomes ["add", 2, 3]
//! let result = registry.execute("calculator", &[json!("add"), json!(2), json!(3)]).await?;
//! ```

/// Arithmetic on two numbers.
pub mod calculator;
/// Current date and time.
pub mod clock;
/// Tool registry and descriptors.
pub mod registry;
/// Character, word and line counts.
pub mod text;

pub use registry::{Tool, ToolDescriptor, ToolRegistry};

use crate::types::{AppError, Result};
use serde_json::Value;

/// Fetch a required string argument at `index`.
pub(crate) fn arg_str<'a>(
    tool: &str,
    args: &'a [Value],
    index: usize,
    name: &str,
) -> Result<&'a str> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| missing(tool, index, name, "a string"))
}

/// Fetch a required numeric argument at `index`. Numeric strings are accepted.
pub(crate) fn arg_f64(tool: &str, args: &[Value], index: usize, name: &str) -> Result<f64> {
    match args.get(index) {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| missing(tool, index, name, "a number")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| missing(tool, index, name, "a number")),
        _ => Err(missing(tool, index, name, "a number")),
    }
}

fn missing(tool: &str, index: usize, name: &str, expected: &str) -> AppError {
    AppError::ToolExecution {
        tool: tool.to_string(),
        message: format!("argument {} ('{}') must be {}", index, name, expected),
    }
}
