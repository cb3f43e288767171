use crate::tools::arg_str;
use crate::tools::registry::Tool;
use crate::types::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct TextStats;

#[async_trait]
impl Tool for TextStats {
    fn name(&self) -> &str {
        "text_stats"
    }

    fn description(&self) -> &str {
        "Count the characters, words and lines in a piece of text"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string" }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, args: &[Value]) -> Result<Value> {
        let text = arg_str(self.name(), args, 0, "text")?;
        Ok(json!({
            "characters": text.chars().count(),
            "words": text.split_whitespace().count(),
            "lines": text.lines().count(),
        }))
    }
}
