use crate::tools::registry::Tool;
use crate::tools::{arg_f64, arg_str};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct Calculator;

#[async_trait]
impl Tool for Calculator {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Perform basic arithmetic operations on two numbers"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["add", "subtract", "multiply", "divide"]
                },
                "a": { "type": "number" },
                "b": { "type": "number" }
            },
            "required": ["operation", "a", "b"]
        })
    }

    async fn execute(&self, args: &[Value]) -> Result<Value> {
        let op = arg_str(self.name(), args, 0, "operation")?;
        let a = arg_f64(self.name(), args, 1, "a")?;
        let b = arg_f64(self.name(), args, 2, "b")?;

        let result = match op {
            "add" => a + b,
            "subtract" => a - b,
            "multiply" => a * b,
            "divide" if b == 0.0 => {
                return Err(AppError::ToolExecution {
                    tool: self.name().to_string(),
                    message: "division by zero".to_string(),
                })
            }
            "divide" => a / b,
            other => {
                return Err(AppError::ToolExecution {
                    tool: self.name().to_string(),
                    message: format!("unsupported operation '{}'", other),
                })
            }
        };

        Ok(json!({ "result": result }))
    }
}
