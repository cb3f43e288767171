use crate::tools::registry::Tool;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use chrono::{FixedOffset, Utc};
use serde_json::{json, Value};

/// Reports the current time, in UTC or a fixed offset such as `+05:30`.
pub struct CurrentTime;

impl CurrentTime {
    fn parse_offset(zone: &str) -> Option<FixedOffset> {
        let zone = zone.trim();
        if zone.is_empty() || zone.eq_ignore_ascii_case("utc") || zone == "Z" {
            return FixedOffset::east_opt(0);
        }

        let (sign, rest) = match zone.chars().next()? {
            '+' => (1, &zone[1..]),
            '-' => (-1, &zone[1..]),
            _ => return None,
        };
        // `u32::from_str` takes a leading '+', so check the digits first
        let number = |part: &str| -> Option<u32> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            part.parse::<u32>().ok()
        };
        let (hours, minutes) = match rest.split_once(':') {
            Some((h, m)) => (number(h)?, number(m)?),
            None => (number(rest)?, 0),
        };
        if hours > 23 || minutes > 59 {
            return None;
        }
        let seconds = (hours * 3600 + minutes * 60) as i32;
        FixedOffset::east_opt(sign * seconds)
    }
}

#[async_trait]
impl Tool for CurrentTime {
    fn name(&self) -> &str {
        "current_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time, optionally at a fixed UTC offset"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "timezone": {
                    "type": "string",
                    "description": "\"UTC\" or an offset like \"+02:00\""
                }
            },
            "required": []
        })
    }

    async fn execute(&self, args: &[Value]) -> Result<Value> {
        let zone = args.first().and_then(Value::as_str).unwrap_or("UTC");
        let offset = Self::parse_offset(zone).ok_or_else(|| AppError::ToolExecution {
            tool: self.name().to_string(),
            message: format!("unrecognised timezone '{}'", zone),
        })?;

        let now = Utc::now().with_timezone(&offset);
        Ok(json!({
            "iso8601": now.to_rfc3339(),
            "unix": now.timestamp(),
        }))
    }
}
