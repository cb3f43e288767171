use crate::{types::ToolDefinition, AppState};
use axum::{extract::State, Json};

/// Every registered tool, sorted by name
pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDefinition>> {
    Json(state.tool_registry.get_tool_definitions())
}
