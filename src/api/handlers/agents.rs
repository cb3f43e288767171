use crate::{
    agents::Agent,
    types::{AgentId, AppError, AssignToolRequest, CreateAgentRequest, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn list_agents(State(state): State<AppState>) -> Json<Vec<Agent>> {
    Json(state.agent_store.list_agents())
}

pub async fn create_agent(
    State(state): State<AppState>,
    Json(payload): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<Agent>)> {
    let agent = state.agent_store.create_agent(
        &payload.name,
        &payload.model,
        payload.system_prompt.as_deref(),
    )?;
    Ok((StatusCode::CREATED, Json(agent)))
}

pub async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<AgentId>,
) -> Result<Json<Agent>> {
    state
        .agent_store
        .find_agent(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("agent {}", id)))
}

pub async fn assign_tool(
    State(state): State<AppState>,
    Path(id): Path<AgentId>,
    Json(payload): Json<AssignToolRequest>,
) -> Result<Json<Agent>> {
    let agent = state.agent_store.assign_tool(id, &payload.tool)?;
    Ok(Json(agent))
}
