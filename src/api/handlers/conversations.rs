//! Conversation handlers.
//!
//! A conversation always answers 200 once it has started: an unknown agent
//! or a failed turn is reported in `status` next to the partial transcript.

use crate::{
    conversation::ConversationOutcome,
    types::{ConversationRequest, Result},
    AppState,
};
use axum::{extract::State, Json};

pub async fn run_conversation(
    State(state): State<AppState>,
    Json(payload): Json<ConversationRequest>,
) -> Result<Json<ConversationOutcome>> {
    let outcome = state.conductor.run_request(payload).await?;
    Ok(Json(outcome))
}
