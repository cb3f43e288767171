//! Round-robin conductor
//!
//! ```text
//!                  ┌──────────────── turn < max_turns ───────────────┐
//!                  ▼                                                 │
//!  start ──► AwaitingTurn ── resolve agent_ids[index] ── found ── respond ── ok ──┘
//!                  │                   │                           │
//!        max_turns reached         not found                     error
//!                  ▼                   ▼                           ▼
//!          BudgetExhausted       AgentNotFound                 TurnFailed
//! ```
//!
//! Every terminal state still returns the transcript built so far. Failures
//! are reported as a final system message, never raised.

use crate::agents::{AgentStore, TurnResponder};
use crate::conversation::Transcript;
use crate::llm::LLMClient;
use crate::types::{AgentId, AppError, ConversationRequest, Message, Result};
use crate::utils::toml_config::ConfigManager;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConductorState {
    AwaitingTurn,
    /// Terminal: an agent id did not resolve
    AgentNotFound,
    /// Terminal: the turn budget was used up
    BudgetExhausted,
    /// Terminal: a model call, tool execution or timeout failed
    TurnFailed,
}

impl ConductorState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ConductorState::AwaitingTurn)
    }
}

/// Everything the conductor tracks for one conversation.
#[derive(Debug, Clone)]
pub struct ConversationState {
    pub transcript: Transcript,
    pub agent_ids: Vec<AgentId>,
    pub turn: usize,
    pub max_turns: usize,
    /// Position in `agent_ids` of the agent that speaks next
    pub index: usize,
    pub state: ConductorState,
}

impl ConversationState {
    pub fn new(agent_ids: Vec<AgentId>, opening: &str, max_turns: usize) -> Self {
        let state = if max_turns == 0 || agent_ids.is_empty() {
            ConductorState::BudgetExhausted
        } else {
            ConductorState::AwaitingTurn
        };

        Self {
            transcript: Transcript::with_opening(opening),
            agent_ids,
            turn: 0,
            max_turns,
            index: 0,
            state,
        }
    }

    pub fn current_agent_id(&self) -> AgentId {
        self.agent_ids[self.index]
    }

    /// Count a completed turn and move to the next agent, wrapping around
    fn advance(&mut self) {
        self.turn += 1;
        self.index = (self.index + 1) % self.agent_ids.len();
        if self.turn >= self.max_turns {
            self.state = ConductorState::BudgetExhausted;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversationStatus {
    Completed,
    AgentNotFound { agent_id: AgentId },
    TurnFailed { agent_id: AgentId, error: String },
}

/// Final transcript plus how the conversation ended.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationOutcome {
    pub conversation_id: Uuid,
    pub messages: Vec<Message>,
    pub turns_taken: usize,
    pub status: ConversationStatus,
}

pub struct Conductor {
    agent_store: Arc<AgentStore>,
    llm: Arc<dyn LLMClient>,
    config: Arc<ConfigManager>,
}

impl Conductor {
    pub fn new(
        agent_store: Arc<AgentStore>,
        llm: Arc<dyn LLMClient>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            agent_store,
            llm,
            config,
        }
    }

    /// Entry point for external callers: validates the agent list and fills
    /// in the default turn budget.
    pub async fn run_request(&self, request: ConversationRequest) -> Result<ConversationOutcome> {
        if request.agent_ids.is_empty() {
            return Err(AppError::Validation(
                "agent_ids must contain at least one agent".to_string(),
            ));
        }

        let settings = self.config.config().conversation.clone();
        let max_turns = request.max_turns.unwrap_or(settings.default_max_turns);
        if max_turns > settings.max_turns_limit {
            return Err(AppError::Validation(format!(
                "max_turns {} exceeds the limit of {}",
                max_turns, settings.max_turns_limit
            )));
        }

        Ok(self
            .run(&request.agent_ids, &request.user_input, max_turns)
            .await)
    }

    /// Run a conversation of at most `max_turns` turns over `agent_ids`, in order.
    pub async fn run(
        &self,
        agent_ids: &[AgentId],
        opening: &str,
        max_turns: usize,
    ) -> ConversationOutcome {
        let conversation_id = Uuid::new_v4();
        let span = info_span!(
            "conversation",
            id = %conversation_id,
            agents = agent_ids.len(),
            max_turns
        );

        async move {
            let mut state = ConversationState::new(agent_ids.to_vec(), opening, max_turns);
            if agent_ids.is_empty() && max_turns > 0 {
                warn!("conversation started without agents");
            }
            info!("conversation started");

            let status = self.drive(&mut state).await;

            info!(turns = state.turn, state = ?state.state, "conversation finished");
            ConversationOutcome {
                conversation_id,
                messages: state.transcript.into_messages(),
                turns_taken: state.turn,
                status,
            }
        }
        .instrument(span)
        .await
    }

    async fn drive(&self, state: &mut ConversationState) -> ConversationStatus {
        let responder = self.responder();

        while !state.state.is_terminal() {
            let agent_id = state.current_agent_id();

            let Some(agent) = self.agent_store.find_agent(agent_id) else {
                warn!(agent_id, turn = state.turn, "agent not found, stopping");
                state
                    .transcript
                    .push(Message::system(format!("Agent {} not found.", agent_id)));
                state.state = ConductorState::AgentNotFound;
                return ConversationStatus::AgentNotFound { agent_id };
            };

            let turn_span = info_span!("turn", turn = state.turn, agent_id, agent = %agent.name);
            let result = responder
                .respond(&agent, state.transcript.messages())
                .instrument(turn_span)
                .await;

            match result {
                Ok(response) => {
                    debug!(
                        agent_id,
                        turn = state.turn,
                        tool = response.tool_invocation.as_ref().map(|t| t.name.as_str()),
                        "turn complete"
                    );
                    state.transcript.extend(
                        response
                            .appended_messages
                            .into_iter()
                            .map(|m| m.attributed_to(&agent.name)),
                    );
                    state
                        .transcript
                        .push(response.message.attributed_to(&agent.name));
                    state.advance();
                }
                Err(e) => {
                    error!(
                        agent_id,
                        turn = state.turn,
                        error = %e,
                        "turn failed, aborting conversation"
                    );
                    state.transcript.push(Message::system(format!(
                        "Conversation aborted: agent {} ({}) failed: {}",
                        agent_id, agent.name, e
                    )));
                    state.state = ConductorState::TurnFailed;
                    return ConversationStatus::TurnFailed {
                        agent_id,
                        error: e.to_string(),
                    };
                }
            }
        }

        ConversationStatus::Completed
    }

    /// Responder built from the current config, so reloads apply to the next run
    fn responder(&self) -> TurnResponder {
        let config = self.config.config();
        TurnResponder::new(
            Arc::clone(&self.llm),
            Arc::clone(self.agent_store.tool_registry()),
            config.conversation.call_timeout(),
        )
        .with_code_artifact_path(config.conversation.code_artifact_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Completion;
    use crate::tools::ToolRegistry;
    use crate::types::{MessageRole, ToolDefinition};
    use crate::utils::toml_config::RoundtableConfig;
    use async_trait::async_trait;
    use rstest::rstest;

    /// Replies with the model name, or fails for the model "broken".
    struct EchoModel;

    #[async_trait]
    impl LLMClient for EchoModel {
        async fn complete(
            &self,
            model: &str,
            _messages: &[Message],
            _tools: Option<&[ToolDefinition]>,
        ) -> Result<Completion> {
            if model == "broken" {
                return Err(AppError::ModelCall("provider unavailable".to_string()));
            }
            Ok(Completion::Text(model.to_string()))
        }

        fn provider_name(&self) -> &str {
            "echo"
        }
    }

    fn conductor_with(names: &[&str]) -> (Conductor, Vec<AgentId>) {
        let store = Arc::new(AgentStore::new(Arc::new(ToolRegistry::with_default_tools())));
        let ids = names
            .iter()
            .map(|n| store.create_agent(n, n, None).unwrap().id)
            .collect();
        let config = Arc::new(ConfigManager::from_config(RoundtableConfig::default()));
        (Conductor::new(store, Arc::new(EchoModel), config), ids)
    }

    #[tokio::test]
    async fn test_two_agents_two_turns() {
        let (conductor, ids) = conductor_with(&["A", "B"]);
        let outcome = conductor.run(&ids, "start", 2).await;

        assert_eq!(outcome.status, ConversationStatus::Completed);
        assert_eq!(outcome.turns_taken, 2);
        assert_eq!(
            outcome.messages,
            vec![
                Message::user("start"),
                Message::assistant("A").attributed_to("A"),
                Message::assistant("B").attributed_to("B"),
            ]
        );
    }

    #[tokio::test]
    async fn test_zero_turns_returns_opening_only() {
        let (conductor, ids) = conductor_with(&["A"]);
        let outcome = conductor.run(&ids, "start", 0).await;
        assert_eq!(outcome.messages, vec![Message::user("start")]);
        assert_eq!(outcome.turns_taken, 0);
    }

    #[tokio::test]
    async fn test_unknown_agent_stops_with_diagnostic() {
        let (conductor, _) = conductor_with(&[]);
        let outcome = conductor.run(&[999], "start", 6).await;

        assert_eq!(outcome.turns_taken, 0);
        assert_eq!(
            outcome.status,
            ConversationStatus::AgentNotFound { agent_id: 999 }
        );
        assert_eq!(outcome.messages.len(), 2);
        let last = outcome.messages.last().unwrap();
        assert_eq!(last.role(), MessageRole::System);
        assert!(last.content().contains("999"));
    }

    #[tokio::test]
    async fn test_unknown_agent_mid_rotation() {
        let (conductor, ids) = conductor_with(&["A"]);
        let outcome = conductor.run(&[ids[0], 404], "start", 5).await;
        assert_eq!(outcome.turns_taken, 1);
        assert_eq!(outcome.messages.len(), 3);
        assert!(matches!(
            outcome.status,
            ConversationStatus::AgentNotFound { agent_id: 404 }
        ));
    }

    #[tokio::test]
    async fn test_model_failure_aborts_with_diagnostic() {
        let (conductor, ids) = conductor_with(&["A", "broken"]);
        let outcome = conductor.run(&ids, "start", 4).await;

        assert_eq!(outcome.turns_taken, 1);
        assert!(matches!(
            outcome.status,
            ConversationStatus::TurnFailed { agent_id, .. } if agent_id == ids[1]
        ));
        let last = outcome.messages.last().unwrap();
        assert_eq!(last.role(), MessageRole::System);
        assert!(last
            .content()
            .starts_with(&format!("Conversation aborted: agent {} (broken) failed:", ids[1])));
    }

    #[tokio::test]
    async fn test_run_request_rejects_empty_agent_list() {
        let (conductor, _) = conductor_with(&[]);
        let result = conductor
            .run_request(ConversationRequest {
                agent_ids: vec![],
                user_input: "hi".to_string(),
                max_turns: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_run_request_rejects_budget_over_limit() {
        let (conductor, ids) = conductor_with(&["A"]);
        let result = conductor
            .run_request(ConversationRequest {
                agent_ids: ids.clone(),
                user_input: "hi".to_string(),
                max_turns: Some(101),
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(ref m)) if m.contains("101")));

        let outcome = conductor
            .run_request(ConversationRequest {
                agent_ids: ids,
                user_input: "hi".to_string(),
                max_turns: Some(100),
            })
            .await
            .unwrap();
        assert_eq!(outcome.turns_taken, 100);
    }

    #[tokio::test]
    async fn test_run_request_uses_default_budget() {
        let (conductor, ids) = conductor_with(&["A"]);
        let outcome = conductor
            .run_request(ConversationRequest {
                agent_ids: ids,
                user_input: "hi".to_string(),
                max_turns: None,
            })
            .await
            .unwrap();
        assert_eq!(outcome.turns_taken, 6);
    }

    #[rstest]
    #[case(3, 0)]
    #[case(3, 1)]
    #[case(3, 2)]
    #[case(3, 7)]
    #[case(2, 5)]
    #[case(1, 4)]
    #[case(4, 9)]
    #[tokio::test]
    async fn test_round_robin_fairness(#[case] k: usize, #[case] n: usize) {
        let names: Vec<String> = (0..k).map(|i| format!("agent{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (conductor, ids) = conductor_with(&refs);

        let outcome = conductor.run(&ids, "go", n).await;
        assert_eq!(outcome.turns_taken, n);
        assert_eq!(outcome.messages.len(), n + 1);

        for (i, name) in names.iter().enumerate() {
            let spoke = outcome
                .messages
                .iter()
                .filter(|m| m.name() == Some(name.as_str()))
                .count();
            assert_eq!(spoke, (n + k - 1 - i) / k, "agent {} of {}", i, k);
        }
    }

    #[test]
    fn test_state_index_wraps() {
        let mut state = ConversationState::new(vec![7, 8, 9], "x", 10);
        for _ in 0..4 {
            state.advance();
        }
        assert_eq!(state.index, 1);
        assert_eq!(state.current_agent_id(), 8);
        assert_eq!(state.state, ConductorState::AwaitingTurn);
    }
}
