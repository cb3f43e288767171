//! HTTP API Handlers and Routes
//!
//! A thin axum layer over the agent store and the conductor.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Agents (`/agents`)
//! - `GET /agents` - List agents in creation order
//! - `POST /agents` - Create an agent (`{name, model, system_prompt?}`)
//! - `GET /agents/{id}` - Get one agent
//! - `POST /agents/{id}/tools` - Assign a tool (`{tool}`)
//!
//! ## Tools (`/tools`)
//! - `GET /tools` - Schemas of every registered tool
//!
//! ## Conversations (`/conversations`)
//! - `POST /conversations` - Run a round-robin conversation
//!   (`{agent_ids, user_input, max_turns?}`)
//!
//! ## Health (`/health`)
//! - `GET /health` - Health check endpoint
//!
//! Errors are returned as `{"error": "<message>"}` with the status code
//! chosen by [`AppError`](crate::types::AppError).

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
