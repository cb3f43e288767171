//! API request handlers.

/// Agent creation, lookup and tool assignment.
pub mod agents;
/// Conversation runs.
pub mod conversations;
/// Liveness probe.
pub mod health;
/// Tool schema listing.
pub mod tools;
