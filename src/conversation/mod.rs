//! Multi-agent conversations
//!
//! The [`Conductor`] drives round-robin turn-taking over a fixed, ordered
//! list of agents, bounded by a turn budget, and records every turn in an
//! append-only [`Transcript`].

/// Round-robin conversation loop.
pub mod conductor;
/// Append-only message log.
pub mod transcript;

pub use conductor::{
    Conductor, ConductorState, ConversationOutcome, ConversationState, ConversationStatus,
};
pub use transcript::Transcript;
