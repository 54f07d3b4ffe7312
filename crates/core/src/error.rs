//! Error types for the Craftmind domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Craftmind operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Reasoner errors ---
    #[error("Reasoner error: {0}")]
    Reasoner(#[from] ReasonerError),

    // --- World errors ---
    #[error("World error: {0}")]
    World(#[from] WorldError),

    // --- Action errors ---
    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the reasoning endpoint. These abort only the current
/// dispatch cycle; the loop returns to idle and waits for the next stimulus.
#[derive(Debug, Clone, Error)]
pub enum ReasonerError {
    #[error("Inference request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("Inference request timed out: {0}")]
    Timeout(String),

    #[error("Reasoner not configured: {0}")]
    NotConfigured(String),
}

/// Failures raised by the world adapter's control surface.
///
/// An unroutable movement target is *not* here: the adapter reports it
/// asynchronously as `MoveOutcome::NoPath`, and an absent player is a valid
/// negative query result (`locate` returns `None`), not an error.
#[derive(Debug, Clone, Error)]
pub enum WorldError {
    #[error("World not connected: {0}")]
    NotConnected(String),

    #[error("Chat delivery failed: {0}")]
    ChatDeliveryFailed(String),

    #[error("Event stream unavailable: {0}")]
    EventStream(String),
}

/// Failures of action resolution and execution. All of these are
/// recoverable: the dispatcher converts them into failure result turns so
/// the reasoner can self-correct on the next round.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid action arguments: {0}")]
    InvalidArguments(String),

    #[error("Action execution failed: {action} — {reason}")]
    ExecutionFailed { action: String, reason: String },
}
