//! WorldAdapter trait — the abstraction over the game world.
//!
//! The adapter executes world-affecting primitives (movement, chat, entity
//! queries) and delivers inbound chat as a stimulus stream. Movement is the
//! one long-running primitive: issuing a goal returns a completion channel,
//! and the world holds at most one active goal per agent — a newer goal
//! supersedes the old one, whose channel still resolves (`Superseded`)
//! rather than leaking.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::error::WorldError;

/// An absolute coordinate in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// How a movement goal settled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The agent reached the target; carries the achieved coordinate.
    Arrived(Position),
    /// The world found no route to the target.
    NoPath,
    /// A newer goal replaced this one before it settled.
    Superseded,
}

/// An inbound chat stimulus.
///
/// Adapters should exclude chat authored by the controlled agent itself;
/// the dispatcher additionally filters by session identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEvent {
    pub username: String,
    pub message: String,
}

/// The core WorldAdapter trait.
///
/// Implementations handle transport to the actual game world (or simulate
/// one). The dispatch loop is the only component that issues movement
/// goals, so the single active goal slot is never contended out of band.
#[async_trait]
pub trait WorldAdapter: Send + Sync {
    /// Human-readable adapter name (e.g., "sim").
    fn name(&self) -> &str;

    /// Start delivering inbound chat events.
    ///
    /// Returns a receiver that yields stimuli in arrival order. The adapter
    /// handles its own transport internally.
    async fn start(&self) -> std::result::Result<mpsc::Receiver<ChatEvent>, WorldError>;

    /// Request movement to an absolute coordinate.
    ///
    /// The returned channel resolves once the goal settles: arrival, no
    /// route, or supersession by a newer goal.
    async fn move_to(
        &self,
        target: Position,
    ) -> std::result::Result<oneshot::Receiver<MoveOutcome>, WorldError>;

    /// Send a chat message. Fire-and-forget.
    async fn send_chat(&self, message: &str) -> std::result::Result<(), WorldError>;

    /// Look up another entity's position by username.
    ///
    /// `None` means the entity is not present — a valid negative result,
    /// not an error.
    async fn locate(&self, username: &str)
    -> std::result::Result<Option<Position>, WorldError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_display() {
        let pos = Position::new(10.0, 64.0, -3.0);
        assert_eq!(pos.to_string(), "(10, 64, -3)");
    }

    #[test]
    fn move_outcome_serialization() {
        let json = serde_json::to_string(&MoveOutcome::NoPath).unwrap();
        assert_eq!(json, r#""no_path""#);

        let arrived = MoveOutcome::Arrived(Position::new(1.0, 2.0, 3.0));
        let json = serde_json::to_string(&arrived).unwrap();
        assert!(json.contains("arrived"));
    }

    #[test]
    fn chat_event_roundtrip() {
        let event = ChatEvent {
            username: "alice".into(),
            message: "come here".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: ChatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
