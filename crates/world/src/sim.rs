//! The in-memory world simulation.

use async_trait::async_trait;
use craftmind_core::error::WorldError;
use craftmind_core::world::{ChatEvent, MoveOutcome, Position, WorldAdapter};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc, oneshot};
use tracing::{debug, info};

/// An in-memory world: positions, reachability, chat.
///
/// Motion honors the single-outstanding-goal contract: issuing a new goal
/// resolves the previous pending channel with `Superseded` before the new
/// goal takes the slot, so no future is ever left dangling.
pub struct SimWorld {
    bot_name: String,
    inner: Arc<Mutex<SimState>>,
    events_tx: mpsc::Sender<ChatEvent>,
    events_rx: Mutex<Option<mpsc::Receiver<ChatEvent>>>,
}

struct SimState {
    bot_position: Position,
    players: HashMap<String, Position>,
    unreachable: Vec<Position>,
    travel_delay: Duration,
    outbox: Vec<String>,
    move_seq: u64,
    active_move: Option<(u64, oneshot::Sender<MoveOutcome>)>,
}

impl SimWorld {
    /// Create a world with the bot standing at the origin.
    pub fn new(bot_name: impl Into<String>) -> Self {
        let (events_tx, events_rx) = mpsc::channel(32);
        Self {
            bot_name: bot_name.into(),
            inner: Arc::new(Mutex::new(SimState {
                bot_position: Position::new(0.0, 64.0, 0.0),
                players: HashMap::new(),
                unreachable: Vec::new(),
                travel_delay: Duration::ZERO,
                outbox: Vec::new(),
                move_seq: 0,
                active_move: None,
            })),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    /// Set how long a movement goal takes to settle.
    pub async fn set_travel_delay(&self, delay: Duration) {
        self.inner.lock().await.travel_delay = delay;
    }

    /// Put a player at a position (inserting or moving them).
    pub async fn place_player(&self, username: impl Into<String>, position: Position) {
        self.inner.lock().await.players.insert(username.into(), position);
    }

    /// Remove a player from the world.
    pub async fn remove_player(&self, username: &str) {
        self.inner.lock().await.players.remove(username);
    }

    /// Mark a target coordinate as having no route to it.
    pub async fn block_target(&self, target: Position) {
        self.inner.lock().await.unreachable.push(target);
    }

    /// Inject an inbound chat event, as if heard in the world.
    pub async fn push_chat(
        &self,
        username: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<(), WorldError> {
        let event = ChatEvent {
            username: username.into(),
            message: message.into(),
        };
        self.events_tx
            .send(event)
            .await
            .map_err(|e| WorldError::EventStream(format!("chat stream closed: {e}")))
    }

    /// Everything the bot has said, in order.
    pub async fn outbox(&self) -> Vec<String> {
        self.inner.lock().await.outbox.clone()
    }

    /// The bot's current position.
    pub async fn bot_position(&self) -> Position {
        self.inner.lock().await.bot_position
    }

    /// Whether a movement goal is currently pending.
    pub async fn has_active_move(&self) -> bool {
        self.inner.lock().await.active_move.is_some()
    }
}

#[async_trait]
impl WorldAdapter for SimWorld {
    fn name(&self) -> &str {
        "sim"
    }

    async fn start(&self) -> Result<mpsc::Receiver<ChatEvent>, WorldError> {
        self.events_rx
            .lock()
            .await
            .take()
            .ok_or_else(|| WorldError::EventStream("event stream already taken".into()))
    }

    async fn move_to(
        &self,
        target: Position,
    ) -> Result<oneshot::Receiver<MoveOutcome>, WorldError> {
        let (tx, rx) = oneshot::channel();
        let mut state = self.inner.lock().await;

        // Single goal slot: a newer goal settles the old channel first.
        if let Some((_, previous)) = state.active_move.take() {
            debug!("Superseding pending movement goal");
            let _ = previous.send(MoveOutcome::Superseded);
        }

        if state.unreachable.contains(&target) {
            debug!(%target, "No route to target");
            let _ = tx.send(MoveOutcome::NoPath);
            return Ok(rx);
        }

        state.move_seq += 1;
        let seq = state.move_seq;
        state.active_move = Some((seq, tx));
        let delay = state.travel_delay;
        drop(state);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let mut state = inner.lock().await;
            // Only settle if this goal is still the active one.
            let sender = match state.active_move.take() {
                Some((s, sender)) if s == seq => Some(sender),
                other => {
                    state.active_move = other;
                    None
                }
            };
            if let Some(sender) = sender {
                state.bot_position = target;
                debug!(%target, "Arrived at target");
                let _ = sender.send(MoveOutcome::Arrived(target));
            }
        });

        Ok(rx)
    }

    async fn send_chat(&self, message: &str) -> Result<(), WorldError> {
        let mut state = self.inner.lock().await;
        state.outbox.push(message.to_string());
        info!(bot = %self.bot_name, message, "Outbound chat");
        Ok(())
    }

    async fn locate(&self, username: &str) -> Result<Option<Position>, WorldError> {
        let state = self.inner.lock().await;
        if username == self.bot_name {
            return Ok(Some(state.bot_position));
        }
        Ok(state.players.get(username).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn move_arrives_at_target() {
        let world = SimWorld::new("steve");
        let target = Position::new(10.0, 64.0, -3.0);

        let rx = world.move_to(target).await.unwrap();
        assert_eq!(rx.await.unwrap(), MoveOutcome::Arrived(target));
        assert_eq!(world.bot_position().await, target);
        assert!(!world.has_active_move().await);
    }

    #[tokio::test]
    async fn unreachable_target_reports_no_path() {
        let world = SimWorld::new("steve");
        let target = Position::new(999.0, 0.0, 999.0);
        world.block_target(target).await;

        let rx = world.move_to(target).await.unwrap();
        assert_eq!(rx.await.unwrap(), MoveOutcome::NoPath);
        // Bot did not move
        assert_eq!(world.bot_position().await, Position::new(0.0, 64.0, 0.0));
    }

    #[tokio::test]
    async fn newer_goal_supersedes_pending_one() {
        let world = SimWorld::new("steve");
        world.set_travel_delay(Duration::from_millis(50)).await;

        let first = world.move_to(Position::new(100.0, 64.0, 0.0)).await.unwrap();
        let second_target = Position::new(-5.0, 64.0, 7.0);
        let second = world.move_to(second_target).await.unwrap();

        // The first future settles instead of leaking.
        assert_eq!(first.await.unwrap(), MoveOutcome::Superseded);
        assert_eq!(second.await.unwrap(), MoveOutcome::Arrived(second_target));
        assert_eq!(world.bot_position().await, second_target);
    }

    #[tokio::test]
    async fn locate_present_and_absent_players() {
        let world = SimWorld::new("steve");
        let alice_pos = Position::new(10.0, 64.0, -3.0);
        world.place_player("alice", alice_pos).await;

        assert_eq!(world.locate("alice").await.unwrap(), Some(alice_pos));
        assert_eq!(world.locate("ghost").await.unwrap(), None);

        world.remove_player("alice").await;
        assert_eq!(world.locate("alice").await.unwrap(), None);
    }

    #[tokio::test]
    async fn locate_self_returns_bot_position() {
        let world = SimWorld::new("steve");
        assert_eq!(
            world.locate("steve").await.unwrap(),
            Some(Position::new(0.0, 64.0, 0.0))
        );
    }

    #[tokio::test]
    async fn chat_lands_in_outbox() {
        let world = SimWorld::new("steve");
        world.send_chat("hello world").await.unwrap();
        world.send_chat("on my way").await.unwrap();
        assert_eq!(world.outbox().await, vec!["hello world", "on my way"]);
    }

    #[tokio::test]
    async fn pushed_chat_arrives_on_event_stream() {
        let world = SimWorld::new("steve");
        let mut events = world.start().await.unwrap();

        world.push_chat("alice", "come here").await.unwrap();
        let event = events.recv().await.unwrap();
        assert_eq!(event.username, "alice");
        assert_eq!(event.message, "come here");
    }

    #[tokio::test]
    async fn event_stream_can_only_be_taken_once() {
        let world = SimWorld::new("steve");
        let _events = world.start().await.unwrap();
        assert!(world.start().await.is_err());
    }
}
