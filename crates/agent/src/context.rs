//! The context store and session.
//!
//! The store is the ordered, append-only history of turns. It is owned by
//! the dispatcher — the single writer — so no locking is needed: ownership
//! enforces the discipline, and readers get a consistent snapshot taken at
//! call time.

use craftmind_core::identity::BotIdentity;
use craftmind_core::turn::Turn;

/// The ordered, append-only history of turns.
#[derive(Debug, Default)]
pub struct ContextStore {
    turns: Vec<Turn>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Add a turn, preserving order. Existing turns are never removed or
    /// mutated.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// The full ordered sequence, cloned for transmission to the reasoner.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    /// Borrow the history in order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// A session: the context store plus the identity of the controlled agent.
///
/// Created once at process start, lives for the process lifetime. The
/// identity's name filters out self-authored stimuli; its system prompt is
/// seeded as the first turn.
#[derive(Debug)]
pub struct Session {
    identity: BotIdentity,
    store: ContextStore,
}

impl Session {
    pub fn new(identity: BotIdentity) -> Self {
        let mut store = ContextStore::new();
        store.append(Turn::system(identity.system_prompt.clone()));
        Self { identity, store }
    }

    pub fn identity(&self) -> &BotIdentity {
        &self.identity
    }

    pub fn append(&mut self, turn: Turn) {
        self.store.append(turn);
    }

    pub fn snapshot(&self) -> Vec<Turn> {
        self.store.snapshot()
    }

    pub fn turns(&self) -> &[Turn] {
        self.store.turns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftmind_core::turn::Role;

    #[test]
    fn append_preserves_order() {
        let mut store = ContextStore::new();
        store.append(Turn::user("first"));
        store.append(Turn::user("second"));
        store.append(Turn::user("third"));

        let contents: Vec<&str> = store.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn snapshot_is_independent_of_later_appends() {
        let mut store = ContextStore::new();
        store.append(Turn::user("first"));
        let snapshot = store.snapshot();
        store.append(Turn::user("second"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn session_seeds_system_turn() {
        let session = Session::new(BotIdentity::new("steve"));
        assert_eq!(session.turns().len(), 1);
        assert_eq!(session.turns()[0].role, Role::System);
        assert!(session.turns()[0].content.contains("steve"));
    }
}
