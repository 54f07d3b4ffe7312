//! Built-in action implementations for Craftmind.
//!
//! Actions give the agent the ability to act in the game world: stand
//! idle, send chat, walk to a coordinate, and look up another player's
//! position. Each one is a thin adapter from validated JSON arguments to a
//! [`craftmind_core::world::WorldAdapter`] primitive.

pub mod chat;
pub mod idle;
pub mod locate_player;
pub mod move_to;

use std::sync::Arc;

use craftmind_core::action::ActionRegistry;
use craftmind_core::world::WorldAdapter;

pub use chat::ChatAction;
pub use idle::IdleAction;
pub use locate_player::LocatePlayerAction;
pub use move_to::MoveAction;

/// Create a registry with all built-in actions bound to `world`.
pub fn builtin_registry(world: Arc<dyn WorldAdapter>) -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry.register(Box::new(IdleAction));
    registry.register(Box::new(ChatAction::new(Arc::clone(&world))));
    registry.register(Box::new(MoveAction::new(Arc::clone(&world))));
    registry.register(Box::new(LocatePlayerAction::new(world)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftmind_world::SimWorld;

    #[tokio::test]
    async fn builtin_registry_declares_the_four_actions() {
        let world = Arc::new(SimWorld::new("steve"));
        let registry = builtin_registry(world);

        let mut names = registry.names();
        names.sort_unstable();
        assert_eq!(names, vec!["chat", "get_player_location", "idle", "move"]);

        // Every declared definition resolves back to a handler.
        for definition in registry.definitions() {
            assert!(registry.resolve(&definition.name).is_some());
        }
    }
}
