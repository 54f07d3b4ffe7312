//! Bot identity — the controlled agent's name and system prompt.
//!
//! The name doubles as the self-filter key: chat stimuli authored by the
//! agent itself are dropped so it does not react to its own output.

use serde::{Deserialize, Serialize};

/// The controlled agent's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotIdentity {
    /// The agent's in-world username
    pub name: String,

    /// Standing instructions seeded as the first turn of every session
    pub system_prompt: String,
}

impl BotIdentity {
    /// Create an identity with the default system prompt for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let system_prompt = Self::default_system_prompt(&name);
        Self {
            name,
            system_prompt,
        }
    }

    /// Replace the system prompt (e.g., from configuration).
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Whether a chat author is the agent itself.
    pub fn is_self(&self, username: &str) -> bool {
        self.name == username
    }

    /// The default standing instructions for a game companion agent.
    fn default_system_prompt(name: &str) -> String {
        format!(
            concat!(
                "You are a player in a blocky game world, a bot. Your username is \"{}\"; ",
                "you can use it with commands. You will receive information about what is ",
                "happening in the game and the results of your actions. You have actions at ",
                "your disposal and can execute several of them, like chatting, moving, or ",
                "finding a player's location, and you can chain them. The game is constantly ",
                "changing, so refetch the data you rely on before acting on it. When a player ",
                "asks you to come here, it means to come to their coordinates.",
            ),
            name
        )
    }
}
