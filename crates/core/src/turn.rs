//! Turn domain types — the conversation/context history.
//!
//! These are the core value objects that flow through the entire system:
//! a chat stimulus arrives from the world → the dispatcher appends it as a
//! turn → the reasoner reads the full history → its reply and action results
//! become further turns. Turns are immutable once appended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::action::ActionInvocation;

/// The role of a turn in the context history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Standing instructions (bot identity, rules of the world)
    System,
    /// A stimulus from the world (inbound chat)
    User,
    /// The reasoning endpoint's output (reply and/or requested actions)
    Agent,
    /// The outcome of a dispatched action, fed back for the next round
    ActionResult,
}

/// A single turn in the context history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Unique turn ID
    pub id: String,

    /// Who produced this turn
    pub role: Role,

    /// The text content (free text or a structured JSON payload)
    pub content: String,

    /// Action invocations requested by the agent (agent turns only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invocations: Vec<ActionInvocation>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content, Vec::new())
    }

    /// Create a stimulus turn (inbound chat or other world input).
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, Vec::new())
    }

    /// Create an agent turn carrying the reply and any requested invocations.
    pub fn agent(content: impl Into<String>, invocations: Vec<ActionInvocation>) -> Self {
        Self::new(Role::Agent, content, invocations)
    }

    /// Create an action-result turn.
    pub fn action_result(content: impl Into<String>) -> Self {
        Self::new(Role::ActionResult, content, Vec::new())
    }

    fn new(role: Role, content: impl Into<String>, invocations: Vec<ActionInvocation>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            invocations,
            timestamp: Utc::now(),
        }
    }
}
