//! Reasoner trait — the abstraction over the reasoning endpoint.
//!
//! A Reasoner maps the full context history plus the declared action schema
//! to a reply and zero or more action invocations. The endpoint itself is
//! stateless: all session state lives in the context store, and the entire
//! history is resent on every round.
//!
//! Implementations: Ollama (native chat API), mocks for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::action::{ActionDefinition, ActionInvocation};
use crate::error::ReasonerError;
use crate::turn::Turn;

/// One round of reasoning output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inference {
    /// Free-text reply, if the model produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,

    /// Requested action invocations, in the order the model returned them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invocations: Vec<ActionInvocation>,
}

impl Inference {
    /// Whether this round asked for anything at all.
    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty() && self.reply.as_deref().is_none_or(|r| r.trim().is_empty())
    }
}

/// The core Reasoner trait.
///
/// The dispatch loop calls `infer()` with a snapshot of the history and the
/// registry-derived schema, without knowing which backend is in use.
/// Transport failures are reported to the caller, never swallowed.
#[async_trait]
pub trait Reasoner: Send + Sync {
    /// A human-readable name for this reasoner (e.g., "ollama").
    fn name(&self) -> &str;

    /// Run one inference round over the full history and action schema.
    async fn infer(
        &self,
        history: &[Turn],
        actions: &[ActionDefinition],
    ) -> std::result::Result<Inference, ReasonerError>;
}
