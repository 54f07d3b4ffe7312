//! # Craftmind Core
//!
//! Domain types, traits, and error definitions for the Craftmind game-agent
//! runtime. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here. Implementations
//! live in their respective crates. This enables:
//! - Swapping the reasoning endpoint or the world backend via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod action;
pub mod error;
pub mod event;
pub mod identity;
pub mod reasoner;
pub mod turn;
pub mod world;

// Re-export key types at crate root for ergonomics
pub use action::{
    Action, ActionDefinition, ActionInvocation, ActionOutcome, ActionRegistry, ActionReport,
};
pub use error::{ActionError, Error, ReasonerError, Result, WorldError};
pub use event::{DomainEvent, EventBus};
pub use identity::BotIdentity;
pub use reasoner::{Inference, Reasoner};
pub use turn::{Role, Turn};
pub use world::{ChatEvent, MoveOutcome, Position, WorldAdapter};
