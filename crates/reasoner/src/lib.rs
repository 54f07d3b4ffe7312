//! Reasoning endpoint clients for Craftmind.
//!
//! The dispatch loop talks to a [`craftmind_core::reasoner::Reasoner`];
//! this crate provides the Ollama implementation used by the binary.

pub mod ollama;

pub use ollama::OllamaReasoner;
