//! The core dispatch loop — the heart of Craftmind.
//!
//! The agent follows a **stimulus → reason → act → observe** cycle:
//!
//! 1. **Receive** a stimulus (inbound chat from the world)
//! 2. **Append** it to the session's context store
//! 3. **Infer** via the reasoner, with the full history and action schema
//! 4. **Dispatch** each requested invocation sequentially, appending every
//!    outcome as a result turn before the next invocation runs
//! 5. **If any outcome was observed**: loop back to step 3
//!
//! The cycle ends when a reasoning round requests nothing further, and the
//! loop returns to idle awaiting the next stimulus.

pub mod context;
pub mod dispatcher;

pub use context::{ContextStore, Session};
pub use dispatcher::{DispatchState, Dispatcher};
