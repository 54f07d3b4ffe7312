//! The dispatch loop state machine.
//!
//! One dispatcher instance owns one session and processes one stimulus-to-
//! completion cycle at a time. Invocations returned by a reasoning round
//! are dispatched sequentially, in the order returned, and each one's
//! result turn is appended before the next is dispatched — so the context
//! store's order always matches causal order, even for long-running
//! actions. Stimuli arriving mid-cycle queue in the channel and are
//! processed strictly afterwards.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use craftmind_core::action::{ActionInvocation, ActionOutcome, ActionRegistry, ActionReport};
use craftmind_core::error::{ActionError, Error};
use craftmind_core::event::{DomainEvent, EventBus};
use craftmind_core::reasoner::Reasoner;
use craftmind_core::turn::Turn;
use craftmind_core::world::ChatEvent;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::context::Session;

/// Where the loop currently is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Waiting for an external stimulus.
    Idle,
    /// A reasoning round is in flight.
    AwaitingInference,
    /// Routing this round's invocations to their handlers.
    Dispatching,
    /// An asynchronous action is pending; its outcome re-enters the cycle.
    AwaitingAsyncResult,
}

/// The control core: owns the session, invokes the reasoner, and routes
/// invocations to their handlers.
pub struct Dispatcher {
    /// The reasoning endpoint
    reasoner: Arc<dyn Reasoner>,

    /// Registered actions; also the source of the declared schema
    registry: Arc<ActionRegistry>,

    /// The context store plus agent identity (single writer: this struct)
    session: Session,

    /// Event bus for domain events
    event_bus: Arc<EventBus>,

    /// Maximum chained reasoning rounds per external stimulus
    max_rounds: u32,

    state: DispatchState,
}

impl Dispatcher {
    /// Create a new dispatcher.
    pub fn new(
        reasoner: Arc<dyn Reasoner>,
        registry: Arc<ActionRegistry>,
        session: Session,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            reasoner,
            registry,
            session,
            event_bus,
            max_rounds: 8,
            state: DispatchState::Idle,
        }
    }

    /// Set the maximum number of chained reasoning rounds per stimulus.
    pub fn with_max_rounds(mut self, max: u32) -> Self {
        self.max_rounds = max;
        self
    }

    /// The loop's current position in its cycle.
    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// The session's turn history, in append order.
    pub fn transcript(&self) -> &[Turn] {
        self.session.turns()
    }

    /// Drive the loop over a stimulus stream until it closes.
    ///
    /// Stimuli that arrive while a cycle is in flight wait in the channel;
    /// they are processed strictly in arrival order, one cycle at a time.
    pub async fn run(&mut self, mut stimuli: mpsc::Receiver<ChatEvent>) -> Result<(), Error> {
        info!(
            bot = %self.session.identity().name,
            reasoner = self.reasoner.name(),
            "Dispatch loop started"
        );
        while let Some(event) = stimuli.recv().await {
            self.handle_chat(event).await;
        }
        info!("Stimulus stream closed, dispatch loop stopping");
        Ok(())
    }

    /// Process one inbound chat stimulus to completion.
    ///
    /// Reasoner transport failures abort only this cycle; the loop returns
    /// to idle and stays usable.
    pub async fn handle_chat(&mut self, event: ChatEvent) {
        if self.session.identity().is_self(&event.username) {
            debug!(username = %event.username, "Ignoring self-authored chat");
            return;
        }

        info!(username = %event.username, message = %event.message, "Chat stimulus");
        self.event_bus.publish(DomainEvent::ChatReceived {
            username: event.username.clone(),
            content_preview: event.message.chars().take(80).collect(),
            timestamp: Utc::now(),
        });

        let content = serde_json::json!({
            "chat": {
                "username": event.username,
                "message": event.message,
            }
        })
        .to_string();
        self.session.append(Turn::user(content));

        self.run_cycle().await;
    }

    /// Run chained reasoning rounds until one requests nothing further.
    async fn run_cycle(&mut self) {
        let definitions = self.registry.definitions();
        let mut round = 0;

        loop {
            round += 1;
            if round > self.max_rounds {
                warn!(
                    rounds = round - 1,
                    "Max chained rounds reached, returning to idle"
                );
                break;
            }

            debug!(round, turns = self.session.turns().len(), "Reasoning round");
            self.state = DispatchState::AwaitingInference;

            let history = self.session.snapshot();
            let inference = match self.reasoner.infer(&history, &definitions).await {
                Ok(inference) => inference,
                Err(e) => {
                    // Abort only this cycle; the next stimulus starts fresh.
                    warn!(error = %e, "Inference failed, aborting cycle");
                    self.event_bus.publish(DomainEvent::ErrorOccurred {
                        context: "inference".into(),
                        error_message: e.to_string(),
                        timestamp: Utc::now(),
                    });
                    break;
                }
            };

            self.event_bus.publish(DomainEvent::InferenceCompleted {
                replied: inference.reply.is_some(),
                invocation_count: inference.invocations.len(),
                timestamp: Utc::now(),
            });

            let invocations = inference.invocations;
            self.session.append(Turn::agent(
                inference.reply.unwrap_or_default(),
                invocations.clone(),
            ));

            if invocations.is_empty() {
                break;
            }

            self.state = DispatchState::Dispatching;
            let mut observed = false;

            // Sequential, order-preserving dispatch: each invocation's
            // result turn lands before the next invocation starts.
            for invocation in &invocations {
                let report = self.dispatch_invocation(invocation).await;
                let content = serde_json::json!({
                    "action": invocation.name,
                    "success": report.success,
                    "data": report.payload,
                })
                .to_string();
                self.session.append(Turn::action_result(content));
                observed |= report.observe;
            }

            if !observed {
                break;
            }
            // Observed outcomes feed the next round.
        }

        self.state = DispatchState::Idle;
    }

    /// Resolve and execute one invocation, converting every failure into a
    /// report the reasoner can see. Never fatal to the loop.
    async fn dispatch_invocation(&mut self, invocation: &ActionInvocation) -> ActionReport {
        debug!(action = %invocation.name, "Dispatching invocation");
        self.event_bus.publish(DomainEvent::ActionDispatched {
            action: invocation.name.clone(),
            timestamp: Utc::now(),
        });

        let start = Instant::now();
        let report = match self.registry.dispatch(invocation).await {
            Ok(ActionOutcome::Complete(report)) => report,
            Ok(ActionOutcome::Pending(future)) => {
                self.state = DispatchState::AwaitingAsyncResult;
                let report = future.await;
                self.state = DispatchState::Dispatching;
                report
            }
            Err(e) => {
                warn!(action = %invocation.name, error = %e, "Action failed");
                let kind = match &e {
                    ActionError::UnknownAction(_) => "unknown_action",
                    ActionError::InvalidArguments(_) => "invalid_arguments",
                    ActionError::ExecutionFailed { .. } => "execution_failed",
                };
                ActionReport::failure(serde_json::json!({
                    "error": kind,
                    "message": e.to_string(),
                }))
            }
        };

        self.event_bus.publish(DomainEvent::ActionResolved {
            action: invocation.name.clone(),
            success: report.success,
            duration_ms: start.elapsed().as_millis() as u64,
            timestamp: Utc::now(),
        });
        report
    }
}
