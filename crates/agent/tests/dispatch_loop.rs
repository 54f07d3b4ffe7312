//! End-to-end dispatch loop tests.
//!
//! A scripted reasoner drives the real built-in actions against the
//! simulated world, exercising the full stimulus → reason → act → observe
//! cycle without any network access.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use craftmind_actions::builtin_registry;
use craftmind_agent::{DispatchState, Dispatcher, Session};
use craftmind_core::action::{ActionDefinition, ActionInvocation};
use craftmind_core::error::ReasonerError;
use craftmind_core::event::EventBus;
use craftmind_core::identity::BotIdentity;
use craftmind_core::reasoner::{Inference, Reasoner};
use craftmind_core::turn::{Role, Turn};
use craftmind_core::world::{ChatEvent, Position};
use craftmind_world::SimWorld;
use tokio::sync::mpsc;

/// Replays a script, one inference per round; empty rounds once it runs dry.
struct ScriptedReasoner {
    script: Mutex<VecDeque<Inference>>,
    calls: AtomicUsize,
}

impl ScriptedReasoner {
    fn new(script: Vec<Inference>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Reasoner for ScriptedReasoner {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn infer(
        &self,
        _history: &[Turn],
        _actions: &[ActionDefinition],
    ) -> Result<Inference, ReasonerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.script.lock().unwrap().pop_front().unwrap_or_default())
    }
}

fn invoking(invocations: Vec<ActionInvocation>) -> Inference {
    Inference {
        reply: None,
        invocations,
    }
}

fn replying(text: &str) -> Inference {
    Inference {
        reply: Some(text.into()),
        invocations: vec![],
    }
}

fn invoke(name: &str, arguments: serde_json::Value) -> ActionInvocation {
    ActionInvocation {
        name: name.into(),
        arguments,
    }
}

fn sandbox(reasoner: Arc<ScriptedReasoner>) -> (Arc<SimWorld>, Dispatcher) {
    let world = Arc::new(SimWorld::new("steve"));
    let registry = Arc::new(builtin_registry(world.clone()));
    let dispatcher = Dispatcher::new(
        reasoner,
        registry,
        Session::new(BotIdentity::new("steve")),
        Arc::new(EventBus::default()),
    );
    (world, dispatcher)
}

fn chat(username: &str, message: &str) -> ChatEvent {
    ChatEvent {
        username: username.into(),
        message: message.into(),
    }
}

fn roles(dispatcher: &Dispatcher) -> Vec<Role> {
    dispatcher.transcript().iter().map(|t| t.role).collect()
}

/// The canonical scenario: "come here" chains a location query into a
/// movement goal across two reasoning rounds, with every outcome landing
/// in the context in causal order.
#[tokio::test]
async fn come_here_chains_locate_then_move() {
    let reasoner = ScriptedReasoner::new(vec![
        invoking(vec![invoke(
            "get_player_location",
            serde_json::json!({"username": "alice"}),
        )]),
        invoking(vec![invoke(
            "move",
            serde_json::json!({"x": 10.0, "y": 64.0, "z": -3.0}),
        )]),
        replying("Made it!"),
    ]);
    let (world, mut dispatcher) = sandbox(reasoner.clone());
    world.place_player("alice", Position::new(10.0, 64.0, -3.0)).await;

    dispatcher.handle_chat(chat("alice", "come here")).await;

    assert_eq!(
        roles(&dispatcher),
        vec![
            Role::System,
            Role::User,
            Role::Agent,        // round 1: requests the lookup
            Role::ActionResult, // alice's position
            Role::Agent,        // round 2: requests the move
            Role::ActionResult, // arrival
            Role::Agent,        // round 3: nothing further
        ]
    );

    let transcript = dispatcher.transcript();
    assert!(transcript[3].content.contains("player_location"));
    assert!(transcript[5].content.contains("moved_to"));
    assert!(transcript[5].content.contains("10"));
    assert_eq!(transcript[6].content, "Made it!");

    assert_eq!(world.bot_position().await, Position::new(10.0, 64.0, -3.0));
    assert_eq!(reasoner.calls(), 3);
    assert_eq!(dispatcher.state(), DispatchState::Idle);
}

/// N invocations from one round produce exactly N result turns, appended
/// strictly in invocation order.
#[tokio::test]
async fn multiple_invocations_dispatch_in_returned_order() {
    let reasoner = ScriptedReasoner::new(vec![invoking(vec![
        invoke("chat", serde_json::json!({"message": "one"})),
        invoke("chat", serde_json::json!({"message": "two"})),
        invoke("chat", serde_json::json!({"message": "three"})),
    ])]);
    let (world, mut dispatcher) = sandbox(reasoner.clone());

    dispatcher.handle_chat(chat("alice", "count to three")).await;

    assert_eq!(world.outbox().await, vec!["one", "two", "three"]);
    assert_eq!(
        roles(&dispatcher),
        vec![
            Role::System,
            Role::User,
            Role::Agent,
            Role::ActionResult,
            Role::ActionResult,
            Role::ActionResult,
        ]
    );
    // Fire-and-effect actions never re-trigger inference by themselves.
    assert_eq!(reasoner.calls(), 1);
}

#[tokio::test]
async fn idle_and_chat_resolve_within_the_cycle() {
    let reasoner = ScriptedReasoner::new(vec![invoking(vec![
        invoke("idle", serde_json::json!({})),
        invoke("chat", serde_json::json!({"message": "just chilling"})),
    ])]);
    let (world, mut dispatcher) = sandbox(reasoner.clone());

    dispatcher.handle_chat(chat("alice", "what are you doing?")).await;

    assert_eq!(world.outbox().await, vec!["just chilling"]);
    assert_eq!(reasoner.calls(), 1);
    assert_eq!(dispatcher.state(), DispatchState::Idle);
}

/// An unroutable move produces a failure turn carrying the no-path payload
/// and the loop keeps going instead of hanging.
#[tokio::test]
async fn unreachable_move_reports_no_path() {
    let blocked = Position::new(999.0, 64.0, 999.0);
    let reasoner = ScriptedReasoner::new(vec![
        invoking(vec![invoke(
            "move",
            serde_json::json!({"x": 999.0, "y": 64.0, "z": 999.0}),
        )]),
        replying("I can't get there."),
    ]);
    let (world, mut dispatcher) = sandbox(reasoner);
    world.block_target(blocked).await;

    dispatcher.handle_chat(chat("alice", "go far away")).await;

    let failure = dispatcher
        .transcript()
        .iter()
        .find(|t| t.role == Role::ActionResult)
        .expect("no-path must surface as a result turn");
    assert!(failure.content.contains("no_path_found"));
    assert!(failure.content.contains("\"success\":false"));

    // The failure was observed, so the reasoner got to react.
    let last = dispatcher.transcript().last().unwrap();
    assert_eq!(last.content, "I can't get there.");
    assert_eq!(dispatcher.state(), DispatchState::Idle);
}

/// An absent player is a valid negative result: a *success* turn tagged
/// `found: false`, distinct from an unknown-action failure.
#[tokio::test]
async fn ghost_lookup_is_not_found_not_an_error() {
    let reasoner = ScriptedReasoner::new(vec![
        invoking(vec![invoke(
            "get_player_location",
            serde_json::json!({"username": "ghost"}),
        )]),
        replying("I can't find ghost."),
    ]);
    let (_world, mut dispatcher) = sandbox(reasoner);

    dispatcher.handle_chat(chat("alice", "where is ghost?")).await;

    let result = dispatcher
        .transcript()
        .iter()
        .find(|t| t.role == Role::ActionResult)
        .unwrap();
    assert!(result.content.contains("\"found\":false"));
    assert!(result.content.contains("\"success\":true"));
    assert!(!result.content.contains("unknown_action"));
}

#[tokio::test]
async fn unknown_action_is_reported_distinctly() {
    let reasoner = ScriptedReasoner::new(vec![invoking(vec![invoke(
        "teleport",
        serde_json::json!({}),
    )])]);
    let (_world, mut dispatcher) = sandbox(reasoner);

    dispatcher.handle_chat(chat("alice", "teleport home")).await;

    let result = dispatcher
        .transcript()
        .iter()
        .find(|t| t.role == Role::ActionResult)
        .unwrap();
    assert!(result.content.contains("unknown_action"));
    assert!(result.content.contains("\"success\":false"));
}

/// Arguments that fail schema validation surface as a failure turn, not a
/// crash: the reasoner sees what it got wrong.
#[tokio::test]
async fn invalid_arguments_become_failure_turn() {
    let reasoner = ScriptedReasoner::new(vec![invoking(vec![invoke(
        "chat",
        serde_json::json!({"message": 42}),
    )])]);
    let (world, mut dispatcher) = sandbox(reasoner);

    dispatcher.handle_chat(chat("alice", "say something")).await;

    let result = dispatcher
        .transcript()
        .iter()
        .find(|t| t.role == Role::ActionResult)
        .unwrap();
    assert!(result.content.contains("invalid_arguments"));
    assert!(world.outbox().await.is_empty());
}

/// Stimuli that arrive while a long-running cycle is in flight queue up and
/// are processed strictly afterwards, in arrival order.
#[tokio::test]
async fn queued_stimuli_process_after_inflight_cycle() {
    let reasoner = ScriptedReasoner::new(vec![
        // First stimulus: a slow move, observed, then nothing further.
        invoking(vec![invoke(
            "move",
            serde_json::json!({"x": 5.0, "y": 64.0, "z": 5.0}),
        )]),
        Inference::default(),
        // Second stimulus: a plain reply.
        replying("hi bob"),
    ]);
    let (world, mut dispatcher) = sandbox(reasoner);
    world.set_travel_delay(Duration::from_millis(20)).await;

    let (tx, rx) = mpsc::channel(8);
    tx.send(chat("alice", "go to the well")).await.unwrap();
    tx.send(chat("bob", "hello?")).await.unwrap();
    drop(tx);

    dispatcher.run(rx).await.unwrap();

    // Bob's turn lands only after the move's result turn: causal order.
    assert_eq!(
        roles(&dispatcher),
        vec![
            Role::System,
            Role::User,         // alice
            Role::Agent,        // move requested
            Role::ActionResult, // arrival
            Role::Agent,        // nothing further
            Role::User,         // bob, queued during the move
            Role::Agent,        // reply
        ]
    );
    assert_eq!(world.bot_position().await, Position::new(5.0, 64.0, 5.0));
    assert_eq!(dispatcher.transcript().last().unwrap().content, "hi bob");
}

/// Chat authored by the controlled agent itself never enters the context.
#[tokio::test]
async fn own_chat_is_filtered_out() {
    let reasoner = ScriptedReasoner::new(vec![replying("only for alice")]);
    let (_world, mut dispatcher) = sandbox(reasoner.clone());

    dispatcher.handle_chat(chat("steve", "echo of my own voice")).await;
    assert_eq!(reasoner.calls(), 0);

    dispatcher.handle_chat(chat("alice", "hi steve")).await;
    assert_eq!(reasoner.calls(), 1);
    assert_eq!(
        roles(&dispatcher),
        vec![Role::System, Role::User, Role::Agent]
    );
}
