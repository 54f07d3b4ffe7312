//! Action trait — the abstraction over the agent's world-affecting moves.
//!
//! Actions are what let the agent act in the game world: stand idle, send
//! chat, walk to a coordinate, look up another player's position. The
//! reasoning endpoint selects them by name; the registry resolves and
//! executes them.

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ActionError;

/// An action definition sent to the reasoning endpoint so it knows what it
/// can call. Always derived from a registered [`Action`] via
/// [`Action::to_definition`] — never hand-written at the transmission site —
/// so the declared surface and the executable surface cannot drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDefinition {
    /// The action name
    pub name: String,

    /// Description of what the action does
    pub description: String,

    /// JSON Schema describing the action's parameters
    pub parameters: serde_json::Value,
}

/// A requested call: action name plus concrete argument values, as produced
/// by the reasoning endpoint. Arguments are untyped at this boundary and are
/// validated against the definition's schema before dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionInvocation {
    /// Name of the action to execute
    pub name: String,

    /// Arguments as a JSON value
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// The report an action produces once it has run to completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionReport {
    /// Whether the action accomplished what was asked
    pub success: bool,

    /// Structured payload describing the outcome
    pub payload: serde_json::Value,

    /// Whether this report should be fed back into the context and trigger
    /// another reasoning round. Query results and failures are observed;
    /// fire-and-effect actions (idle, chat) are not.
    pub observe: bool,
}

impl ActionReport {
    /// A successful fire-and-effect report: nothing to feed back.
    pub fn effect(payload: serde_json::Value) -> Self {
        Self {
            success: true,
            payload,
            observe: false,
        }
    }

    /// A successful report the reasoner should see on the next round.
    pub fn observed(payload: serde_json::Value) -> Self {
        Self {
            success: true,
            payload,
            observe: true,
        }
    }

    /// A failure report. Always observed so the reasoner can self-correct.
    pub fn failure(payload: serde_json::Value) -> Self {
        Self {
            success: false,
            payload,
            observe: true,
        }
    }
}

/// The outcome of starting an action.
///
/// Immediate actions resolve within the dispatch cycle; long-running ones
/// (movement) hand back a future that resolves when the world reports
/// completion. The dispatcher awaits pending outcomes in order, so result
/// turns always land in causal order.
pub enum ActionOutcome {
    /// Completed within the dispatch cycle.
    Complete(ActionReport),

    /// Completes later; the future resolves when the world settles it.
    Pending(BoxFuture<'static, ActionReport>),
}

impl std::fmt::Debug for ActionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete(report) => f.debug_tuple("Complete").field(report).finish(),
            Self::Pending(_) => f.debug_tuple("Pending").field(&"<future>").finish(),
        }
    }
}

/// The core Action trait.
///
/// Each action (idle, chat, move, get_player_location) implements this
/// trait. Actions are registered in the ActionRegistry and made available
/// to the dispatch loop.
#[async_trait]
pub trait Action: Send + Sync {
    /// The unique name of this action (e.g., "move", "chat").
    fn name(&self) -> &str;

    /// A description of what this action does (sent to the reasoner).
    fn description(&self) -> &str;

    /// JSON Schema describing this action's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the action with the given (already validated) arguments.
    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ActionOutcome, ActionError>;

    /// Convert this action into an ActionDefinition for the reasoner.
    fn to_definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available actions.
///
/// The dispatch loop uses this to:
/// 1. Derive the action definitions sent to the reasoner
/// 2. Resolve, validate, and execute invocations the reasoner requests
///
/// Invariant: every name the reasoner may return resolves to exactly one
/// registered handler, and `definitions()` exposes exactly the resolvable
/// names.
pub struct ActionRegistry {
    actions: HashMap<String, Box<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Register an action. Replaces any existing action with the same name.
    pub fn register(&mut self, action: Box<dyn Action>) {
        let name = action.name().to_string();
        self.actions.insert(name, action);
    }

    /// Resolve an action by name.
    pub fn resolve(&self, name: &str) -> Option<&dyn Action> {
        self.actions.get(name).map(|a| a.as_ref())
    }

    /// Get all action definitions (for transmission to the reasoner).
    pub fn definitions(&self) -> Vec<ActionDefinition> {
        self.actions.values().map(|a| a.to_definition()).collect()
    }

    /// List all registered action names.
    pub fn names(&self) -> Vec<&str> {
        self.actions.keys().map(|s| s.as_str()).collect()
    }

    /// Resolve, validate, and execute an invocation.
    ///
    /// Unknown names and schema violations come back as errors; the caller
    /// turns them into failure result turns rather than crashing the loop.
    pub async fn dispatch(
        &self,
        invocation: &ActionInvocation,
    ) -> std::result::Result<ActionOutcome, ActionError> {
        let action = self
            .actions
            .get(&invocation.name)
            .ok_or_else(|| ActionError::UnknownAction(invocation.name.clone()))?;
        validate_arguments(&action.to_definition(), &invocation.arguments)?;
        action.execute(invocation.arguments.clone()).await
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate concrete argument values against a definition's declared schema.
///
/// Checks the two things the reasoner regularly gets wrong: missing
/// `required` keys, and wrong primitive types for declared `string` /
/// `number` properties. Extra keys are tolerated.
pub fn validate_arguments(
    definition: &ActionDefinition,
    arguments: &serde_json::Value,
) -> std::result::Result<(), ActionError> {
    let schema = &definition.parameters;

    let args = match arguments {
        serde_json::Value::Object(map) => map,
        serde_json::Value::Null => {
            // Null is acceptable only when nothing is required.
            let any_required = schema
                .get("required")
                .and_then(|r| r.as_array())
                .is_some_and(|r| !r.is_empty());
            if any_required {
                return Err(ActionError::InvalidArguments(format!(
                    "'{}' requires arguments but none were given",
                    definition.name
                )));
            }
            return Ok(());
        }
        other => {
            return Err(ActionError::InvalidArguments(format!(
                "'{}' arguments must be an object, got {other}",
                definition.name
            )));
        }
    };

    if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
        for key in required.iter().filter_map(|k| k.as_str()) {
            if !args.contains_key(key) {
                return Err(ActionError::InvalidArguments(format!(
                    "'{}' missing required argument '{key}'",
                    definition.name
                )));
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
        for (key, value) in args {
            let Some(declared) = properties.get(key).and_then(|p| p.get("type")) else {
                continue;
            };
            let ok = match declared.as_str() {
                Some("string") => value.is_string(),
                Some("number") => value.is_number(),
                Some("integer") => value.is_i64() || value.is_u64(),
                Some("boolean") => value.is_boolean(),
                _ => true,
            };
            if !ok {
                return Err(ActionError::InvalidArguments(format!(
                    "'{}' argument '{key}' must be of type {declared}, got {value}",
                    definition.name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test action for unit tests.
    struct EchoAction;

    #[async_trait]
    impl Action for EchoAction {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }
        async fn execute(
            &self,
            arguments: serde_json::Value,
        ) -> Result<ActionOutcome, ActionError> {
            let text = arguments["text"].as_str().unwrap_or("").to_string();
            Ok(ActionOutcome::Complete(ActionReport::observed(
                serde_json::json!({ "echo": text }),
            )))
        }
    }

    #[test]
    fn registry_register_and_resolve() {
        let mut registry = ActionRegistry::new();
        registry.register(Box::new(EchoAction));
        assert!(registry.resolve("echo").is_some());
        assert!(registry.resolve("nonexistent").is_none());
    }

    #[test]
    fn definitions_match_resolvable_names() {
        let mut registry = ActionRegistry::new();
        registry.register(Box::new(EchoAction));

        let declared: Vec<String> = registry
            .definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        for name in &declared {
            assert!(registry.resolve(name).is_some());
        }
        assert_eq!(declared.len(), registry.names().len());
    }

    #[tokio::test]
    async fn dispatch_executes_action() {
        let mut registry = ActionRegistry::new();
        registry.register(Box::new(EchoAction));

        let invocation = ActionInvocation {
            name: "echo".into(),
            arguments: serde_json::json!({"text": "hello world"}),
        };
        let outcome = registry.dispatch(&invocation).await.unwrap();
        match outcome {
            ActionOutcome::Complete(report) => {
                assert!(report.success);
                assert_eq!(report.payload["echo"], "hello world");
            }
            ActionOutcome::Pending(_) => panic!("echo should complete immediately"),
        }
    }

    #[tokio::test]
    async fn dispatch_unknown_action() {
        let registry = ActionRegistry::new();
        let invocation = ActionInvocation {
            name: "nonexistent".into(),
            arguments: serde_json::json!({}),
        };
        let err = registry.dispatch(&invocation).await.unwrap_err();
        assert!(matches!(err, ActionError::UnknownAction(_)));
    }

    #[tokio::test]
    async fn dispatch_rejects_missing_required() {
        let mut registry = ActionRegistry::new();
        registry.register(Box::new(EchoAction));

        let invocation = ActionInvocation {
            name: "echo".into(),
            arguments: serde_json::json!({}),
        };
        let err = registry.dispatch(&invocation).await.unwrap_err();
        assert!(matches!(err, ActionError::InvalidArguments(_)));
    }

    #[test]
    fn validate_rejects_wrong_type() {
        let def = EchoAction.to_definition();
        let err = validate_arguments(&def, &serde_json::json!({"text": 42})).unwrap_err();
        assert!(err.to_string().contains("text"));
    }

    #[test]
    fn validate_accepts_null_when_nothing_required() {
        let def = ActionDefinition {
            name: "idle".into(),
            description: "".into(),
            parameters: serde_json::json!({
                "type": "object", "properties": {}, "required": []
            }),
        };
        assert!(validate_arguments(&def, &serde_json::Value::Null).is_ok());
    }

    #[test]
    fn validate_tolerates_extra_keys() {
        let def = EchoAction.to_definition();
        let args = serde_json::json!({"text": "hi", "volume": 11});
        assert!(validate_arguments(&def, &args).is_ok());
    }
}
