//! Move action — walk to an absolute coordinate.
//!
//! The only long-running built-in: execution returns a pending outcome
//! whose future resolves once the world settles the goal (arrival, no
//! route, or supersession by a newer goal).

use async_trait::async_trait;
use craftmind_core::action::{Action, ActionOutcome, ActionReport};
use craftmind_core::error::ActionError;
use craftmind_core::world::{MoveOutcome, Position, WorldAdapter};
use std::sync::Arc;

pub struct MoveAction {
    world: Arc<dyn WorldAdapter>,
}

impl MoveAction {
    pub fn new(world: Arc<dyn WorldAdapter>) -> Self {
        Self { world }
    }
}

#[async_trait]
impl Action for MoveAction {
    fn name(&self) -> &str {
        "move"
    }

    fn description(&self) -> &str {
        "Move to the specified coordinates (x, y, z) in the world."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "x": { "type": "number", "description": "The x coordinate to move to." },
                "y": { "type": "number", "description": "The y coordinate to move to." },
                "z": { "type": "number", "description": "The z coordinate to move to." }
            },
            "required": ["x", "y", "z"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> Result<ActionOutcome, ActionError> {
        let coord = |key: &str| {
            arguments[key].as_f64().ok_or_else(|| {
                ActionError::InvalidArguments(format!("'{key}' must be a number"))
            })
        };
        let target = Position::new(coord("x")?, coord("y")?, coord("z")?);

        let completion =
            self.world
                .move_to(target)
                .await
                .map_err(|e| ActionError::ExecutionFailed {
                    action: "move".into(),
                    reason: e.to_string(),
                })?;

        Ok(ActionOutcome::Pending(Box::pin(async move {
            let target_json = serde_json::to_value(target).unwrap_or_default();
            match completion.await {
                Ok(MoveOutcome::Arrived(position)) => ActionReport::observed(serde_json::json!({
                    "moved_to": {
                        "x": position.x,
                        "y": position.y,
                        "z": position.z,
                    }
                })),
                Ok(MoveOutcome::NoPath) => ActionReport::failure(serde_json::json!({
                    "error": "no_path_found",
                    "target": target_json,
                })),
                Ok(MoveOutcome::Superseded) => ActionReport::failure(serde_json::json!({
                    "error": "superseded",
                    "target": target_json,
                })),
                // The world dropped the goal without settling it.
                Err(_) => ActionReport::failure(serde_json::json!({
                    "error": "move_interrupted",
                    "target": target_json,
                })),
            }
        })))
    }
}
