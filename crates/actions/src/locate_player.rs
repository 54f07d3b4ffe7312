//! Player lookup action — query another entity's position.
//!
//! An absent player is a valid negative result, not a failure: the report
//! still succeeds and is fed back into context so the agent can react
//! (say it cannot find them, search, give up).

use async_trait::async_trait;
use craftmind_core::action::{Action, ActionOutcome, ActionReport};
use craftmind_core::error::ActionError;
use craftmind_core::world::WorldAdapter;
use std::sync::Arc;

pub struct LocatePlayerAction {
    world: Arc<dyn WorldAdapter>,
}

impl LocatePlayerAction {
    pub fn new(world: Arc<dyn WorldAdapter>) -> Self {
        Self { world }
    }
}

#[async_trait]
impl Action for LocatePlayerAction {
    fn name(&self) -> &str {
        "get_player_location"
    }

    fn description(&self) -> &str {
        "Get the location of a player by their username."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "username": {
                    "type": "string",
                    "description": "The username of the player to get the location of."
                }
            },
            "required": ["username"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> Result<ActionOutcome, ActionError> {
        let username = arguments["username"]
            .as_str()
            .ok_or_else(|| ActionError::InvalidArguments("Missing 'username' argument".into()))?;

        let located =
            self.world
                .locate(username)
                .await
                .map_err(|e| ActionError::ExecutionFailed {
                    action: "get_player_location".into(),
                    reason: e.to_string(),
                })?;

        let payload = match located {
            Some(position) => serde_json::json!({
                "player_location": {
                    "username": username,
                    "location": {
                        "x": position.x,
                        "y": position.y,
                        "z": position.z,
                    }
                }
            }),
            None => serde_json::json!({
                "player_location": {
                    "username": username,
                    "found": false,
                }
            }),
        };

        Ok(ActionOutcome::Complete(ActionReport::observed(payload)))
    }
}
