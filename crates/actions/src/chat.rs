//! Chat action — speak into the world's chat channel.

use async_trait::async_trait;
use craftmind_core::action::{Action, ActionOutcome, ActionReport};
use craftmind_core::error::ActionError;
use craftmind_core::world::WorldAdapter;
use std::sync::Arc;

pub struct ChatAction {
    world: Arc<dyn WorldAdapter>,
}

impl ChatAction {
    pub fn new(world: Arc<dyn WorldAdapter>) -> Self {
        Self { world }
    }
}

#[async_trait]
impl Action for ChatAction {
    fn name(&self) -> &str {
        "chat"
    }

    fn description(&self) -> &str {
        "Send a chat message into the game world."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "The message to send in the chat."
                }
            },
            "required": ["message"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> Result<ActionOutcome, ActionError> {
        let message = arguments["message"]
            .as_str()
            .ok_or_else(|| ActionError::InvalidArguments("Missing 'message' argument".into()))?;

        self.world
            .send_chat(message)
            .await
            .map_err(|e| ActionError::ExecutionFailed {
                action: "chat".into(),
                reason: e.to_string(),
            })?;

        Ok(ActionOutcome::Complete(ActionReport::effect(
            serde_json::json!({ "sent": message }),
        )))
    }
}
