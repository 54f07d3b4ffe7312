//! Idle action — do nothing for a while.

use async_trait::async_trait;
use craftmind_core::action::{Action, ActionOutcome, ActionReport};
use craftmind_core::error::ActionError;

pub struct IdleAction;

#[async_trait]
impl Action for IdleAction {
    fn name(&self) -> &str {
        "idle"
    }

    fn description(&self) -> &str {
        "Stay idle for some time."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(
        &self,
        _arguments: serde_json::Value,
    ) -> Result<ActionOutcome, ActionError> {
        Ok(ActionOutcome::Complete(ActionReport::effect(
            serde_json::json!({ "status": "idle" }),
        )))
    }
}
