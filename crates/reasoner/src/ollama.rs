//! Ollama reasoner implementation.
//!
//! Speaks the native `/api/chat` protocol (non-streaming) with tool
//! definitions attached, so locally served models can drive the agent.
//! Ollama needs no API key.

use async_trait::async_trait;
use craftmind_core::action::{ActionDefinition, ActionInvocation};
use craftmind_core::error::ReasonerError;
use craftmind_core::reasoner::{Inference, Reasoner};
use craftmind_core::turn::{Role, Turn};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A reasoner backed by an Ollama chat endpoint.
pub struct OllamaReasoner {
    base_url: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OllamaReasoner {
    /// Create a new Ollama reasoner.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature,
            client,
        }
    }

    /// Convert the turn history to Ollama chat messages.
    fn to_api_messages(history: &[Turn]) -> Vec<ApiMessage> {
        history
            .iter()
            .map(|turn| ApiMessage {
                role: match turn.role {
                    Role::System => "system".into(),
                    Role::User => "user".into(),
                    Role::Agent => "assistant".into(),
                    Role::ActionResult => "tool".into(),
                },
                content: turn.content.clone(),
            })
            .collect()
    }

    /// Convert action definitions to Ollama tool declarations.
    fn to_api_tools(actions: &[ActionDefinition]) -> Vec<ApiTool> {
        actions
            .iter()
            .map(|action| ApiTool {
                r#type: "function".into(),
                function: ApiToolFunction {
                    name: action.name.clone(),
                    description: action.description.clone(),
                    parameters: action.parameters.clone(),
                },
            })
            .collect()
    }
}

/// Map a decoded chat response onto an [`Inference`].
fn inference_from(message: ApiResponseMessage) -> Inference {
    let reply = {
        let trimmed = message.content.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    };

    let invocations = message
        .tool_calls
        .into_iter()
        .map(|call| ActionInvocation {
            name: call.function.name,
            arguments: call.function.arguments,
        })
        .collect();

    Inference { reply, invocations }
}

#[async_trait]
impl Reasoner for OllamaReasoner {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn infer(
        &self,
        history: &[Turn],
        actions: &[ActionDefinition],
    ) -> Result<Inference, ReasonerError> {
        let url = format!("{}/api/chat", self.base_url);

        let body = ApiChatRequest {
            model: &self.model,
            messages: Self::to_api_messages(history),
            stream: false,
            tools: Self::to_api_tools(actions),
            options: ApiOptions {
                temperature: self.temperature,
            },
        };

        debug!(
            model = %self.model,
            turns = history.len(),
            actions = actions.len(),
            "Sending inference request"
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReasonerError::Timeout(e.to_string())
                } else {
                    ReasonerError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Ollama returned error");
            return Err(ReasonerError::Api {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiChatResponse = response
            .json()
            .await
            .map_err(|e| ReasonerError::MalformedResponse(e.to_string()))?;

        Ok(inference_from(api_response.message))
    }
}

// ── Ollama wire types ──────────────────────────────────────────────────

#[derive(Serialize)]
struct ApiChatRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ApiTool>,
    options: ApiOptions,
}

#[derive(Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ApiTool {
    r#type: String,
    function: ApiToolFunction,
}

#[derive(Serialize)]
struct ApiToolFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Serialize)]
struct ApiOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ApiChatResponse {
    message: ApiResponseMessage,
}

#[derive(Deserialize, Default)]
struct ApiResponseMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Vec<ApiToolCall>,
}

#[derive(Deserialize)]
struct ApiToolCall {
    function: ApiFunctionCall,
}

#[derive(Deserialize)]
struct ApiFunctionCall {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}
