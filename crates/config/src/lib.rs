//! Configuration loading and validation for Craftmind.
//!
//! Loads configuration from `craftmind.toml` with environment variable
//! overrides. Validates all settings at startup.

use craftmind_core::error::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// The root configuration structure.
///
/// Maps directly to `craftmind.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// The controlled agent's identity
    #[serde(default)]
    pub bot: BotConfig,

    /// Reasoning endpoint settings
    #[serde(default)]
    pub reasoner: ReasonerConfig,

    /// Dispatch loop settings
    #[serde(default)]
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// In-world username; also the self-filter key for inbound chat
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Optional system prompt override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasonerConfig {
    /// Base URL of the Ollama endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum chained reasoning rounds per external stimulus
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_bot_name() -> String {
    "bot".into()
}
fn default_base_url() -> String {
    "http://localhost:11434".into()
}
fn default_model() -> String {
    "llama3.2".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_rounds() -> u32 {
    8
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            system_prompt: None,
        }
    }
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
                message: format!("failed to read {}: {e}", path.display()),
            })?;
            toml::from_str(&raw).map_err(|e| Error::Config {
                message: format!("failed to parse {}: {e}", path.display()),
            })?
        } else {
            debug!(path = %path.display(), "No config file found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `CRAFTMIND_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("CRAFTMIND_BOT_NAME") {
            self.bot.name = name;
        }
        if let Ok(url) = std::env::var("CRAFTMIND_OLLAMA_URL") {
            self.reasoner.base_url = url;
        }
        if let Ok(model) = std::env::var("CRAFTMIND_MODEL") {
            self.reasoner.model = model;
        }
    }

    /// Validate all settings.
    pub fn validate(&self) -> Result<(), Error> {
        if self.bot.name.trim().is_empty() {
            return Err(Error::Config {
                message: "bot.name must not be empty".into(),
            });
        }
        if self.reasoner.base_url.trim().is_empty() {
            return Err(Error::Config {
                message: "reasoner.base_url must not be empty".into(),
            });
        }
        if !(0.0..=2.0).contains(&self.reasoner.temperature) {
            return Err(Error::Config {
                message: format!(
                    "reasoner.temperature must be in [0.0, 2.0], got {}",
                    self.reasoner.temperature
                ),
            });
        }
        if self.agent.max_rounds == 0 {
            return Err(Error::Config {
                message: "agent.max_rounds must be at least 1".into(),
            });
        }
        Ok(())
    }
}
