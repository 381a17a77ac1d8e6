//! Gateway trait — the abstraction over the text-generation model.
//!
//! A gateway accepts a rendered prompt and returns raw text. No output
//! format is guaranteed; recovering structure from the reply is the
//! response extractor's job, not the gateway's. The call may block for a
//! long network round trip and has no built-in retry — callers impose a
//! process-level deadline.

use crate::error::GatewayError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single text-completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "anthropic/claude-sonnet-4", "gpt-4o")
    pub model: String,

    /// The fully rendered prompt text
    pub prompt: String,

    /// Temperature (low — both passes are classification-shaped work)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.3
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// The model gateway: opaque text in, opaque text out.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// A human-readable name for this gateway (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Send a prompt and return the raw completion text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, GatewayError>;
}
