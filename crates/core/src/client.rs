//! ModelClient trait: the abstraction over hosted LLM backends.
//!
//! A client takes an ordered list of role-tagged segments and returns the
//! completion text. The prompt assembler and the conversation memory depend
//! only on this contract, never on a provider wire format.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::turn::{Role, Turn};

/// One role-tagged piece of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub role: Role,
    pub text: String,
}

impl Segment {
    pub fn system(text: impl Into<String>) -> Self {
        Self { role: Role::System, text: text.into() }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, text: text.into() }
    }
}

impl From<&Turn> for Segment {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role(),
            text: turn.text().to_string(),
        }
    }
}

/// The structured payload built by the prompt assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Preamble, memory window and new message, in that order.
    pub segments: Vec<Segment>,

    /// Response length hint (tool templates carry their own).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Request {
    /// The final user segment, i.e. the message being asked.
    pub fn last_user_text(&self) -> Option<&str> {
        self.segments
            .iter()
            .rev()
            .find(|s| s.role == Role::User)
            .map(|s| s.text.as_str())
    }

    /// Rough size estimate (4 chars ≈ 1 token) for logging.
    pub fn estimated_tokens(&self) -> usize {
        self.segments.iter().map(|s| s.text.len().div_ceil(4) + 4).sum()
    }

    /// Attach model settings for a concrete client call.
    pub fn into_provider_request(
        self,
        model: impl Into<String>,
        temperature: f32,
        default_max_tokens: Option<u32>,
    ) -> ProviderRequest {
        ProviderRequest {
            model: model.into(),
            max_tokens: self.max_tokens.or(default_max_tokens),
            segments: self.segments,
            temperature,
        }
    }
}

/// A request as sent to a client: segments plus model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "gpt-4o")
    pub model: String,

    /// The conversation segments
    pub segments: Vec<Segment>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

/// A complete response from a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The completion text
    pub text: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core ModelClient trait.
///
/// Stateless request → completion. Implementations must not retry on their
/// own; retries are a user decision.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// A human-readable name for this client (e.g., "openai", "openrouter").
    fn name(&self) -> &str;

    /// Send a request and get the complete response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError>;

    /// Health check: can we reach the provider?
    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }
}
