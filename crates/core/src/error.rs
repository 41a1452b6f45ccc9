//! Error types for the StudyMate domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error type, wrapped by [`Error`].

use thiserror::Error;

/// The top-level error type for all StudyMate operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Input validation (recovered locally, memory untouched) ---
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    // --- Quick tool lookup ---
    #[error(transparent)]
    UnknownTool(#[from] UnknownToolError),

    // --- Model client errors ---
    #[error("Model client error: {0}")]
    Provider(#[from] ProviderError),

    // --- Retry without a failed action ---
    #[error("Nothing to retry: the last request succeeded or none was made")]
    NothingToRetry,

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Whether the user can reasonably resend the same action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider(e) if e.is_retryable())
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Empty or malformed input rejected before anything is sent or stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("message must not be empty")]
    EmptyMessage,

    #[error("turn text must not be empty")]
    EmptyTurn,

    #[error("turn sequence {got} is not after the last recorded sequence {last}")]
    OutOfOrder { last: u64, got: u64 },

    #[error("{tool} needs at least one subject in the learner profile")]
    MissingSubjects { tool: String },

    #[error("unknown learning level: {0} (expected beginner, intermediate or advanced)")]
    UnknownLevel(String),

    #[error("invalid value for {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
}

/// A quick tool identifier outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown quick tool: {0} (expected study_plan, quiz, progress_report or study_techniques)")]
pub struct UnknownToolError(pub String);

/// Failures of the external model call.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Provider quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Model returned an empty completion")]
    EmptyCompletion,
}

impl ProviderError {
    /// Transient failures worth a manual resend.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout(_) | Self::Network(_) | Self::EmptyCompletion => {
                true
            }
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::QuotaExceeded(_) | Self::AuthenticationFailed(_) | Self::NotConfigured(_) => false,
        }
    }
}
