//! Turn and session domain types.
//!
//! A [`Turn`] is one role-tagged message in a study conversation. Turns are
//! immutable once created: fields are private and read through accessors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::tool::ToolId;

/// Unique identifier for a study session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The learner
    User,
    /// The model
    Assistant,
    /// Instructions for the model
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    seq: u64,
    role: Role,
    text: String,
    created_at: DateTime<Utc>,
    /// Set on both turns of a quick-tool exchange.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool: Option<ToolId>,
}

impl Turn {
    /// Create a turn. Rejects text that is empty after trimming.
    pub fn new(seq: u64, role: Role, text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyTurn);
        }
        Ok(Self {
            seq,
            role,
            text,
            created_at: Utc::now(),
            tool: None,
        })
    }

    /// Mark the turn as part of a quick-tool exchange.
    pub fn with_tool(mut self, tool: ToolId) -> Self {
        self.tool = Some(tool);
        self
    }

    /// Monotonic sequence number within the owning memory.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The quick tool behind this turn, `None` for free chat.
    pub fn tool(&self) -> Option<ToolId> {
        self.tool
    }

    /// A user turn the learner typed, as opposed to a rendered tool template.
    pub fn is_learner_message(&self) -> bool {
        self.role == Role::User && self.tool.is_none()
    }

    /// Whether the turn satisfies the memory invariants.
    ///
    /// `Turn::new` already guarantees this, but turns can also arrive
    /// through deserialization.
    pub fn is_well_formed(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_turn() {
        let turn = Turn::new(1, Role::User, "What is a variable?").unwrap();
        assert_eq!(turn.role(), Role::User);
        assert_eq!(turn.text(), "What is a variable?");
        assert_eq!(turn.seq(), 1);
        assert!(turn.is_well_formed());
        assert!(turn.is_learner_message());
    }

    #[test]
    fn tool_turn_is_not_a_learner_message() {
        let turn = Turn::new(1, Role::User, "Create a study plan").unwrap().with_tool(ToolId::StudyPlan);
        assert_eq!(turn.tool(), Some(ToolId::StudyPlan));
        assert!(!turn.is_learner_message());

        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains("\"tool\":\"study_plan\""));
        let back: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tool(), Some(ToolId::StudyPlan));
    }

    #[test]
    fn empty_text_rejected() {
        assert_eq!(Turn::new(1, Role::User, "").unwrap_err(), ValidationError::EmptyTurn);
        assert_eq!(
            Turn::new(1, Role::Assistant, "   \n").unwrap_err(),
            ValidationError::EmptyTurn
        );
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        let role: Role = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(role, Role::System);
    }

    #[test]
    fn deserialized_blank_turn_is_malformed() {
        let json = r#"{"seq":3,"role":"user","text":"  ","created_at":"2024-01-01T00:00:00Z"}"#;
        let turn: Turn = serde_json::from_str(json).unwrap();
        assert!(!turn.is_well_formed());
    }
}
