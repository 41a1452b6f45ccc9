//! In-memory conversation log for a single study session.
//!
//! Append-only: turns are never edited or reordered. There is no eviction;
//! callers bound what they send with [`ConversationMemory::recent`].

use serde::{Deserialize, Serialize};
use studymate_core::error::ValidationError;
use studymate_core::tool::ToolId;
use studymate_core::turn::{Role, Turn};
use tracing::debug;

/// The ordered turn log owned by one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
    /// Last sequence number issued or accepted. Survives `clear()`.
    last_seq: u64,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sequence number the next recorded turn will get.
    pub fn next_seq(&self) -> u64 {
        self.last_seq + 1
    }

    /// Append a turn to the end of the log.
    ///
    /// Rejects blank turns and turns whose sequence number is not after the
    /// last one; the log is unchanged on rejection.
    pub fn append(&mut self, turn: Turn) -> Result<(), ValidationError> {
        if !turn.is_well_formed() {
            return Err(ValidationError::EmptyTurn);
        }
        if turn.seq() <= self.last_seq {
            return Err(ValidationError::OutOfOrder {
                last: self.last_seq,
                got: turn.seq(),
            });
        }
        self.last_seq = turn.seq();
        self.turns.push(turn);
        Ok(())
    }

    /// Build a turn with the next sequence number and append it.
    pub fn record(&mut self, role: Role, text: impl Into<String>) -> Result<&Turn, ValidationError> {
        let turn = Turn::new(self.next_seq(), role, text)?;
        self.append(turn)?;
        Ok(&self.turns[self.turns.len() - 1])
    }

    /// Record a completed user/assistant exchange. Both or neither.
    pub fn record_exchange(
        &mut self,
        user_text: impl Into<String>,
        assistant_text: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let user = Turn::new(self.next_seq(), Role::User, user_text)?;
        let assistant = Turn::new(self.next_seq() + 1, Role::Assistant, assistant_text)?;
        self.push_exchange(user, assistant)
    }

    /// Record a quick-tool exchange: the rendered template and its reply,
    /// both tagged with `tool`.
    pub fn record_tool_exchange(
        &mut self,
        tool: ToolId,
        prompt_text: impl Into<String>,
        assistant_text: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let user = Turn::new(self.next_seq(), Role::User, prompt_text)?.with_tool(tool);
        let assistant =
            Turn::new(self.next_seq() + 1, Role::Assistant, assistant_text)?.with_tool(tool);
        self.push_exchange(user, assistant)
    }

    fn push_exchange(&mut self, user: Turn, assistant: Turn) -> Result<(), ValidationError> {
        self.append(user)?;
        self.append(assistant)?;
        debug!(turns = self.turns.len(), "Recorded exchange");
        Ok(())
    }

    /// The last `max_turns` turns, oldest first.
    pub fn recent(&self, max_turns: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(max_turns);
        &self.turns[start..]
    }

    /// Forget every turn. Sequence numbers keep increasing afterwards.
    pub fn clear(&mut self) {
        debug!(dropped = self.turns.len(), "Clearing conversation memory");
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Messages the learner typed, oldest first. Tool templates are skipped.
    pub fn learner_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.is_learner_message())
    }
}
