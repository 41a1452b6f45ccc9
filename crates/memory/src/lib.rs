//! Session memory for StudyMate.
//!
//! - [`ConversationMemory`]: the append-only turn log of one session
//! - [`insights`]: keyword analytics over the learner's turns

pub mod conversation;
pub mod insights;

pub use conversation::ConversationMemory;
pub use insights::{LearningInsights, QuestionKind, Trend};
