//! # StudyMate Core
//!
//! Domain types, traits, and error definitions for the StudyMate study
//! assistant. This crate has **no framework dependencies**: it defines the
//! domain model that the other crates implement against.
//!
//! - [`turn`]: role-tagged conversation turns
//! - [`profile`]: learner subjects, level and goals
//! - [`client`]: the `ModelClient` contract and request types
//! - [`tool`]: quick tool identifiers

pub mod client;
pub mod error;
pub mod profile;
pub mod tool;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use client::{ModelClient, ProviderRequest, ProviderResponse, Request, Segment, Usage};
pub use error::{Error, ProviderError, Result, UnknownToolError, ValidationError};
pub use profile::{Level, Profile};
pub use tool::{ToolId, ToolRequest};
pub use turn::{Role, SessionId, Turn};
