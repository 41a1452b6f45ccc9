//! Hosted LLM clients for StudyMate.
//!
//! All clients implement the `studymate_core::ModelClient` trait.
//! The router builds the configured client from `AppConfig`.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatClient;
pub use router::{build_from_config, ClientRouter};
