//! The study session and everything it needs to talk to the model.
//!
//! Each learner action goes through the same round trip:
//!
//! 1. **Validate** the message or resolve the quick tool
//! 2. **Route** a free-form message to a specialised tutor, if one fits
//! 3. **Assemble** a request (profile + memory window + message)
//! 4. **Complete** it through the configured model client, under a timeout
//! 5. **Record** the (user, assistant) exchange, only on success
//!
//! A failed action is remembered and can be resent with `retry`.

pub mod prompt;
pub mod quick_tools;
pub mod session;
pub mod specialists;

#[cfg(test)]
mod test_helpers;

pub use prompt::PromptAssembler;
pub use quick_tools::{QUICK_TOOLS, QuickTool, dispatch};
pub use session::{PendingAction, Reply, SessionSettings, StudySession};
pub use specialists::{Specialist, TUTORS, Tutor};
