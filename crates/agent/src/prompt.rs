//! Prompt assembly: profile + memory window + new message → [`Request`].
//!
//! Segments are laid out in a fixed order:
//!
//! 1. **System preamble** (coach persona, learner profile, learning context,
//!    guidelines)
//! 2. **Memory window** (recent turns, same order and roles as stored)
//! 3. **New message** (the user text, or a rendered quick-tool or tutor
//!    template)
//!
//! # Determinism
//!
//! Assembly is a pure function of its inputs. No clock, randomness or
//! hash-map iteration is involved, so identical inputs always produce
//! identical requests.

use studymate_core::client::{Request, Segment};
use studymate_core::error::ValidationError;
use studymate_core::profile::Profile;
use studymate_core::tool::ToolRequest;
use studymate_core::turn::Turn;
use studymate_memory::LearningInsights;

use crate::quick_tools;
use crate::specialists::{self, Specialist};

const NOT_SPECIFIED: &str = "Not specified";

const PERSONA: &str = "You are an expert AI Learning Coach providing personalized educational \
                       guidance across all academic subjects.";

const GUIDELINES: [&str; 8] = [
    "Provide clear, educational explanations appropriate for the student's level",
    "Use examples and analogies to make complex concepts understandable",
    "Encourage active learning and critical thinking",
    "Offer study strategies and techniques when relevant",
    "Be supportive and motivating",
    "If the question is about a specific subject, provide comprehensive coverage",
    "For test prep questions, include practice strategies and tips",
    "Always maintain an encouraging, educational tone",
];

const CLOSING: &str = "Respond to the student's question with personalized guidance.";

/// Builds model requests. Stateless apart from the chat length hint.
#[derive(Debug, Clone, Default)]
pub struct PromptAssembler {
    chat_max_tokens: Option<u32>,
}

impl PromptAssembler {
    /// `chat_max_tokens` is the hint attached to free chat requests.
    pub fn new(chat_max_tokens: Option<u32>) -> Self {
        Self { chat_max_tokens }
    }

    /// Assemble a chat request.
    ///
    /// Fails only when `message` is blank. The message is never truncated
    /// and the window is never reordered.
    pub fn build(
        &self,
        profile: &Profile,
        window: &[Turn],
        message: &str,
    ) -> Result<Request, ValidationError> {
        self.assemble(profile, window, message, self.chat_max_tokens)
    }

    /// Render a quick tool and assemble it exactly like a chat message.
    pub fn build_for_tool(
        &self,
        profile: &Profile,
        tool: &ToolRequest,
        window: &[Turn],
    ) -> Result<Request, ValidationError> {
        let rendered = quick_tools::render(tool, profile)?;
        let max_tokens = quick_tools::lookup(tool.tool_id).max_tokens;
        self.assemble(profile, window, &rendered, Some(max_tokens))
    }

    /// Wrap the learner's message in a specialised tutor template.
    pub fn build_for_specialist(
        &self,
        profile: &Profile,
        specialist: Specialist,
        window: &[Turn],
        message: &str,
    ) -> Result<Request, ValidationError> {
        if message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        let rendered = specialists::render(specialist, profile, message);
        let max_tokens = specialists::tutor(specialist).max_tokens;
        self.assemble(profile, window, &rendered, Some(max_tokens))
    }

    fn assemble(
        &self,
        profile: &Profile,
        window: &[Turn],
        message: &str,
        max_tokens: Option<u32>,
    ) -> Result<Request, ValidationError> {
        if message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }

        let mut segments = Vec::with_capacity(window.len() + 2);
        segments.push(Segment::system(system_preamble(profile, window)));
        segments.extend(window.iter().map(Segment::from));
        segments.push(Segment::user(message));

        Ok(Request {
            segments,
            max_tokens,
        })
    }
}

/// The system segment for a given profile and window.
pub fn system_preamble(profile: &Profile, window: &[Turn]) -> String {
    let mut out = String::new();
    out.push_str(PERSONA);
    out.push_str("\n\nStudent Profile:\n");
    out.push_str(&format!(
        "- Preferred subjects: {}\n",
        profile.subjects_label(NOT_SPECIFIED)
    ));
    out.push_str(&format!("- Learning level: {}\n", profile.level));
    out.push_str(&format!("- Study goals: {}\n", profile.goals_label(NOT_SPECIFIED)));

    // Only present once the window holds at least one learner message.
    if let Some(context) = LearningInsights::from_turns(window).learning_context() {
        out.push_str("\nLearning Context from Previous Interactions:\n");
        out.push_str(&context);
        out.push('\n');
    }

    out.push_str("\nGuidelines:\n");
    for (i, line) in GUIDELINES.iter().enumerate() {
        out.push_str(&format!("{}. {line}\n", i + 1));
    }
    out.push('\n');
    out.push_str(CLOSING);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use studymate_core::profile::Level;
    use studymate_core::tool::ToolId;
    use studymate_core::turn::Role;
    use studymate_memory::ConversationMemory;

    fn algebra_beginner() -> Profile {
        Profile::new(["algebra"], Level::Beginner)
    }

    #[test]
    fn empty_memory_gives_preamble_and_message() {
        let request = PromptAssembler::default()
            .build(&algebra_beginner(), &[], "What is a variable?")
            .unwrap();

        assert_eq!(request.segments.len(), 2);
        assert_eq!(request.segments[0].role, Role::System);
        assert!(request.segments[0].text.contains("algebra"));
        assert!(request.segments[0].text.contains("beginner"));
        assert!(!request.segments[0].text.contains("Learning Context"));
        assert_eq!(request.segments[1], Segment::user("What is a variable?"));
    }

    #[test]
    fn window_turns_keep_order_and_roles() {
        let mut mem = ConversationMemory::new();
        mem.record_exchange("What is a variable?", "A named value.").unwrap();
        mem.record_exchange("And a constant?", "A fixed value.").unwrap();

        let request = PromptAssembler::default()
            .build(&algebra_beginner(), mem.recent(10), "Give me an example")
            .unwrap();

        let roles: Vec<Role> = request.segments.iter().map(|s| s.role).collect();
        assert_eq!(
            roles,
            [Role::System, Role::User, Role::Assistant, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(request.segments[1].text, "What is a variable?");
        assert_eq!(request.segments[4].text, "A fixed value.");
        assert_eq!(request.last_user_text(), Some("Give me an example"));
        assert!(request.segments[0].text.contains("Learning Context from Previous Interactions"));
    }

    #[test]
    fn empty_profile_says_not_specified() {
        let preamble = system_preamble(&Profile::default(), &[]);
        assert!(preamble.contains("- Preferred subjects: Not specified"));
        assert!(preamble.contains("- Study goals: Not specified"));
        assert!(preamble.contains("- Learning level: intermediate"));
        assert!(preamble.contains("8. Always maintain an encouraging, educational tone"));
    }

    #[test]
    fn goals_appear_in_preamble() {
        let profile = algebra_beginner().with_goals(["pass the midterm"]);
        assert!(system_preamble(&profile, &[]).contains("- Study goals: pass the midterm"));
    }

    #[test]
    fn blank_message_is_rejected() {
        let assembler = PromptAssembler::default();
        for message in ["", "   ", "\n\t"] {
            assert_eq!(
                assembler.build(&algebra_beginner(), &[], message).unwrap_err(),
                ValidationError::EmptyMessage
            );
        }
    }

    #[test]
    fn message_is_not_truncated() {
        let long = "why ".repeat(5_000);
        let request = PromptAssembler::default()
            .build(&algebra_beginner(), &[], &long)
            .unwrap();
        assert_eq!(request.last_user_text(), Some(long.as_str()));
    }

    #[test]
    fn build_is_deterministic() {
        let mut mem = ConversationMemory::new();
        mem.record_exchange("Explain fractions", "Parts of a whole.").unwrap();
        let assembler = PromptAssembler::new(Some(1000));
        let profile = algebra_beginner().with_goals(["practice daily"]);

        let a = assembler.build(&profile, mem.recent(10), "next?").unwrap();
        let b = assembler.build(&profile, mem.recent(10), "next?").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.max_tokens, Some(1000));
    }

    #[test]
    fn tool_request_uses_tool_length_hint() {
        let assembler = PromptAssembler::new(Some(1000));
        let request = assembler
            .build_for_tool(&algebra_beginner(), &ToolRequest::new(ToolId::StudyPlan), &[])
            .unwrap();
        assert_eq!(request.max_tokens, Some(800));
        assert_eq!(request.segments.len(), 2);
        assert!(request.last_user_text().unwrap().contains("algebra"));
    }

    #[test]
    fn tool_shares_window_policy_with_chat() {
        let mut mem = ConversationMemory::new();
        mem.record_exchange("What is a variable?", "A named value.").unwrap();
        let assembler = PromptAssembler::default();
        let profile = algebra_beginner();

        let chat = assembler.build(&profile, mem.recent(10), "hello").unwrap();
        let tool = assembler
            .build_for_tool(&profile, &ToolRequest::new(ToolId::StudyTechniques), mem.recent(10))
            .unwrap();

        let len = chat.segments.len();
        assert_eq!(tool.segments.len(), len);
        assert_eq!(chat.segments[..len - 1], tool.segments[..len - 1]);
    }

    #[test]
    fn specialist_request_wraps_message_and_keeps_window() {
        let mut mem = ConversationMemory::new();
        mem.record_exchange("What is a variable?", "A named value.").unwrap();
        let assembler = PromptAssembler::new(Some(1000));
        let profile = algebra_beginner();

        let chat = assembler.build(&profile, mem.recent(10), "Solve 2x = 8").unwrap();
        let routed = assembler
            .build_for_specialist(&profile, Specialist::MathSolver, mem.recent(10), "Solve 2x = 8")
            .unwrap();

        let len = chat.segments.len();
        assert_eq!(routed.segments.len(), len);
        assert_eq!(chat.segments[..len - 1], routed.segments[..len - 1]);
        assert_eq!(routed.max_tokens, Some(800));
        let text = routed.last_user_text().unwrap();
        assert!(text.starts_with("You are a mathematics tutor helping a beginner level student."));
        assert!(text.contains("Problem: Solve 2x = 8"));

        assert_eq!(
            assembler
                .build_for_specialist(&profile, Specialist::MathSolver, &[], " ")
                .unwrap_err(),
            ValidationError::EmptyMessage
        );
    }
}
