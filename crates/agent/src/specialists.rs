//! Specialised tutors for free-form questions.
//!
//! A chat message can be answered by one of a fixed set of focused tutors
//! (worked maths solutions, science explanations, history timelines, ...)
//! instead of the general coach. [`route_by_keywords`] picks one locally;
//! [`router_request`] and [`parse_router_reply`] let the model pick instead.
//! Either way, no match means the general coach answers.

use serde::Deserialize;
use studymate_core::client::{Request, Segment};
use studymate_core::profile::Profile;

/// Length hint for the routing call; the reply is a short JSON object.
pub const ROUTER_MAX_TOKENS: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Specialist {
    MathSolver,
    ScienceExplainer,
    CodingHelper,
    WritingAssistant,
    LiteratureAnalysis,
    HistoryTimeline,
    TestStrategy,
    PracticeProblems,
}

impl Specialist {
    pub const ALL: [Specialist; 8] = [
        Specialist::MathSolver,
        Specialist::ScienceExplainer,
        Specialist::CodingHelper,
        Specialist::WritingAssistant,
        Specialist::LiteratureAnalysis,
        Specialist::HistoryTimeline,
        Specialist::TestStrategy,
        Specialist::PracticeProblems,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MathSolver => "math_solver",
            Self::ScienceExplainer => "science_explainer",
            Self::CodingHelper => "coding_helper",
            Self::WritingAssistant => "writing_assistant",
            Self::LiteratureAnalysis => "literature_analysis",
            Self::HistoryTimeline => "history_timeline",
            Self::TestStrategy => "test_strategy",
            Self::PracticeProblems => "practice_problems",
        }
    }

    /// Parse a tutor name as the router writes it. Unknown names give `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|s| s.as_str() == normalized)
    }
}

impl std::fmt::Display for Specialist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Template and routing data for one tutor. `{level}` in `role` and
/// `closing` is replaced with the learner's level.
#[derive(Debug, Clone, Copy)]
pub struct Tutor {
    pub specialist: Specialist,
    pub heading: &'static str,
    /// One-line description offered to the model router.
    pub purpose: &'static str,
    pub max_tokens: u32,
    role: &'static str,
    /// Label placed before the learner's message.
    label: &'static str,
    intro: &'static str,
    points: &'static [&'static str],
    closing: &'static str,
    /// Words or phrases that select this tutor. Matched on whole words; a
    /// trailing plural `s` in the message is ignored.
    triggers: &'static [&'static str],
}

pub const TUTORS: [Tutor; 8] = [
    Tutor {
        specialist: Specialist::MathSolver,
        heading: "Math Problem Solver",
        purpose: "For solving mathematical problems, equations, calculations",
        max_tokens: 800,
        role: "You are a mathematics tutor helping a {level} level student.",
        label: "Problem",
        intro: "Provide a complete solution with:",
        points: &[
            "Problem identification and what type of math this is",
            "Step-by-step solution with clear explanations",
            "Final answer highlighted",
            "Verification or check of the answer",
            "Similar problem types they might encounter",
            "Key concepts or formulas used",
        ],
        closing: "Make explanations appropriate for {level} level understanding.\n\
                  Use clear mathematical notation and reasoning.",
        triggers: &[
            "solve", "calculate", "simplify", "equation", "factor", "derivative", "integral",
            "quadratic",
        ],
    },
    Tutor {
        specialist: Specialist::ScienceExplainer,
        heading: "Science Concept Explainer",
        purpose: "For explaining physics, chemistry, biology concepts",
        max_tokens: 800,
        role: "You are a science tutor explaining concepts to a {level} level student.",
        label: "Question",
        intro: "Provide a comprehensive explanation including:",
        points: &[
            "Clear definition of the concept",
            "How it works or why it happens (mechanisms)",
            "Real-world examples and applications",
            "Visual descriptions or analogies to aid understanding",
            "Key terms and vocabulary",
            "Common misconceptions to avoid",
            "Related concepts they should know",
        ],
        closing: "Use language appropriate for {level} level and include practical examples.",
        triggers: &[
            "physics", "chemistry", "biology", "atom", "molecule", "photosynthesis", "gravity",
            "cell", "evolution", "chemical reaction",
        ],
    },
    Tutor {
        specialist: Specialist::CodingHelper,
        heading: "Coding Helper",
        purpose: "For programming questions, debugging, algorithms",
        max_tokens: 800,
        role: "You are a programming tutor helping a {level} level student with coding.",
        label: "Coding Question",
        intro: "Provide helpful guidance including:",
        points: &[
            "Problem analysis and approach",
            "Step-by-step solution strategy",
            "Code examples with explanations",
            "Best practices and coding conventions",
            "Common pitfalls to avoid",
            "Testing and debugging tips",
            "Alternative approaches or optimizations",
        ],
        closing: "Explain concepts clearly for {level} level programming understanding.\n\
                  Include comments in code examples.",
        triggers: &[
            "code", "coding", "programming", "python", "java", "javascript", "rust", "debug",
            "algorithm", "compile",
        ],
    },
    Tutor {
        specialist: Specialist::WritingAssistant,
        heading: "Writing Assistant",
        purpose: "For essay writing, composition, writing improvement",
        max_tokens: 800,
        role: "You are a writing tutor helping a {level} level student improve their writing.",
        label: "Writing Request",
        intro: "Provide comprehensive writing assistance including:",
        points: &[
            "Understanding the writing task or assignment",
            "Structure and organization suggestions",
            "Content development strategies",
            "Style and tone guidance",
            "Grammar and mechanics tips",
            "Revision and editing advice",
            "Examples of effective techniques",
        ],
        closing: "Tailor advice to {level} level writing skills and academic expectations.",
        triggers: &["essay", "thesis", "paragraph", "composition", "proofread", "outline"],
    },
    Tutor {
        specialist: Specialist::LiteratureAnalysis,
        heading: "Literature Analysis",
        purpose: "For analyzing poems, novels, literary works",
        max_tokens: 800,
        role: "You are a literature teacher helping a {level} level student analyze literary works.",
        label: "Literature Question",
        intro: "Provide thorough literary analysis including:",
        points: &[
            "Context and background of the work/author",
            "Theme identification and analysis",
            "Literary devices and techniques used",
            "Character analysis and development",
            "Symbolism and deeper meanings",
            "Historical and cultural significance",
            "Personal reflection and interpretation guidance",
        ],
        closing: "Make analysis accessible for {level} level literary understanding.",
        triggers: &[
            "poem", "poetry", "novel", "literature", "literary", "shakespeare", "symbolism",
            "metaphor",
        ],
    },
    Tutor {
        specialist: Specialist::HistoryTimeline,
        heading: "History Timeline & Analysis",
        purpose: "For historical events, chronology, historical analysis",
        max_tokens: 800,
        role: "You are a history teacher helping a {level} level student understand historical \
               events.",
        label: "History Question",
        intro: "Provide comprehensive historical information including:",
        points: &[
            "Timeline of key events",
            "Causes and effects",
            "Important figures and their roles",
            "Historical context and significance",
            "Connections to other historical events",
            "Primary sources or evidence",
            "Long-term impact and legacy",
        ],
        closing: "Present information clearly for {level} level historical understanding.",
        triggers: &[
            "history", "historical", "war", "revolution", "empire", "timeline", "ancient",
            "medieval", "century",
        ],
    },
    Tutor {
        specialist: Specialist::TestStrategy,
        heading: "Test Preparation Strategy",
        purpose: "For test preparation, exam strategies, study tips",
        max_tokens: 800,
        role: "You are a test prep specialist helping a {level} level student prepare for exams.",
        label: "Test Prep Question",
        intro: "Provide strategic test preparation guidance including:",
        points: &[
            "Test format and structure overview",
            "Study timeline and scheduling",
            "Content review strategies",
            "Practice test recommendations",
            "Test-taking techniques and tips",
            "Stress management and preparation",
            "Last-minute review strategies",
        ],
        closing: "Tailor advice to {level} level academic preparation needs.",
        triggers: &["exam", "test", "midterm", "final exam", "test prep", "cram"],
    },
    Tutor {
        specialist: Specialist::PracticeProblems,
        heading: "Practice Problems",
        purpose: "For generating practice questions and exercises",
        max_tokens: 800,
        role: "You are creating practice problems for a {level} level student.",
        label: "Subject/Topic Request",
        intro: "Create a set of practice problems including:",
        points: &[
            "3-5 problems of varying difficulty",
            "Clear instructions for each problem",
            "Answer key with explanations",
            "Tips for solving similar problems",
            "Common mistakes to avoid",
            "Extension questions for deeper thinking",
        ],
        closing: "Make problems appropriate for {level} level and educational.",
        triggers: &["practice", "exercise", "worksheet", "drill", "practice problem"],
    },
];

pub fn tutor(specialist: Specialist) -> &'static Tutor {
    match specialist {
        Specialist::MathSolver => &TUTORS[0],
        Specialist::ScienceExplainer => &TUTORS[1],
        Specialist::CodingHelper => &TUTORS[2],
        Specialist::WritingAssistant => &TUTORS[3],
        Specialist::LiteratureAnalysis => &TUTORS[4],
        Specialist::HistoryTimeline => &TUTORS[5],
        Specialist::TestStrategy => &TUTORS[6],
        Specialist::PracticeProblems => &TUTORS[7],
    }
}

/// Render the tutor prompt around the learner's message.
pub fn render(specialist: Specialist, profile: &Profile, message: &str) -> String {
    let tutor = tutor(specialist);
    let level = profile.level.as_str();

    let mut out = tutor.role.replace("{level}", level);
    out.push_str(&format!("\n\n{}: {}\n\n{}\n", tutor.label, message.trim(), tutor.intro));
    for (i, point) in tutor.points.iter().enumerate() {
        out.push_str(&format!("{}. {point}\n", i + 1));
    }
    out.push('\n');
    out.push_str(&tutor.closing.replace("{level}", level));
    out
}

/// Pick a tutor from the words of `message`.
///
/// The tutor with the most matching triggers wins; ties go to the tutor
/// listed first. `None` when nothing matches.
pub fn route_by_keywords(message: &str) -> Option<Specialist> {
    let words = words(message);
    let mut best: Option<(Specialist, usize)> = None;
    for tutor in &TUTORS {
        let score = tutor
            .triggers
            .iter()
            .filter(|trigger| contains_phrase(&words, trigger))
            .count();
        if score > 0 && best.is_none_or(|(_, top)| score > top) {
            best = Some((tutor.specialist, score));
        }
    }
    best.map(|(specialist, _)| specialist)
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn contains_phrase(words: &[String], phrase: &str) -> bool {
    let parts: Vec<&str> = phrase.split(' ').collect();
    words.windows(parts.len()).any(|window| {
        window
            .iter()
            .zip(&parts)
            .all(|(word, part)| word == part || word.strip_suffix('s') == Some(*part))
    })
}

/// The routing prompt: asks the model to name one tutor, or none, as JSON.
pub fn router_request(profile: &Profile, message: &str) -> Request {
    let mut prompt = format!(
        "Analyze this student query and determine if it requires a specialized learning \
         tool.\n\n\
         Query: \"{query}\"\n\
         Student Level: {level}\n\
         Preferred Subjects: {subjects}\n\n\
         Available tools:\n",
        query = message.trim(),
        level = profile.level,
        subjects = profile.subjects_label("none"),
    );
    for tutor in &TUTORS {
        prompt.push_str(&format!("- {}: {}\n", tutor.specialist, tutor.purpose));
    }
    prompt.push_str(
        "\nRespond with JSON in this format:\n\
         {\"tool\": \"tool_name or null\", \"reasoning\": \"explanation\"}\n\n\
         Only suggest a tool if the query clearly requires specialized functionality.\n\
         Return null for general conversation or broad educational questions.",
    );

    Request {
        segments: vec![Segment::user(prompt)],
        max_tokens: Some(ROUTER_MAX_TOKENS),
    }
}

#[derive(Deserialize)]
struct RouterVerdict {
    #[serde(default)]
    tool: Option<String>,
}

/// Read the router's choice. Anything unparseable, `null` or unknown is `None`.
pub fn parse_router_reply(text: &str) -> Option<Specialist> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    let verdict: RouterVerdict = serde_json::from_str(&text[start..=end]).ok()?;
    verdict.tool.as_deref().and_then(Specialist::from_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use studymate_core::profile::Level;

    #[test]
    fn lookup_matches_table() {
        for specialist in Specialist::ALL {
            assert_eq!(tutor(specialist).specialist, specialist);
        }
    }

    #[test]
    fn names_parse() {
        assert_eq!(Specialist::from_name("math_solver"), Some(Specialist::MathSolver));
        assert_eq!(Specialist::from_name(" History-Timeline "), Some(Specialist::HistoryTimeline));
        assert_eq!(Specialist::from_name("null"), None);
        assert_eq!(Specialist::from_name("music_theory"), None);
    }

    #[test]
    fn keyword_routing_picks_a_tutor() {
        let cases = [
            ("Can you solve 3x + 4 = 10?", Specialist::MathSolver),
            ("How does photosynthesis work?", Specialist::ScienceExplainer),
            ("My Python loop never ends, help me debug it", Specialist::CodingHelper),
            ("Help me with my essay introduction", Specialist::WritingAssistant),
            ("What does this poem say about death?", Specialist::LiteratureAnalysis),
            ("What caused the French Revolution?", Specialist::HistoryTimeline),
            ("How should I study for my midterm?", Specialist::TestStrategy),
            ("Give me some practice problems on fractions", Specialist::PracticeProblems),
        ];
        for (message, expected) in cases {
            assert_eq!(route_by_keywords(message), Some(expected), "{message}");
        }
    }

    #[test]
    fn general_questions_fall_through() {
        for message in ["What is a variable?", "hello", "Can you help me focus?", "software"] {
            assert_eq!(route_by_keywords(message), None, "{message}");
        }
    }

    #[test]
    fn triggers_match_whole_words_and_plurals() {
        // "war" must not fire inside "software"
        assert_eq!(route_by_keywords("which software should I use"), None);
        assert_eq!(route_by_keywords("Solve these equations"), Some(Specialist::MathSolver));
        assert_eq!(route_by_keywords("Tips for the final exam?"), Some(Specialist::TestStrategy));
    }

    #[test]
    fn highest_score_wins() {
        // practice + "practice problem" beat exam
        assert_eq!(
            route_by_keywords("practice problems for my algebra exam"),
            Some(Specialist::PracticeProblems)
        );
        // one trigger each: math is listed first
        assert_eq!(route_by_keywords("solve the history puzzle"), Some(Specialist::MathSolver));
    }

    #[test]
    fn render_includes_level_and_message() {
        let profile = Profile::new(["algebra"], Level::Beginner);
        let prompt = render(Specialist::MathSolver, &profile, "  Solve 2x = 8 ");
        assert!(prompt.starts_with("You are a mathematics tutor helping a beginner level student."));
        assert!(prompt.contains("Problem: Solve 2x = 8\n"));
        assert!(prompt.contains("3. Final answer highlighted"));
        assert!(prompt.ends_with("Use clear mathematical notation and reasoning."));
        assert!(!prompt.contains("{level}"));
    }

    #[test]
    fn router_prompt_lists_every_tutor() {
        let request = router_request(&Profile::default(), "What is DNA?");
        assert_eq!(request.max_tokens, Some(ROUTER_MAX_TOKENS));
        assert_eq!(request.segments.len(), 1);
        let text = &request.segments[0].text;
        assert!(text.contains("Query: \"What is DNA?\""));
        assert!(text.contains("Preferred Subjects: none"));
        for specialist in Specialist::ALL {
            assert!(text.contains(&format!("- {specialist}: ")));
        }
    }

    #[test]
    fn router_replies() {
        assert_eq!(
            parse_router_reply(r#"{"tool": "coding_helper", "reasoning": "about code"}"#),
            Some(Specialist::CodingHelper)
        );
        assert_eq!(
            parse_router_reply("Sure:\n```json\n{\"tool\": \"test_strategy\"}\n```"),
            Some(Specialist::TestStrategy)
        );
        assert_eq!(parse_router_reply(r#"{"tool": null, "reasoning": "general"}"#), None);
        assert_eq!(parse_router_reply(r#"{"tool": "art_analysis"}"#), None);
        assert_eq!(parse_router_reply("no json here"), None);
        assert_eq!(parse_router_reply("} backwards {"), None);
    }
}
