//! Quick tools: the four canned study prompts.
//!
//! [`dispatch`] maps an identifier to a [`ToolRequest`]; [`render`] turns a
//! request plus the learner profile into the prompt text sent as the user
//! message.

use studymate_core::error::{UnknownToolError, ValidationError};
use studymate_core::profile::Profile;
use studymate_core::tool::{ToolId, ToolRequest};

pub const PARAM_DURATION: &str = "duration";
pub const PARAM_SUBJECT: &str = "subject";
pub const PARAM_QUESTIONS: &str = "questions";
pub const PARAM_SUMMARY: &str = "summary";

const DEFAULT_DURATION: &str = "1 week";
const DEFAULT_QUESTIONS: u32 = 5;
const MAX_QUESTIONS: u32 = 20;
const NO_SUMMARY: &str = "No learning interactions recorded yet.";

/// Static facts about one quick tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickTool {
    pub id: ToolId,
    /// REPL shortcut, e.g. `/plan`.
    pub command: &'static str,
    pub description: &'static str,
    pub max_tokens: u32,
}

pub const QUICK_TOOLS: [QuickTool; 4] = [
    QuickTool {
        id: ToolId::StudyPlan,
        command: "/plan",
        description: "Build a study plan for your subjects",
        max_tokens: 800,
    },
    QuickTool {
        id: ToolId::Quiz,
        command: "/quiz",
        description: "Quiz yourself on one of your subjects",
        max_tokens: 600,
    },
    QuickTool {
        id: ToolId::ProgressReport,
        command: "/progress",
        description: "Get a progress report for this session",
        max_tokens: 600,
    },
    QuickTool {
        id: ToolId::StudyTechniques,
        command: "/tips",
        description: "Get study techniques for your level",
        max_tokens: 700,
    },
];

pub fn lookup(id: ToolId) -> &'static QuickTool {
    match id {
        ToolId::StudyPlan => &QUICK_TOOLS[0],
        ToolId::Quiz => &QUICK_TOOLS[1],
        ToolId::ProgressReport => &QUICK_TOOLS[2],
        ToolId::StudyTechniques => &QUICK_TOOLS[3],
    }
}

/// Resolve a tool identifier such as `"quiz"` or `"study-plan"`.
pub fn dispatch(tool_id: &str) -> Result<ToolRequest, UnknownToolError> {
    let id: ToolId = tool_id.parse()?;
    Ok(ToolRequest::new(id))
}

/// Title shown above a tool's reply.
pub fn heading(request: &ToolRequest) -> String {
    match request.tool_id {
        ToolId::StudyPlan => "Your Personalized Study Plan".into(),
        ToolId::Quiz => match request.param(PARAM_SUBJECT) {
            Some(subject) => format!("Quiz Time: {subject}"),
            None => "Quiz Time".into(),
        },
        ToolId::ProgressReport => "Your Learning Progress Report".into(),
        ToolId::StudyTechniques => "Personalized Study Techniques".into(),
    }
}

/// Render the prompt text for `request`.
///
/// Study plans and quizzes need at least one subject, from the profile or
/// (for quizzes) from the `subject` parameter.
pub fn render(request: &ToolRequest, profile: &Profile) -> Result<String, ValidationError> {
    let level = profile.level;
    match request.tool_id {
        ToolId::StudyPlan => {
            if !profile.has_subjects() {
                return Err(missing_subjects(request.tool_id));
            }
            let duration = request.param(PARAM_DURATION).unwrap_or(DEFAULT_DURATION);
            Ok(format!(
                "Create a comprehensive study plan covering {duration} for a {level} level \
                 student focusing on: {subjects}.\n\n\
                 Include:\n\
                 1. Daily study schedule with time allocations\n\
                 2. Subject rotation strategy\n\
                 3. Break times and study techniques\n\
                 4. Review sessions and practice recommendations\n\
                 5. Goal-setting frameworks\n\n\
                 Format as a clear, actionable schedule.",
                subjects = profile.subjects_label(""),
            ))
        }
        ToolId::Quiz => {
            let subject = request
                .param(PARAM_SUBJECT)
                .map(str::to_string)
                .or_else(|| profile.subjects.iter().next().cloned())
                .ok_or_else(|| missing_subjects(request.tool_id))?;
            let questions = question_count(request)?;
            Ok(format!(
                "Create a {level} level quiz on {subject} with {questions} multiple choice \
                 questions.\n\n\
                 Format:\n\
                 Question 1: [Question text]\n\
                 A) Option A\n\
                 B) Option B\n\
                 C) Option C\n\
                 D) Option D\n\n\
                 Include the correct answers at the end.\n\
                 Make questions educational and thought-provoking for {level} level students."
            ))
        }
        ToolId::ProgressReport => {
            let summary = request.param(PARAM_SUMMARY).unwrap_or(NO_SUMMARY);
            Ok(format!(
                "Based on this student's learning interaction history, create a progress \
                 report:\n\n\
                 Student Profile: subjects: {subjects}; level: {level}; goals: {goals}\n\
                 Recent Interactions Summary: {summary}\n\n\
                 Include:\n\
                 1. Learning strengths observed\n\
                 2. Areas for improvement\n\
                 3. Study pattern analysis\n\
                 4. Recommendations for continued growth\n\
                 5. Motivational insights\n\n\
                 Keep it encouraging and constructive.",
                subjects = profile.subjects_label("Not specified"),
                goals = profile.goals_label("Not specified"),
            ))
        }
        ToolId::StudyTechniques => Ok(format!(
            "Provide personalized study techniques and learning strategies for a {level} level \
             student studying: {subjects}.\n\n\
             Include:\n\
             1. Active learning techniques\n\
             2. Memory improvement strategies\n\
             3. Note-taking methods\n\
             4. Test preparation strategies\n\
             5. Time management tips\n\
             6. Subject-specific study approaches\n\n\
             Make recommendations practical and actionable.",
            subjects = profile.subjects_label("various subjects"),
        )),
    }
}

fn missing_subjects(id: ToolId) -> ValidationError {
    ValidationError::MissingSubjects {
        tool: id.to_string(),
    }
}

fn question_count(request: &ToolRequest) -> Result<u32, ValidationError> {
    let Some(raw) = request.param(PARAM_QUESTIONS) else {
        return Ok(DEFAULT_QUESTIONS);
    };
    match raw.trim().parse::<u32>() {
        Ok(n) if (1..=MAX_QUESTIONS).contains(&n) => Ok(n),
        _ => Err(ValidationError::InvalidParameter {
            name: PARAM_QUESTIONS.into(),
            reason: format!("expected a number from 1 to {MAX_QUESTIONS}, got {raw:?}"),
        }),
    }
}
