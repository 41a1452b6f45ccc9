//! Quick tool identifiers and requests.
//!
//! A quick tool is a predefined prompt template invoked without free-form
//! text. The set is closed; the templates live in the agent crate.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolId {
    StudyPlan,
    Quiz,
    ProgressReport,
    StudyTechniques,
}

impl ToolId {
    pub const ALL: [ToolId; 4] = [
        ToolId::StudyPlan,
        ToolId::Quiz,
        ToolId::ProgressReport,
        ToolId::StudyTechniques,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StudyPlan => "study_plan",
            Self::Quiz => "quiz",
            Self::ProgressReport => "progress_report",
            Self::StudyTechniques => "study_techniques",
        }
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolId {
    type Err = UnknownToolError;

    /// Accepts `study_plan`, `Study-Plan` and similar spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| UnknownToolError(s.to_string()))
    }
}

/// A quick tool invocation. Transient: built per call, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRequest {
    pub tool_id: ToolId,

    /// Template options (e.g. `subject`, `questions`).
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl ToolRequest {
    pub fn new(tool_id: ToolId) -> Self {
        Self {
            tool_id,
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }
}
