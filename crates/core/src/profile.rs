//! Learner profile: subjects, level and goals.
//!
//! Read on every prompt assembly, never mutated by it.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Self-declared learning level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Ordinal used for trend comparisons (beginner = 1).
    pub fn rank(&self) -> u8 {
        match self {
            Self::Beginner => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(ValidationError::UnknownLevel(other.to_string())),
        }
    }
}

/// The learner's declared subjects, level and study goals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Subjects of interest. Ordered so prompts are deterministic.
    #[serde(default, deserialize_with = "deserialize_names")]
    pub subjects: BTreeSet<String>,

    #[serde(default)]
    pub level: Level,

    /// Free-form study goals.
    #[serde(
        default,
        deserialize_with = "deserialize_names",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub goals: Vec<String>,
}

impl Profile {
    pub fn new<I, S>(subjects: I, level: Level) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut profile = Self {
            level,
            ..Self::default()
        };
        profile.set_subjects(subjects);
        profile
    }

    pub fn with_goals<I, S>(mut self, goals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_goals(goals);
        self
    }

    /// Replace the subject set. Names are trimmed; blank names are dropped.
    pub fn set_subjects<I, S>(&mut self, subjects: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subjects = normalize_names(subjects);
    }

    pub fn set_goals<I, S>(&mut self, goals: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.goals = normalize_names(goals);
    }

    pub fn has_subjects(&self) -> bool {
        !self.subjects.is_empty()
    }

    /// Comma-joined subjects, or `fallback` when none are set.
    pub fn subjects_label(&self, fallback: &str) -> String {
        if self.subjects.is_empty() {
            fallback.to_string()
        } else {
            self.subjects.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    }

    /// Comma-joined goals, or `fallback` when none are set.
    pub fn goals_label(&self, fallback: &str) -> String {
        if self.goals.is_empty() {
            fallback.to_string()
        } else {
            self.goals.join(", ")
        }
    }
}

/// Trim every name and drop the blank ones.
fn normalize_names<I, S, C>(names: I) -> C
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    C: FromIterator<String>,
{
    names
        .into_iter()
        .map(|s| s.into().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Profiles read from config files follow the same rule as the setters.
fn deserialize_names<'de, D, C>(deserializer: D) -> Result<C, D::Error>
where
    D: Deserializer<'de>,
    C: FromIterator<String>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(normalize_names(raw))
}

/// Split a comma-separated list as typed by a user (`"algebra, physics"`).
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
