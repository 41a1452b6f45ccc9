//! Learning insights derived from the learner's turns.
//!
//! Only messages the learner typed count. Rendered quick-tool templates are
//! stored as user turns too, but they say nothing about what the learner
//! asked, so they are skipped. Everything here is recomputed from the turn log on demand; nothing is
//! cached between calls, so the output for a given log is always the same.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use studymate_core::profile::Level;
use studymate_core::turn::Turn;

/// Topics are reported at most this many per message.
const MAX_TOPICS: usize = 3;

/// Interactions considered for the learning-context line.
const CONTEXT_INTERACTIONS: usize = 5;

/// Interactions kept for question-kind and difficulty history.
const HISTORY_INTERACTIONS: usize = 10;

const TOPIC_KEYWORDS: &[&str] = &[
    // math
    "equation", "algebra", "geometry", "calculus", "trigonometry", "statistics",
    "probability", "derivative", "integral", "formula",
    // science
    "physics", "chemistry", "biology", "atom", "molecule", "cell", "force", "energy",
    "reaction", "evolution",
    // language
    "grammar", "essay", "writing", "literature", "poem", "analysis", "thesis",
    "paragraph", "vocabulary",
    // history
    "war", "revolution", "empire", "civilization", "timeline", "ancient", "medieval",
    "modern", "century",
];

const ADVANCED_INDICATORS: &[&str] = &[
    "advanced", "complex", "analyze", "evaluate", "synthesize", "derivative", "integral",
    "quantum", "molecular", "theorem",
];

const BASIC_INDICATORS: &[&str] = &[
    "what is", "how to", "explain", "simple", "basic", "introduction",
];

const SUBJECT_KEYWORDS: &[(&str, &[&str])] = &[
    ("Mathematics", &["math", "algebra", "geometry", "calculus", "equation", "formula", "solve"]),
    ("Physics", &["physics", "force", "energy", "momentum", "wave", "electricity", "magnetism"]),
    ("Chemistry", &["chemistry", "atom", "molecule", "reaction", "compound", "element"]),
    ("Biology", &["biology", "cell", "dna", "evolution", "organism", "genetics", "anatomy"]),
    ("Computer Science", &["programming", "code", "algorithm", "software", "computer", "python", "java"]),
    ("English", &["essay", "writing", "grammar", "literature", "poem", "analysis", "thesis"]),
    ("History", &["history", "war", "empire", "revolution", "ancient", "medieval", "timeline"]),
    ("Geography", &["geography", "map", "climate", "country", "continent", "ocean", "mountain"]),
    ("Art", &["art", "painting", "sculpture", "artist", "museum", "drawing", "design"]),
    ("Music", &["music", "note", "chord", "rhythm", "melody", "instrument", "composer"]),
];

pub const GENERAL_SUBJECT: &str = "General";

/// What kind of help a message asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    ProblemSolving,
    Conceptual,
    Analytical,
    Assistance,
    General,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProblemSolving => "problem_solving",
            Self::Conceptual => "conceptual",
            Self::Analytical => "analytical",
            Self::Assistance => "assistance",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of recent question difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        })
    }
}

/// Keyword topics mentioned in `text`, in keyword-table order.
pub fn extract_topics(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .copied()
        .filter(|k| lower.contains(k))
        .take(MAX_TOPICS)
        .collect()
}

pub fn estimate_difficulty(text: &str) -> Level {
    let lower = text.to_lowercase();
    let advanced = count_matches(&lower, ADVANCED_INDICATORS);
    let basic = count_matches(&lower, BASIC_INDICATORS);

    if advanced > basic {
        Level::Advanced
    } else if basic > 0 {
        Level::Beginner
    } else {
        Level::Intermediate
    }
}

/// The best-matching subject, or [`GENERAL_SUBJECT`].
///
/// Ties go to the subject listed first.
pub fn identify_subject(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    let mut best: Option<(&'static str, usize)> = None;
    for &(subject, keywords) in SUBJECT_KEYWORDS {
        let score = count_matches(&lower, keywords);
        if score > 0 && best.is_none_or(|(_, top)| score > top) {
            best = Some((subject, score));
        }
    }
    best.map(|(subject, _)| subject).unwrap_or(GENERAL_SUBJECT)
}

pub fn classify_question(text: &str) -> QuestionKind {
    let lower = text.to_lowercase();
    let any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if any(&["solve", "calculate", "find", "compute"]) {
        QuestionKind::ProblemSolving
    } else if any(&["explain", "what is", "how does", "why"]) {
        QuestionKind::Conceptual
    } else if any(&["analyze", "compare", "evaluate", "discuss"]) {
        QuestionKind::Analytical
    } else if any(&["help", "check", "review", "feedback"]) {
        QuestionKind::Assistance
    } else {
        QuestionKind::General
    }
}

/// Compare the first and last of the three most recent levels.
///
/// `None` until at least three levels are known.
pub fn difficulty_trend(levels: &[Level]) -> Option<Trend> {
    if levels.len() < 3 {
        return None;
    }
    let recent = &levels[levels.len() - 3..];
    let (first, last) = (recent[0].rank(), recent[2].rank());
    Some(match last.cmp(&first) {
        std::cmp::Ordering::Greater => Trend::Increasing,
        std::cmp::Ordering::Less => Trend::Decreasing,
        std::cmp::Ordering::Equal => Trend::Stable,
    })
}

pub fn format_duration(total_secs: i64) -> String {
    let secs = total_secs.max(0);
    if secs < 60 {
        format!("{secs} seconds")
    } else if secs < 3600 {
        format!("{} minutes", secs / 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

fn count_matches(lower: &str, needles: &[&str]) -> usize {
    needles.iter().filter(|n| lower.contains(*n)).count()
}

/// One analysed learner message.
#[derive(Debug, Clone, Serialize)]
pub struct Interaction {
    pub at: DateTime<Utc>,
    pub topics: Vec<&'static str>,
    pub difficulty: Level,
    pub subject: &'static str,
    pub kind: QuestionKind,
}

impl Interaction {
    pub fn analyse(turn: &Turn) -> Self {
        let text = turn.text();
        Self {
            at: turn.created_at(),
            topics: extract_topics(text),
            difficulty: estimate_difficulty(text),
            subject: identify_subject(text),
            kind: classify_question(text),
        }
    }
}

/// Analysis of every user turn in a conversation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LearningInsights {
    interactions: Vec<Interaction>,
}

impl LearningInsights {
    /// Analyse the learner messages among `turns`. Assistant turns and
    /// quick-tool turns are skipped.
    pub fn from_turns<'a, I>(turns: I) -> Self
    where
        I: IntoIterator<Item = &'a Turn>,
    {
        let interactions = turns
            .into_iter()
            .filter(|t| t.is_learner_message())
            .map(Interaction::analyse)
            .collect();
        Self { interactions }
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    fn history(&self) -> &[Interaction] {
        tail(&self.interactions, HISTORY_INTERACTIONS)
    }

    pub fn trend(&self) -> Option<Trend> {
        let levels: Vec<Level> = self.history().iter().map(|i| i.difficulty).collect();
        difficulty_trend(&levels)
    }

    /// Distinct question kinds from recent history, first occurrence first.
    pub fn preferred_kinds(&self) -> Vec<QuestionKind> {
        dedup(self.history().iter().map(|i| i.kind))
    }

    /// A one-line description of the learner's recent activity.
    ///
    /// `None` when there are no learner messages yet.
    pub fn learning_context(&self) -> Option<String> {
        let recent = tail(&self.interactions, CONTEXT_INTERACTIONS);
        if recent.is_empty() {
            return None;
        }

        let mut parts = Vec::new();

        let topics = dedup(recent.iter().flat_map(|i| i.topics.iter().copied()));
        if !topics.is_empty() {
            parts.push(format!("Recent topics: {}", topics.join(", ")));
        }

        if let Some(subject) = most_common(recent.iter().map(|i| i.subject)) {
            parts.push(format!("Primary subject focus: {subject}"));
        }

        let kinds: Vec<&str> = self.preferred_kinds().iter().map(|k| k.as_str()).collect();
        if !kinds.is_empty() {
            parts.push(format!("Student prefers: {}", kinds.join(", ")));
        }

        if let Some(trend) = self.trend() {
            parts.push(format!("Difficulty progression: {trend}"));
        }

        Some(parts.join("; "))
    }

    /// Session summary used by progress reports.
    pub fn summary(&self) -> String {
        let (Some(first), Some(last)) = (self.interactions.first(), self.interactions.last())
        else {
            return "No learning interactions recorded yet.".into();
        };

        let unique_topics = dedup(self.interactions.iter().flat_map(|i| i.topics.iter().copied()));
        let duration = (last.at - first.at).num_seconds();
        let subject = most_common(self.interactions.iter().map(|i| i.subject)).unwrap_or("Various");

        [
            format!("Total interactions: {}", self.interactions.len()),
            format!("Session duration: {}", format_duration(duration)),
            format!("Topics explored: {} unique topics", unique_topics.len()),
            format!("Most discussed subject: {subject}"),
            format!("Recent difficulty level: {}", last.difficulty),
        ]
        .join("; ")
    }

    /// Message count per identified subject.
    pub fn subject_statistics(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for interaction in &self.interactions {
            *counts.entry(interaction.subject).or_insert(0) += 1;
        }
        counts
    }
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

fn dedup<T: PartialEq>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Highest count wins; ties go to whichever appeared first.
fn most_common<'a>(items: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(name, _)| *name == item) {
            Some((_, n)) => *n += 1,
            None => counts.push((item, 1)),
        }
    }
    let mut best: Option<(&str, usize)> = None;
    for (name, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((name, n));
        }
    }
    best.map(|(name, _)| name)
}
