//! End-to-end integration tests for the StudyMate study session.
//!
//! These tests exercise the full pipeline from learner input to recorded
//! conversation: profile, prompt assembly, quick tools, the model client
//! contract and conversation memory.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use studymate_agent::{PromptAssembler, SessionSettings, StudySession, dispatch};
use studymate_config::{AppConfig, RoutingMode};
use studymate_core::client::{ModelClient, ProviderRequest, ProviderResponse, Usage};
use studymate_core::error::{Error, ProviderError, ValidationError};
use studymate_core::{Level, Profile, Role, ToolId, UnknownToolError};
use studymate_memory::ConversationMemory;

// ── Mock Client ──────────────────────────────────────────────────────────

/// A mock client that returns scripted outcomes in sequence.
struct ScriptedClient {
    outcomes: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
    seen: Mutex<Vec<ProviderRequest>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    fn new(outcomes: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            seen: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    fn replies(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(text_response(t))).collect())
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    fn seen(&self) -> Vec<ProviderRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ModelClient for ScriptedClient {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let call = self.calls();
        let outcome = {
            let outcomes = self.outcomes.lock().unwrap();
            if call >= outcomes.len() {
                panic!("ScriptedClient exhausted: call #{call}, have {}", outcomes.len());
            }
            outcomes[call].clone()
        };
        self.seen.lock().unwrap().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}

fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        text: text.to_string(),
        model: "mock".into(),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}

fn algebra_beginner() -> Profile {
    Profile::new(["algebra"], Level::Beginner)
}

fn session_with(client: Arc<ScriptedClient>, profile: Profile) -> StudySession {
    StudySession::new(client, profile, SessionSettings::default())
}

// ── E2E: Chat ────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_algebra_beginner_first_question() {
    let client = Arc::new(ScriptedClient::replies(&["A variable is a symbol for a number."]));
    let mut session = session_with(client.clone(), algebra_beginner());

    let reply = session.send("What is a variable?").await.unwrap();
    assert_eq!(reply.text, "A variable is a symbol for a number.");

    let sent = client.seen();
    assert_eq!(sent.len(), 1);
    let segments = &sent[0].segments;
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].role, Role::System);
    assert!(segments[0].text.contains("algebra"));
    assert!(segments[0].text.contains("beginner"));
    assert_eq!(segments[1].role, Role::User);
    assert_eq!(segments[1].text, "What is a variable?");

    let turns = session.memory().turns();
    assert_eq!(turns.len(), 2);
    assert_eq!((turns[0].role(), turns[0].text()), (Role::User, "What is a variable?"));
    assert_eq!(
        (turns[1].role(), turns[1].text()),
        (Role::Assistant, "A variable is a symbol for a number.")
    );
}

#[tokio::test]
async fn e2e_n_turns_and_recent_windows() {
    let client = Arc::new(ScriptedClient::replies(&["a0", "a1", "a2", "a3", "a4"]));
    let mut session = session_with(client, algebra_beginner());
    for i in 0..5 {
        session.send(&format!("q{i}")).await.unwrap();
    }

    let memory = session.memory();
    assert_eq!(memory.len(), 10);
    let all: Vec<&str> = memory.turns().iter().map(|t| t.text()).collect();
    for k in 0..=memory.len() {
        let window: Vec<&str> = memory.recent(k).iter().map(|t| t.text()).collect();
        assert_eq!(window, all[all.len() - k..]);
    }
}

#[tokio::test]
async fn e2e_history_is_sent_in_order() {
    let client = Arc::new(ScriptedClient::replies(&["It's x.", "Yes, 2x + 1 = 7 gives x = 3."]));
    let mut session = session_with(client.clone(), algebra_beginner());

    session.send("What is the unknown in 2x + 1 = 7?").await.unwrap();
    session.send("So what is x?").await.unwrap();

    let second = &client.seen()[1];
    let texts: Vec<(Role, &str)> = second
        .segments
        .iter()
        .skip(1)
        .map(|s| (s.role, s.text.as_str()))
        .collect();
    assert_eq!(
        texts,
        [
            (Role::User, "What is the unknown in 2x + 1 = 7?"),
            (Role::Assistant, "It's x."),
            (Role::User, "So what is x?"),
        ]
    );
    assert!(second.segments[0].text.contains("Learning Context"));
}

#[tokio::test]
async fn e2e_subject_question_goes_to_tutor_and_back() {
    let client = Arc::new(ScriptedClient::replies(&["Subtract 1, then halve.", "Sure."]));
    let mut session = session_with(client.clone(), algebra_beginner());

    let reply = session.send("Can you solve 2x + 1 = 7?").await.unwrap();
    assert_eq!(reply.heading.as_deref(), Some("Math Problem Solver"));
    session.send("Thanks, that helps").await.unwrap();

    let seen = client.seen();
    let routed = seen[0].segments.last().unwrap();
    assert!(routed.text.contains("Problem: Can you solve 2x + 1 = 7?"));
    assert_eq!(seen[0].max_tokens, Some(800));
    // memory keeps the learner's words, not the tutor template
    assert_eq!(seen[1].segments[1].text, "Can you solve 2x + 1 = 7?");
    assert_eq!(seen[1].segments.last().unwrap().text, "Thanks, that helps");
}

#[test]
fn e2e_build_is_deterministic() {
    let mut memory = ConversationMemory::new();
    memory.record_exchange("Explain slopes", "Rise over run.").unwrap();
    memory.record_exchange("And intercepts?", "Where the line crosses an axis.").unwrap();

    let assembler = PromptAssembler::new(Some(1000));
    let profile = algebra_beginner().with_goals(["ace the final"]);
    let a = assembler.build(&profile, memory.recent(10), "Give me a practice problem").unwrap();
    let b = assembler.build(&profile, memory.recent(10), "Give me a practice problem").unwrap();
    assert_eq!(a, b);
}

#[test]
fn e2e_clear_empties_memory() {
    let mut memory = ConversationMemory::new();
    memory.record_exchange("q", "a").unwrap();
    memory.clear();
    for k in [0, 1, 2, 50] {
        assert!(memory.recent(k).is_empty());
    }
}

// ── E2E: Failures and retry ──────────────────────────────────────────────

#[tokio::test]
async fn e2e_failed_call_never_grows_memory() {
    let failures = vec![
        ProviderError::Network("connection refused".into()),
        ProviderError::AuthenticationFailed("bad key".into()),
        ProviderError::QuotaExceeded("insufficient_quota".into()),
        ProviderError::RateLimited { retry_after_secs: 3 },
        ProviderError::ApiError {
            status_code: 500,
            message: "boom".into(),
        },
    ];
    let mut outcomes = vec![Ok(text_response("first answer"))];
    outcomes.extend(failures.into_iter().map(Err));
    let client = Arc::new(ScriptedClient::new(outcomes));
    let mut session = session_with(client, algebra_beginner());

    session.send("What is a variable?").await.unwrap();
    for _ in 0..5 {
        assert!(session.send("Another question").await.is_err());
        assert_eq!(session.memory().len(), 2);
    }
}

#[tokio::test]
async fn e2e_retry_records_exactly_one_exchange() {
    let client = Arc::new(ScriptedClient::new(vec![
        Err(ProviderError::Timeout(60)),
        Err(ProviderError::Network("reset".into())),
        Ok(text_response("Here is the answer.")),
    ]));
    let mut session = session_with(client.clone(), algebra_beginner());

    assert!(session.send("What is a variable?").await.is_err());
    assert!(session.retry().await.is_err());
    let reply = session.retry().await.unwrap();
    assert_eq!(reply.text, "Here is the answer.");

    assert_eq!(session.memory().len(), 2);
    assert_eq!(client.calls(), 3);
    assert!(matches!(session.retry().await, Err(Error::NothingToRetry)));
}

#[tokio::test(start_paused = true)]
async fn e2e_timeout_maps_to_provider_timeout() {
    let mut client = ScriptedClient::replies(&["never seen"]);
    client.delay = Some(Duration::from_secs(600));
    let mut session = StudySession::new(
        Arc::new(client),
        algebra_beginner(),
        SessionSettings {
            timeout: Duration::from_secs(30),
            ..SessionSettings::default()
        },
    );

    let err = session.send("Are you there?").await.unwrap_err();
    assert!(matches!(err, Error::Provider(ProviderError::Timeout(30))));
    assert!(err.is_retryable());
    assert!(session.memory().is_empty());
}

#[tokio::test]
async fn e2e_empty_message_is_rejected_without_a_call() {
    let client = Arc::new(ScriptedClient::new(vec![]));
    let mut session = session_with(client.clone(), algebra_beginner());
    let err = session.send("  \n").await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::EmptyMessage)));
    assert_eq!(client.calls(), 0);
}

// ── E2E: Quick tools ─────────────────────────────────────────────────────

#[test]
fn e2e_dispatch() {
    assert_eq!(dispatch("quiz").unwrap().tool_id, ToolId::Quiz);
    assert_eq!(dispatch("unknown").unwrap_err(), UnknownToolError("unknown".into()));
}

#[tokio::test]
async fn e2e_each_tool_records_template_and_reply() {
    let client = Arc::new(ScriptedClient::replies(&["plan", "quiz", "report", "tips"]));
    let mut session = session_with(client.clone(), algebra_beginner());

    for id in ["study_plan", "quiz", "progress_report", "study_techniques"] {
        let reply = session.run_tool_id(id).await.unwrap();
        assert!(reply.heading.is_some());
    }

    let turns = session.memory().turns();
    assert_eq!(turns.len(), 8);
    let max_tokens: Vec<Option<u32>> = client.seen().iter().map(|r| r.max_tokens).collect();
    assert_eq!(max_tokens, [Some(800), Some(600), Some(600), Some(700)]);

    assert!(turns[0].text().contains("study plan"));
    assert_eq!(turns[1].text(), "plan");
    assert!(turns[2].text().contains("quiz on algebra"));
    // tool templates are not learner messages
    assert!(turns[4].text().contains("No learning interactions recorded yet."));
    assert!(turns.iter().all(|t| t.tool().is_some()));
    assert!(turns[6].text().contains("beginner level student studying: algebra"));
}

#[tokio::test]
async fn e2e_tool_window_matches_chat_window() {
    let client = Arc::new(ScriptedClient::replies(&["answer", "chat", "tips"]));
    let mut session = session_with(client.clone(), algebra_beginner());
    session.send("What is a variable?").await.unwrap();

    let snapshot = session.memory().recent(session.settings().window_turns).to_vec();
    let assembler = PromptAssembler::new(Some(1000));
    let chat = assembler.build(session.profile(), &snapshot, "x").unwrap();

    session.run_tool_id("study_techniques").await.unwrap();
    let tool = &client.seen()[1];
    assert_eq!(tool.segments[..chat.segments.len() - 1], chat.segments[..chat.segments.len() - 1]);
}

#[tokio::test]
async fn e2e_plan_without_subjects_is_a_validation_error() {
    let client = Arc::new(ScriptedClient::new(vec![]));
    let mut session = session_with(client.clone(), Profile::default());
    let err = session.run_tool_id("study-plan").await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::MissingSubjects { .. })));
    assert_eq!(client.calls(), 0);
    assert!(session.memory().is_empty());
}

#[tokio::test]
async fn e2e_reset_keeps_profile() {
    let client = Arc::new(ScriptedClient::replies(&["one", "two"]));
    let mut session = session_with(client, algebra_beginner());
    session.send("first").await.unwrap();
    session.reset();
    assert!(session.memory().is_empty());
    session.send("second").await.unwrap();
    assert_eq!(session.memory().len(), 2);
    assert_eq!(session.profile(), &algebra_beginner());
}

// ── E2E: Configuration ───────────────────────────────────────────────────

#[test]
fn e2e_config_file_drives_session_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
default_model = "gpt-4o-mini"
request_timeout_secs = 15

[memory]
window_turns = 4

[routing]
mode = "off"

[profile]
subjects = ["algebra", " geometry ", ""]
level = "beginner"
goals = ["pass the midterm"]
"#,
    )
    .unwrap();

    let config = AppConfig::load_from(&path).unwrap();
    let settings = SessionSettings::from_config(&config);
    assert_eq!(settings.model, "gpt-4o-mini");
    assert_eq!(settings.window_turns, 4);
    assert_eq!(settings.timeout, Duration::from_secs(15));
    assert_eq!(config.profile.level, Level::Beginner);
    let subjects: Vec<&str> = config.profile.subjects.iter().map(String::as_str).collect();
    assert_eq!(subjects, ["algebra", "geometry"]);
    assert_eq!(settings.routing, RoutingMode::Off);
}

#[test]
fn e2e_router_builds_default_client() {
    let config = AppConfig {
        api_key: Some("sk-test".into()),
        ..AppConfig::default()
    };
    let router = studymate_providers::build_from_config(&config);
    assert_eq!(router.default().unwrap().name(), "openai");
}
