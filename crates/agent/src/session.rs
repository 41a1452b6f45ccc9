//! The study session: one learner, one conversation, one call at a time.
//!
//! A session owns its profile and memory. Every operation that talks to the
//! model takes `&mut self`, so a second call cannot start while one is in
//! flight. Memory only grows after a successful completion, and a failed
//! action is kept so the learner can resend it with [`StudySession::retry`].
//!
//! Free-form messages are first routed: a message that matches a specialised
//! tutor is wrapped in that tutor's template, anything else goes to the
//! general coach. Memory always records the text the learner typed.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use studymate_config::{AppConfig, RoutingMode};
use studymate_core::client::{ModelClient, Request, Usage};
use studymate_core::error::{Error, ProviderError, Result, ValidationError};
use studymate_core::profile::Profile;
use studymate_core::tool::{ToolId, ToolRequest};
use studymate_core::turn::SessionId;
use studymate_memory::{ConversationMemory, LearningInsights};
use tracing::{debug, info, warn};

use crate::prompt::PromptAssembler;
use crate::quick_tools::{self, PARAM_SUBJECT, PARAM_SUMMARY};
use crate::specialists::{self, Specialist};

/// Model and memory settings for a session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub model: String,
    pub temperature: f32,
    pub chat_max_tokens: u32,
    /// How many stored turns are sent with each request.
    pub window_turns: usize,
    pub timeout: Duration,
    pub routing: RoutingMode,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".into(),
            temperature: 0.7,
            chat_max_tokens: 1000,
            window_turns: 10,
            timeout: Duration::from_secs(60),
            routing: RoutingMode::Keywords,
        }
    }
}

impl SessionSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.effective_model().to_string(),
            temperature: config.default_temperature,
            chat_max_tokens: config.default_max_tokens,
            window_turns: config.memory.window_turns,
            timeout: Duration::from_secs(config.request_timeout_secs),
            routing: config.routing.mode,
        }
    }
}

/// A successful model reply.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    /// Display title for quick-tool and tutor replies.
    pub heading: Option<String>,
    pub model: String,
    pub usage: Option<Usage>,
}

/// The last action that failed, kept for an explicit retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Chat(String),
    /// `rotated` is set when the quiz subject was picked by rotation.
    Tool { request: ToolRequest, rotated: bool },
}

pub struct StudySession {
    id: SessionId,
    profile: Profile,
    memory: ConversationMemory,
    assembler: PromptAssembler,
    client: Arc<dyn ModelClient>,
    settings: SessionSettings,
    pending: Option<PendingAction>,
    quizzes_completed: usize,
}

impl StudySession {
    pub fn new(client: Arc<dyn ModelClient>, profile: Profile, settings: SessionSettings) -> Self {
        Self {
            id: SessionId::new(),
            profile,
            memory: ConversationMemory::new(),
            assembler: PromptAssembler::new(Some(settings.chat_max_tokens)),
            client,
            settings,
            pending: None,
            quizzes_completed: 0,
        }
    }

    /// Send a free-form message and record the exchange on success.
    pub async fn send(&mut self, text: &str) -> Result<Reply> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }

        let specialist = self.route(text).await;
        let window = self.memory.recent(self.settings.window_turns);
        let request = match specialist {
            Some(specialist) => {
                info!(session = %self.id, tutor = %specialist, "Routing to specialised tutor");
                self.assembler
                    .build_for_specialist(&self.profile, specialist, window, text)?
            }
            None => self.assembler.build(&self.profile, window, text)?,
        };

        match self.complete(request).await {
            Ok(mut reply) => {
                self.memory.record_exchange(text, reply.text.as_str())?;
                self.pending = None;
                reply.heading = specialist.map(|s| specialists::tutor(s).heading.to_string());
                Ok(reply)
            }
            Err(e) => {
                self.pending = Some(PendingAction::Chat(text.to_string()));
                Err(e)
            }
        }
    }

    /// Run a quick tool by identifier (`"quiz"`, `"study-plan"`, ...).
    pub async fn run_tool_id(&mut self, tool_id: &str) -> Result<Reply> {
        let request = quick_tools::dispatch(tool_id)?;
        self.run_tool(request).await
    }

    /// Run a quick tool. The rendered template is recorded as the user turn,
    /// tagged with the tool so learning insights skip it.
    pub async fn run_tool(&mut self, request: ToolRequest) -> Result<Reply> {
        let (request, rotated) = self.fill_parameters(request);
        self.execute_tool(request, rotated).await
    }

    async fn execute_tool(&mut self, request: ToolRequest, rotated: bool) -> Result<Reply> {
        let prepared = self.assembler.build_for_tool(
            &self.profile,
            &request,
            self.memory.recent(self.settings.window_turns),
        )?;
        let prompt_text = prepared.last_user_text().unwrap_or_default().to_string();
        let heading = quick_tools::heading(&request);

        info!(session = %self.id, tool = %request.tool_id, "Running quick tool");

        match self.complete(prepared).await {
            Ok(mut reply) => {
                self.memory
                    .record_tool_exchange(request.tool_id, prompt_text, reply.text.as_str())?;
                self.pending = None;
                if rotated {
                    self.quizzes_completed += 1;
                }
                reply.heading = Some(heading);
                Ok(reply)
            }
            Err(e) => {
                self.pending = Some(PendingAction::Tool { request, rotated });
                Err(e)
            }
        }
    }

    /// Resend the last failed action.
    pub async fn retry(&mut self) -> Result<Reply> {
        match self.pending.take() {
            Some(PendingAction::Chat(text)) => self.send(&text).await,
            Some(PendingAction::Tool { request, rotated }) => {
                self.execute_tool(request, rotated).await
            }
            None => Err(Error::NothingToRetry),
        }
    }

    /// Forget the conversation and any pending retry. The profile is kept.
    pub fn reset(&mut self) {
        info!(session = %self.id, turns = self.memory.len(), "Resetting session");
        self.memory.clear();
        self.pending = None;
        self.quizzes_completed = 0;
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = profile;
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn client_name(&self) -> &str {
        self.client.name()
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn insights(&self) -> LearningInsights {
        LearningInsights::from_turns(self.memory.turns())
    }

    pub fn subject_statistics(&self) -> BTreeMap<&'static str, usize> {
        self.insights().subject_statistics()
    }

    /// Fill in parameters that come from session state rather than the user.
    ///
    /// The flag is set when the quiz subject was taken from the rotation; the
    /// rotation only advances once that quiz succeeds.
    fn fill_parameters(&self, mut request: ToolRequest) -> (ToolRequest, bool) {
        let mut rotated = false;
        match request.tool_id {
            ToolId::Quiz if !request.has_param(PARAM_SUBJECT) && self.profile.has_subjects() => {
                let index = self.quizzes_completed % self.profile.subjects.len();
                if let Some(subject) = self.profile.subjects.iter().nth(index) {
                    request = request.with_param(PARAM_SUBJECT, subject.clone());
                    rotated = true;
                }
            }
            ToolId::ProgressReport if !request.has_param(PARAM_SUMMARY) => {
                request = request.with_param(PARAM_SUMMARY, self.insights().summary());
            }
            _ => {}
        }
        (request, rotated)
    }

    /// Choose a specialised tutor for `text`, if any.
    ///
    /// In model mode a failed or unreadable routing reply falls back to the
    /// general coach; it never fails the message.
    async fn route(&self, text: &str) -> Option<Specialist> {
        match self.settings.routing {
            RoutingMode::Off => None,
            RoutingMode::Keywords => specialists::route_by_keywords(text),
            RoutingMode::Model => {
                let request = specialists::router_request(&self.profile, text);
                match self.complete(request).await {
                    Ok(reply) => {
                        let choice = specialists::parse_router_reply(&reply.text);
                        debug!(session = %self.id, tutor = ?choice, "Router replied");
                        choice
                    }
                    Err(e) => {
                        debug!(session = %self.id, error = %e, "Routing failed, using general coach");
                        None
                    }
                }
            }
        }
    }

    /// One round trip under the session timeout.
    async fn complete(&self, request: Request) -> Result<Reply> {
        let estimated_tokens = request.estimated_tokens();
        let segments = request.segments.len();
        let provider_request = request.into_provider_request(
            self.settings.model.clone(),
            self.settings.temperature,
            Some(self.settings.chat_max_tokens),
        );

        debug!(
            session = %self.id,
            client = %self.client.name(),
            segments,
            estimated_tokens,
            "Sending request"
        );

        let started = Instant::now();
        let outcome = tokio::time::timeout(
            self.settings.timeout,
            self.client.complete(provider_request),
        )
        .await;

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(session = %self.id, error = %e, "Model call failed");
                return Err(e.into());
            }
            Err(_) => {
                let secs = self.settings.timeout.as_secs();
                warn!(session = %self.id, timeout_secs = secs, "Model call timed out");
                return Err(ProviderError::Timeout(secs).into());
            }
        };

        if response.text.trim().is_empty() {
            warn!(session = %self.id, "Model returned an empty completion");
            return Err(ProviderError::EmptyCompletion.into());
        }

        info!(
            session = %self.id,
            model = %response.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            total_tokens = response.usage.map(|u| u.total_tokens),
            "Reply received"
        );

        Ok(Reply {
            text: response.text,
            heading: None,
            model: response.model,
            usage: response.usage,
        })
    }
}
