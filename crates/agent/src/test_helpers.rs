//! Shared test helpers for session tests.

use std::sync::Mutex;
use std::time::Duration;

use studymate_core::client::{ModelClient, ProviderRequest, ProviderResponse, Usage};
use studymate_core::error::ProviderError;

type Scripted = Result<ProviderResponse, ProviderError>;

/// A model client that replays a script of outcomes.
///
/// Each call to `complete` returns the next outcome in the queue and keeps a
/// copy of the request. Panics if more calls are made than outcomes provided.
pub struct ScriptedClient {
    outcomes: Mutex<Vec<Scripted>>,
    requests: Mutex<Vec<ProviderRequest>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn new(outcomes: Vec<Scripted>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleep before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ModelClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let outcome = {
            let call = self.call_count();
            let outcomes = self.outcomes.lock().unwrap();
            assert!(
                call < outcomes.len(),
                "ScriptedClient: no more outcomes (call #{call}, have {})",
                outcomes.len()
            );
            outcomes[call].clone()
        };
        self.requests.lock().unwrap().push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}

/// A successful reply with fixed usage numbers.
pub fn ok(text: &str) -> Scripted {
    Ok(ProviderResponse {
        text: text.to_string(),
        model: "mock-model".into(),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    })
}

pub fn fail(error: ProviderError) -> Scripted {
    Err(error)
}
