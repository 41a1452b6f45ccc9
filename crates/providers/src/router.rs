//! Client router: selects the LLM client based on config.
//!
//! Handles client creation and lookup by provider name.

use std::collections::HashMap;
use std::sync::Arc;

use studymate_config::AppConfig;
use studymate_core::client::ModelClient;

use crate::openai_compat::OpenAiCompatClient;

/// Holds the configured clients, keyed by provider name.
pub struct ClientRouter {
    clients: HashMap<String, Arc<dyn ModelClient>>,
    default_provider: String,
}

impl ClientRouter {
    /// Create a new router with a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            clients: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a client.
    pub fn register(&mut self, name: impl Into<String>, client: Arc<dyn ModelClient>) {
        self.clients.insert(name.into(), client);
    }

    /// Get the default client.
    pub fn default(&self) -> Option<Arc<dyn ModelClient>> {
        self.clients.get(&self.default_provider).cloned()
    }

    /// Get a specific client by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ModelClient>> {
        self.clients.get(name).cloned()
    }

    /// List all registered provider names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.clients.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Build clients from configuration.
pub fn build_from_config(config: &AppConfig) -> ClientRouter {
    let mut router = ClientRouter::new(&config.default_provider);

    for (name, provider_config) in &config.providers {
        let api_key = provider_config
            .api_key
            .clone()
            .or_else(|| config.api_key.clone())
            .unwrap_or_default();

        let base_url = provider_config
            .api_url
            .clone()
            .unwrap_or_else(|| default_base_url(name));

        router.register(
            name.clone(),
            Arc::new(OpenAiCompatClient::with_timeout(
                name,
                &base_url,
                &api_key,
                config.request_timeout_secs,
            )),
        );
    }

    // Ensure the default provider exists (even if not explicitly configured)
    if router.get(&config.default_provider).is_none() {
        let api_key = config.api_key.clone().unwrap_or_default();
        let base_url = default_base_url(&config.default_provider);

        router.register(
            config.default_provider.clone(),
            Arc::new(OpenAiCompatClient::with_timeout(
                &config.default_provider,
                &base_url,
                &api_key,
                config.request_timeout_secs,
            )),
        );
    }

    router
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
