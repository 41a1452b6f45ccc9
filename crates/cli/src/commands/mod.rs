//! Subcommand implementations and the helpers they share.

pub mod ask;
pub mod chat;
pub mod config_cmd;
pub mod input;
pub mod onboard;
pub mod repl;
pub mod tool;

use std::process::ExitCode;

use studymate_agent::{Reply, SessionSettings, StudySession};
use studymate_config::AppConfig;
use studymate_core::error::ProviderError;
use studymate_core::{Error, Level, Profile};

/// Profile values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ProfileOverrides {
    pub subjects: Vec<String>,
    pub level: Option<Level>,
}

impl ProfileOverrides {
    pub fn apply(&self, mut profile: Profile) -> Profile {
        if !self.subjects.is_empty() {
            profile.set_subjects(self.subjects.iter().cloned());
        }
        if let Some(level) = self.level {
            profile.level = level;
        }
        profile
    }
}

/// Load config, pick the default client and start a session.
pub fn open_session(
    overrides: &ProfileOverrides,
) -> Result<(AppConfig, StudySession), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Local servers such as Ollama take any key
    if !config.has_api_key() && config.default_provider != "ollama" {
        print_missing_key_help();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let router = studymate_providers::build_from_config(&config);
    let client = router.default().ok_or("No default provider configured")?;
    let profile = overrides.apply(config.profile.clone());
    let session = StudySession::new(client, profile, SessionSettings::from_config(&config));

    tracing::debug!(
        session = %session.id(),
        provider = %session.client_name(),
        model = %session.settings().model,
        window_turns = session.settings().window_turns,
        routing = %session.settings().routing,
        "Session opened"
    );

    Ok((config, session))
}

fn print_missing_key_help() {
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    export OPENAI_API_KEY=sk-...            (OpenAI)");
    eprintln!("    export OPENROUTER_API_KEY=sk-or-v1-...  (OpenRouter)");
    eprintln!("    export STUDYMATE_API_KEY=...            (generic)");
    eprintln!();
    eprintln!("  Or add it to your config file:");
    eprintln!("    {}", AppConfig::config_path().display());
    eprintln!();
}

/// Print a reply, with its heading when it came from a quick tool or tutor.
pub fn print_reply(reply: &Reply) {
    println!();
    if let Some(heading) = &reply.heading {
        println!("  == {heading} ==");
        println!();
    }
    for line in reply.text.lines() {
        println!("  {line}");
    }
    println!();
}

/// Print a reply or an error banner. Returns `false` for an error.
pub fn show(outcome: studymate_core::Result<Reply>) -> bool {
    match outcome {
        Ok(reply) => {
            print_reply(&reply);
            true
        }
        Err(e) => {
            print_error(&e);
            false
        }
    }
}

/// Finish a one-shot command. A failure is reported here and turned into
/// an exit code, so `main` does not print it a second time.
pub fn report(outcome: studymate_core::Result<Reply>) -> ExitCode {
    if show(outcome) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Print an error as a banner. Nothing here is fatal to the REPL.
pub fn print_error(error: &Error) {
    eprintln!();
    match error {
        Error::Provider(ProviderError::QuotaExceeded(_)) => {
            eprintln!("  API Quota Exceeded");
            eprintln!();
            eprintln!("  Your API key has exceeded its usage quota. To continue:");
            eprintln!("    1. Check your account usage: https://platform.openai.com/usage");
            eprintln!("    2. Add billing: https://platform.openai.com/settings/billing");
            eprintln!("    3. Purchase credits or upgrade your plan");
            eprintln!();
            eprintln!("  StudyMate will work normally once your quota is restored.");
        }
        Error::Provider(ProviderError::RateLimited { retry_after_secs }) => {
            eprintln!("  Rate Limit Reached");
            eprintln!();
            eprintln!("  Too many requests were made recently.");
            eprintln!("  Wait about {retry_after_secs}s, then type /retry.");
        }
        Error::Provider(ProviderError::AuthenticationFailed(reason)) => {
            eprintln!("  [Auth Error] {reason}");
            eprintln!("  Check your API key in {}", AppConfig::config_path().display());
        }
        Error::Validation(e) => eprintln!("  [!] {e}"),
        Error::UnknownTool(e) => eprintln!("  [!] {e}"),
        other => {
            eprintln!("  [Error] {other}");
            if other.is_retryable() {
                eprintln!("  Type /retry to send it again.");
            }
        }
    }
    eprintln!();
}
