//! `studymate config`: Configuration management commands.

use studymate_config::{AppConfig, RoutingMode};

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   Config parsed successfully");

            let warnings = warnings(&config);
            if warnings.is_empty() {
                println!("   All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   [warn] {w}");
                }
            }

            println!();
            println!("   Provider:  {}", config.default_provider);
            println!("   Model:     {}", config.effective_model());
            println!("   Window:    {} turns", config.memory.window_turns);
            println!("   Timeout:   {}s", config.request_timeout_secs);
            println!("   Routing:   {}", config.routing.mode);
            println!("   Level:     {}", config.profile.level);
            println!("   Subjects:  {}", config.profile.subjects_label("Not specified"));
        }
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

/// Non-fatal problems worth pointing out.
fn warnings(config: &AppConfig) -> Vec<&'static str> {
    let mut warnings = Vec::new();

    if !config.has_api_key() && config.default_provider != "ollama" {
        warnings.push("No API key set (set OPENAI_API_KEY or OPENROUTER_API_KEY env var)");
    }

    if !config.profile.has_subjects() {
        warnings.push("No subjects in [profile]; /plan and /quiz will ask for them");
    }

    if config.routing.mode == RoutingMode::Model {
        warnings.push("routing.mode = \"model\" makes one extra model call per message");
    }

    if config.memory.window_turns % 2 == 1 {
        warnings.push("memory.window_turns is odd; the oldest exchange will be cut in half");
    }

    warnings
}

/// Print the effective configuration with secrets removed.
pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if config.api_key.is_some() {
        config.api_key = Some("[REDACTED]".into());
    }
    for provider in config.providers.values_mut() {
        if provider.api_key.is_some() {
            provider.api_key = Some("[REDACTED]".into());
        }
    }
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}
