//! StudyMate CLI: the main entry point.
//!
//! Commands:
//! - `chat`: Interactive study session
//! - `ask`: Send a single question
//! - `tool`: Run one quick tool (study plan, quiz, ...)
//! - `onboard`: Write a starter config file
//! - `config`: Show or validate configuration

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use studymate_core::Level;

mod commands;

use commands::ProfileOverrides;

#[derive(Parser)]
#[command(
    name = "studymate",
    about = "StudyMate — a study coach in your terminal",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "STUDYMATE_LOG_JSON")]
    json_logs: bool,

    /// Override profile subjects (comma-separated or repeated)
    #[arg(long = "subject", global = true, value_delimiter = ',')]
    subjects: Vec<String>,

    /// Override the learning level (beginner, intermediate, advanced)
    #[arg(long, global = true)]
    level: Option<Level>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive study session
    Chat,

    /// Ask a single question and print the answer
    Ask {
        /// The question to send
        #[arg(short, long)]
        message: String,
    },

    /// Run a quick tool: study_plan, quiz, progress_report, study_techniques
    Tool {
        /// Tool identifier
        id: String,

        /// Tool option as key=value (e.g. subject=algebra, questions=3)
        #[arg(short, long = "param", value_parser = commands::tool::parse_param)]
        params: Vec<(String, String)>,
    },

    /// Write a starter configuration file
    Onboard,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (secrets redacted)
    Show,
    /// Check the configuration file and environment
    Validate,
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let overrides = ProfileOverrides {
        subjects: cli.subjects,
        level: cli.level,
    };

    // Ask and tool report their own failures and only hand back the exit code
    match cli.command {
        Commands::Ask { message } => return commands::ask::run(&overrides, &message).await,
        Commands::Tool { id, params } => {
            return commands::tool::run(&overrides, &id, params).await;
        }
        Commands::Chat => commands::chat::run(&overrides).await?,
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
        },
    }

    Ok(ExitCode::SUCCESS)
}
