//! REPL line parsing.

use studymate_agent::QUICK_TOOLS;
use studymate_agent::quick_tools::{PARAM_DURATION, PARAM_SUBJECT};
use studymate_core::profile::parse_list;
use studymate_core::{ToolId, ToolRequest};

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Chat(String),
    Tool(ToolRequest),
    Retry,
    Reset,
    History,
    Stats,
    Profile,
    Subjects(Vec<String>),
    Level(String),
    Goals(Vec<String>),
    Help,
    Exit,
    Unknown(String),
}

impl ReplCommand {
    /// Parse a trimmed, non-empty input line.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if matches!(line, "exit" | "quit" | "/exit" | "/quit" | ":q") {
            return Self::Exit;
        }
        if !line.starts_with('/') {
            return Self::Chat(line.to_string());
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        if let Some(tool) = QUICK_TOOLS.iter().find(|t| t.command == command) {
            let mut request = ToolRequest::new(tool.id);
            if !rest.is_empty() {
                match tool.id {
                    ToolId::Quiz => request = request.with_param(PARAM_SUBJECT, rest),
                    ToolId::StudyPlan => request = request.with_param(PARAM_DURATION, rest),
                    _ => {}
                }
            }
            return Self::Tool(request);
        }

        match command {
            "/retry" => Self::Retry,
            "/reset" | "/clear" => Self::Reset,
            "/history" => Self::History,
            "/stats" => Self::Stats,
            "/profile" => Self::Profile,
            "/subjects" => Self::Subjects(parse_list(rest)),
            "/level" => Self::Level(rest.to_string()),
            "/goals" => Self::Goals(parse_list(rest)),
            "/help" | "/?" => Self::Help,
            _ => Self::Unknown(command.to_string()),
        }
    }
}

pub fn print_help() {
    println!();
    println!("  Quick tools:");
    for tool in &QUICK_TOOLS {
        println!("    {:<22} {}", tool.command, tool.description);
    }
    println!("    {:<22} (/quiz <subject>, /plan <duration>)", "");
    println!();
    println!("  Session:");
    println!("    {:<22} Resend the last failed request", "/retry");
    println!("    {:<22} Forget the conversation", "/reset");
    println!("    {:<22} Show the conversation so far", "/history");
    println!("    {:<22} Subjects discussed and session summary", "/stats");
    println!();
    println!("  Profile:");
    println!("    {:<22} Show your profile", "/profile");
    println!("    {:<22} Set subjects", "/subjects a, b");
    println!("    {:<22} beginner, intermediate or advanced", "/level <level>");
    println!("    {:<22} Set study goals", "/goals a, b");
    println!();
    println!("  Type 'exit' or press Ctrl+D to quit.");
    println!();
}
