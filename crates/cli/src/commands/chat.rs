//! `studymate chat`: Interactive study session.

use std::io::Write;

use studymate_agent::StudySession;
use studymate_core::{Error, Level, Role};

use super::repl::{self, ReplCommand};
use super::{ProfileOverrides, input, open_session, print_error, show};

pub async fn run(overrides: &ProfileOverrides) -> Result<(), Box<dyn std::error::Error>> {
    let (config, mut session) = open_session(overrides)?;

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        StudyMate — Interactive Session       ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", session.settings().model);
    println!("  Level:     {}", session.profile().level);
    println!("  Subjects:  {}", session.profile().subjects_label("(none, try /subjects)"));
    println!("  Tutors:    {} routing", session.settings().routing);
    println!();
    println!("  Ask anything about your studies, or type /help.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut rx = input::spawn_stdin_reader();
    prompt()?;

    while let Some(line) = rx.recv().await {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("  [Input Error] {e}");
                break;
            }
        };

        if !handle(&mut session, ReplCommand::parse(&line)).await {
            break;
        }
        prompt()?;
    }

    println!();
    println!("  Good luck with your studies!");
    println!();
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

/// Handle one command. Returns `false` when the session should end.
async fn handle(session: &mut StudySession, command: ReplCommand) -> bool {
    match command {
        ReplCommand::Exit => return false,
        ReplCommand::Chat(text) => {
            eprint!("  ...");
            let outcome = session.send(&text).await;
            eprint!("\r     \r");
            show(outcome);
        }
        ReplCommand::Tool(request) => {
            eprint!("  ...");
            let outcome = session.run_tool(request).await;
            eprint!("\r     \r");
            show(outcome);
        }
        ReplCommand::Retry => {
            eprint!("  ...");
            let outcome = session.retry().await;
            eprint!("\r     \r");
            show(outcome);
        }
        ReplCommand::Reset => {
            session.reset();
            println!("  Conversation cleared.");
        }
        ReplCommand::History => print_history(session),
        ReplCommand::Stats => print_stats(session),
        ReplCommand::Profile => print_profile(session),
        ReplCommand::Subjects(subjects) => {
            session.profile_mut().set_subjects(subjects);
            print_profile(session);
        }
        ReplCommand::Level(raw) => match raw.parse::<Level>() {
            Ok(level) => {
                session.profile_mut().level = level;
                println!("  Level set to {level}.");
            }
            Err(e) => print_error(&Error::from(e)),
        },
        ReplCommand::Goals(goals) => {
            session.profile_mut().set_goals(goals);
            print_profile(session);
        }
        ReplCommand::Help => repl::print_help(),
        ReplCommand::Unknown(command) => {
            println!("  Unknown command {command}. Type /help for the list.");
        }
    }
    true
}

fn print_history(session: &StudySession) {
    let turns = session.memory().turns();
    if turns.is_empty() {
        println!("  No conversation yet.");
        return;
    }
    println!();
    for turn in turns {
        let who = match (turn.role(), turn.tool()) {
            (Role::User, Some(tool)) => format!("You ({tool})"),
            (Role::User, None) => "You".to_string(),
            (Role::Assistant, _) => "Coach".to_string(),
            (Role::System, _) => "System".to_string(),
        };
        let first_line = turn.text().lines().next().unwrap_or_default();
        println!("  [{}] {who}: {}", turn.seq(), preview(first_line, 70));
    }
    println!();
}

fn print_stats(session: &StudySession) {
    let insights = session.insights();
    println!();
    println!("  {}", insights.summary());
    let stats = insights.subject_statistics();
    if !stats.is_empty() {
        println!();
        for (subject, count) in stats {
            println!("    {subject:<18} {count}");
        }
    }
    println!();
}

fn print_profile(session: &StudySession) {
    let profile = session.profile();
    println!();
    println!("  Subjects:  {}", profile.subjects_label("Not specified"));
    println!("  Level:     {}", profile.level);
    println!("  Goals:     {}", profile.goals_label("Not specified"));
    println!();
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("ééééé", 3), "ééé…");
    }
}
