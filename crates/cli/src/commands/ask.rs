//! `studymate ask`: One question, one answer.

use std::process::ExitCode;

use super::{ProfileOverrides, open_session, report};

pub async fn run(
    overrides: &ProfileOverrides,
    message: &str,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let (_config, mut session) = open_session(overrides)?;

    eprint!("  Thinking...");
    let outcome = session.send(message).await;
    eprint!("\r              \r");

    Ok(report(outcome))
}
