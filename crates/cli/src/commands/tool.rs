//! `studymate tool`: Run a single quick tool.

use std::process::ExitCode;

use studymate_agent::quick_tools;

use super::{ProfileOverrides, open_session, report};

pub async fn run(
    overrides: &ProfileOverrides,
    id: &str,
    params: Vec<(String, String)>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Resolve the tool before touching config so typos fail fast
    let mut request = match quick_tools::dispatch(id) {
        Ok(request) => request,
        Err(e) => return Ok(report(Err(e.into()))),
    };
    for (name, value) in params {
        request = request.with_param(name, value);
    }

    let (_config, mut session) = open_session(overrides)?;

    eprint!("  Working...");
    let outcome = session.run_tool(request).await;
    eprint!("\r             \r");

    Ok(report(outcome))
}

/// Parse a `key=value` tool option.
pub fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing option name in {raw:?}"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
