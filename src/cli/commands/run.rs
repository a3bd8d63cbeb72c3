//! run and repl commands - Dispatch lines of input

use std::io::{self, BufRead};

use anyhow::{bail, Context as _, Result};

use crate::cli::{Context, Session};
use crate::engine::{CommandManager, Outcome};
use crate::ui::output;

/// Dispatch every line; fails if any line did not complete.
pub fn run(manager: &CommandManager<Session, String>, ctx: &Context, lines: &[String]) -> Result<()> {
    let failed = lines
        .iter()
        .filter(|line| !dispatch_line(manager, ctx, line))
        .count();

    if failed > 0 {
        bail!("{} of {} lines failed", failed, lines.len());
    }
    Ok(())
}

/// Dispatch lines from stdin until end of input.
pub fn repl(manager: &CommandManager<Session, String>, ctx: &Context) -> Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        dispatch_line(manager, ctx, &line);
    }
    Ok(())
}

/// Dispatch one line and print its result. Returns whether a handler ran.
pub fn dispatch_line(manager: &CommandManager<Session, String>, ctx: &Context, line: &str) -> bool {
    match manager.execute(line, &ctx.session, ctx.route.as_ref()) {
        Ok(Outcome::Completed(result)) => {
            output::result(result);
            true
        }
        Ok(outcome) => {
            if let Some(message) = output::format_skipped(line, &outcome) {
                output::warn(message, ctx.verbosity);
            }
            false
        }
        Err(err) => {
            output::error(output::format_command_error(&err));
            false
        }
    }
}
