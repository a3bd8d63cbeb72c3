//! list and help commands - Describe registered commands

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::cli::{Context, Session};
use crate::engine::CommandManager;
use crate::ui::output;

/// One overload as shown by `list --json`.
#[derive(Debug, Serialize)]
struct CommandListing<'a> {
    name: &'a str,
    gear: &'a str,
    enabled: bool,
    description: &'a str,
    aliases: &'a [String],
    usage: String,
    #[serde(skip_serializing_if = "no_data")]
    data: &'a BTreeMap<String, serde_json::Value>,
}

fn no_data(data: &&BTreeMap<String, serde_json::Value>) -> bool {
    data.is_empty()
}

/// List registered commands grouped by gear.
pub fn list(manager: &CommandManager<Session, String>, ctx: &Context, json: bool) -> Result<()> {
    let prefix = manager.prefix_for(ctx.route.as_ref());
    let listings: Vec<_> = manager
        .commands()
        .map(|command| CommandListing {
            name: command.name(),
            gear: command.gear(),
            enabled: command.is_enabled(),
            description: command.description(),
            aliases: command.aliases(),
            usage: command.usage(prefix),
            data: command.data(),
        })
        .collect();

    if json {
        output::result(output::format_json(&listings)?);
        return Ok(());
    }

    for gear in manager.gears() {
        let state = if gear.is_enabled() { "" } else { " (disabled)" };
        output::result(format!("{}{}: {}", gear.name(), state, gear.description()));

        let lines: Vec<_> = listings
            .iter()
            .filter(|l| l.gear == gear.name())
            .map(|l| format!("{:<28} {}", l.usage, l.description))
            .collect();
        output::result(output::format_list(&lines, "  "));
    }
    Ok(())
}

/// Show description, usage and examples of one command.
pub fn help(manager: &CommandManager<Session, String>, ctx: &Context, name: &str) -> Result<()> {
    let text = manager
        .help(name, ctx.route.as_ref())
        .ok_or_else(|| anyhow!("unknown command '{}'", name))?;
    output::result(text);
    Ok(())
}
