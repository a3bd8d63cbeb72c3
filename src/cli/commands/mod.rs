//! cli::commands
//!
//! Subcommand dispatch and handlers.
//!
//! # Architecture
//!
//! Each handler:
//! 1. Reads its arguments
//! 2. Calls the command manager
//! 3. Formats and displays output
//!
//! Handlers do not register commands; the manager is already built.

mod completion;
mod inspect;
mod run;

pub use completion::completion;
pub use inspect::{help, list};
pub use run::{dispatch_line, repl, run};

use anyhow::Result;

use super::args::Command;
use super::{Context, Session};
use crate::engine::CommandManager;

/// Dispatch a subcommand to its handler.
pub fn dispatch(command: Command, manager: &CommandManager<Session, String>, ctx: &Context) -> Result<()> {
    match command {
        Command::Run { lines } => run(manager, ctx, &lines),
        Command::Repl => repl(manager, ctx),
        Command::List { json } => list(manager, ctx, json),
        Command::Help { name } => help(manager, ctx, &name),
        Command::Completion { shell } => completion(shell),
    }
}
