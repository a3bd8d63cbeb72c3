//! cli
//!
//! Command-line interface layer for Armada.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and apply flag overrides
//! - Build the command manager with the demo gears
//! - Delegate to subcommand handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Every line of input is handed to
//! [`crate::engine::CommandManager::execute`]; this layer only formats the
//! outcome.

pub mod args;
pub mod commands;
pub mod gears;

pub use args::{Cli, Shell};
pub use gears::Session;

use anyhow::{bail, Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::engine::{CommandManager, CommandManagerBuilder, HookPoint};
use crate::ui::output::Verbosity;
use args::Command;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "ARMADA_LOG";

/// Per-invocation state shared by the subcommand handlers.
#[derive(Debug, Clone)]
pub struct Context {
    pub session: Session,
    pub route: Option<String>,
    pub verbosity: Verbosity,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);

    if let Command::Completion { shell } = cli.command {
        return commands::completion(shell);
    }

    let manager = build_manager(&cli)?;
    let ctx = Context {
        session: Session::new(cli.user.clone()),
        route: cli.route.clone(),
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
    };

    commands::dispatch(cli.command, &manager, &ctx)
}

/// Install the stderr subscriber.
///
/// `--debug` wins over `ARMADA_LOG`; without either only warnings are shown.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("armada=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Build the manager from config, flags and the demo gears.
pub fn build_manager(cli: &Cli) -> Result<CommandManager<Session, String>> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    if let Some(prefix) = &cli.prefix {
        config.file.prefix = Some(prefix.clone());
    }
    if cli.case_sensitive {
        config.file.case_insensitive = Some(false);
    }
    config.file.validate()?;

    if let Some(route) = &cli.route {
        if !config.file.prefixes.contains_key(route) {
            bail!("no prefix is configured for route '{}'", route);
        }
    }

    let mut builder = CommandManagerBuilder::new().apply_config(&config)?;
    builder.on(HookPoint::CommandPostExecute, |event| {
        tracing::debug!(command = event.subject(), args = event.args().unwrap_or(""), "command finished");
    });
    gears::install(&mut builder)?;
    let manager = builder.build()?;

    for gear in &cli.disabled {
        if !manager.set_gear_enabled(gear, false) {
            bail!("unknown gear '{}'", gear);
        }
    }

    Ok(manager)
}
