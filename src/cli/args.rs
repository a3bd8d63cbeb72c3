//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Read configuration from this file
//! - `--prefix <p>`: Override the default command prefix
//! - `--route <key>`: Use the prefix configured for a routing key
//! - `--case-sensitive`: Match command names exactly
//! - `--user <name>`: Name passed to commands as the caller
//! - `--disable <gear>`: Switch a gear off (repeatable)
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Results only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Armada - dispatch text commands with typed arguments
#[derive(Parser, Debug)]
#[command(name = "armada")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Read configuration from this file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the default command prefix
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Use the prefix configured for this routing key
    #[arg(long, global = true, value_name = "KEY")]
    pub route: Option<String>,

    /// Match command names and aliases exactly
    #[arg(long, global = true)]
    pub case_sensitive: bool,

    /// Name passed to commands as the caller
    #[arg(long, global = true, default_value = "guest")]
    pub user: String,

    /// Switch a gear off before dispatching
    #[arg(long = "disable", global = true, value_name = "GEAR")]
    pub disabled: Vec<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Print results only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Dispatch one or more lines of input
    #[command(
        name = "run",
        long_about = "Dispatch each argument as one line of input.\n\n\
            Every line must start with the active prefix. Results are printed \
            one per line. Lines that fail or address nothing are reported on \
            stderr and make the exit status non-zero.",
        after_help = "\
EXAMPLES:
    armada run '!greet Alice 3'
    armada run '!add 1 2' '!add 1.5 2'
    armada run '!echo hello   world'
    armada --prefix '?' run '?yell hi'"
    )]
    Run {
        /// Lines to dispatch
        #[arg(required = true, value_name = "LINE")]
        lines: Vec<String>,
    },

    /// Read lines from stdin and dispatch each one
    #[command(
        name = "repl",
        long_about = "Read lines from standard input until end of file.\n\n\
            Blank lines are skipped. Failures are reported and reading continues."
    )]
    Repl,

    /// List registered commands
    #[command(name = "list")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show description, usage and examples of a command
    #[command(name = "help", visible_alias = "describe")]
    Help {
        /// Command name or alias
        name: String,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    armada completion bash > ~/.local/share/bash-completion/completions/armada

    # Zsh
    armada completion zsh > ~/.zfunc/_armada

    # Fish
    armada completion fish > ~/.config/fish/completions/armada.fish

    # PowerShell
    armada completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["armada", "run", "!x", "--prefix", "?", "--disable", "math"])
            .unwrap();
        assert_eq!(cli.prefix.as_deref(), Some("?"));
        assert_eq!(cli.disabled, vec!["math"]);
        assert_eq!(cli.user, "guest");
        match cli.command {
            Command::Run { lines } => assert_eq!(lines, vec!["!x"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn help_takes_a_command_name() {
        let cli = Cli::try_parse_from(["armada", "help", "greet"]).unwrap();
        assert!(matches!(cli.command, Command::Help { name } if name == "greet"));
    }

    #[test]
    fn run_requires_a_line() {
        assert!(Cli::try_parse_from(["armada", "run"]).is_err());
    }
}
