//! engine::gear
//!
//! Gears group related commands under one name and one on/off switch.
//!
//! A [`Gear`] is the definition handed to the builder. Once registered the
//! manager keeps a [`GearHandle`]: the name, the command names and the
//! shared `enabled` flag that every command of the gear consults.
//!
//! Toggling a gear is an atomic store, so it is safe while other threads
//! dispatch; it never touches the registration tables.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::spec::CommandSpec;

/// A named bucket of command definitions.
///
/// # Example
///
/// ```
/// use armada::core::param::Param;
/// use armada::core::types::ParamKind;
/// use armada::engine::{CommandSpec, Gear};
///
/// let gear: Gear<(), String> = Gear::new("text")
///     .description("Text helpers")
///     .command(
///         CommandSpec::new("upper")
///             .param(Param::new("text", ParamKind::Text))
///             .handler(|_, args| Ok(args.text("text")?.to_uppercase())),
///     );
///
/// assert_eq!(gear.name(), "text");
/// assert_eq!(gear.commands().len(), 1);
/// ```
pub struct Gear<C, R> {
    name: String,
    description: String,
    enabled: bool,
    commands: Vec<CommandSpec<C, R>>,
}

impl<C, R> Gear<C, R> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            enabled: true,
            commands: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Register the gear switched off.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Add a command definition.
    pub fn command(mut self, spec: CommandSpec<C, R>) -> Self {
        self.commands.push(spec);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commands(&self) -> &[CommandSpec<C, R>] {
        &self.commands
    }

    pub(crate) fn into_parts(self) -> (GearHandle, Vec<CommandSpec<C, R>>) {
        let handle = GearHandle {
            name: self.name,
            description: self.description,
            enabled: Arc::new(AtomicBool::new(self.enabled)),
            commands: Vec::new(),
        };
        (handle, self.commands)
    }
}

impl<C, R> fmt::Debug for Gear<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gear")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("commands", &self.commands.len())
            .finish()
    }
}

/// A registered gear.
#[derive(Debug, Clone)]
pub struct GearHandle {
    name: String,
    description: String,
    enabled: Arc<AtomicBool>,
    commands: Vec<String>,
}

impl GearHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Names of the commands registered through this gear.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub(crate) fn switch(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.enabled)
    }

    pub(crate) fn record_command(&mut self, name: &str) {
        self.commands.push(name.to_string());
    }
}
