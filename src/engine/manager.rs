//! engine::manager
//!
//! Registration and dispatch of text commands.
//!
//! # Lifecycle
//!
//! Commands are registered on a [`CommandManagerBuilder`], which is frozen
//! into a [`CommandManager`] by [`CommandManagerBuilder::build`]. The built
//! manager has no registration API, so dispatching from many threads never
//! races with registration. Only gear switches change after `build`, and
//! those are atomic flags.
//!
//! # Dispatch
//!
//! [`CommandManager::execute`]:
//!
//! 1. Check the prefix of the routing key (or the default prefix)
//! 2. Split the rest into command name and argument tail
//! 3. Case-fold the name and resolve aliases
//! 4. Let the module pick the best overload for the tail
//! 5. Fire the cancellable pre-execute hook
//! 6. Invoke the overload and fire the post-execute hook
//!
//! Steps that find nothing return an [`Outcome`] variant, not an error.
//!
//! # Example
//!
//! ```
//! use armada::core::param::Param;
//! use armada::core::types::ParamKind;
//! use armada::engine::{CommandManagerBuilder, CommandSpec, Gear};
//!
//! let mut builder: CommandManagerBuilder<(), String> = CommandManagerBuilder::new();
//! builder
//!     .add_gear(Gear::new("greetings").command(
//!         CommandSpec::new("greet")
//!             .alias("hi")
//!             .param(Param::new("name", ParamKind::Text))
//!             .handler(|_, args| Ok(format!("Hello, {}!", args.text("name")?))),
//!     ))
//!     .unwrap();
//! let manager = builder.build().unwrap();
//!
//! let outcome = manager.execute("!HI Alice", &(), None).unwrap();
//! assert_eq!(outcome.value().as_deref(), Some("Hello, Alice!"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::core::config::{Config, ConfigError, DEFAULT_PREFIX};
use crate::core::param::ConstraintKind;
use crate::core::tokens;
use crate::core::types::ArgKind;
use crate::error::{CommandError, RegistrationError};
use crate::transform::{Transformer, TransformerRegistry};
use crate::validate::{Validator, ValidatorRegistry};

use super::command::{InternalCommand, Outcome, Registries};
use super::gear::{Gear, GearHandle};
use super::hooks::{HookBus, HookEvent, HookPoint};
use super::module::CommandModule;
use super::spec::CommandSpec;

/// Immutable command dispatcher.
///
/// `C` is the caller context passed to every handler, `R` the handler
/// result and `K` the routing key used to pick a prefix.
pub struct CommandManager<C, R, K = String> {
    prefix: String,
    prefixes: HashMap<K, String>,
    case_insensitive: bool,
    modules: Vec<CommandModule<C, R>>,
    index: HashMap<String, usize>,
    aliases: HashMap<String, String>,
    gears: Vec<GearHandle>,
    registries: Registries<C>,
    hooks: HookBus,
}

impl<C, R, K> CommandManager<C, R, K>
where
    K: Eq + Hash,
{
    /// The prefix for `key`, falling back to the default prefix.
    pub fn prefix_for(&self, key: Option<&K>) -> &str {
        key.and_then(|k| self.prefixes.get(k))
            .map_or(self.prefix.as_str(), String::as_str)
    }

    /// The default prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Text after the first occurrence of `prefix`, or all of `raw` when
    /// `prefix` does not occur.
    ///
    /// ```
    /// use armada::engine::CommandManager;
    ///
    /// assert_eq!(CommandManager::<(), ()>::strip_prefix("!test arg", "!"), "test arg");
    /// assert_eq!(CommandManager::<(), ()>::strip_prefix("?test arg", "!"), "?test arg");
    /// ```
    pub fn strip_prefix<'a>(raw: &'a str, prefix: &str) -> &'a str {
        match raw.find(prefix) {
            Some(at) => &raw[at + prefix.len()..],
            None => raw,
        }
    }

    /// Split into command name and argument tail.
    pub fn split_command(command: &str) -> (&str, &str) {
        tokens::split_command(command)
    }

    /// The command name in `raw`, with the prefix of `key` removed.
    ///
    /// Case folding is not applied.
    pub fn extract_command_name<'a>(&self, raw: &'a str, key: Option<&K>) -> &'a str {
        let stripped = Self::strip_prefix(raw, self.prefix_for(key));
        Self::split_command(stripped).0
    }

    fn fold(&self, name: &str) -> String {
        if self.case_insensitive {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }

    /// Look up a module by command name or alias.
    pub fn find_module(&self, name: &str) -> Option<&CommandModule<C, R>> {
        let name = self.fold(name);
        let tag = self.aliases.get(&name).unwrap_or(&name);
        self.index.get(tag).map(|&i| &self.modules[i])
    }

    /// Look up the module addressed by raw input.
    pub fn module(&self, raw: &str, key: Option<&K>) -> Option<&CommandModule<C, R>> {
        self.find_module(self.extract_command_name(raw, key))
    }

    /// Look up a gear by name, ignoring case.
    pub fn gear(&self, name: &str) -> Option<&GearHandle> {
        self.gears.iter().find(|g| same_name(g.name(), name))
    }

    /// Switch a gear on or off. Returns `false` if no such gear exists.
    pub fn set_gear_enabled(&self, name: &str, enabled: bool) -> bool {
        match self.gear(name) {
            Some(gear) => {
                gear.set_enabled(enabled);
                tracing::debug!(gear = %gear.name(), enabled, "gear switched");
                true
            }
            None => false,
        }
    }

    pub fn gears(&self) -> &[GearHandle] {
        &self.gears
    }

    /// Modules in registration order.
    pub fn modules(&self) -> &[CommandModule<C, R>] {
        &self.modules
    }

    /// Every overload of every module.
    pub fn commands(&self) -> impl Iterator<Item = &InternalCommand<C, R>> {
        self.modules.iter().flat_map(|m| m.commands().iter())
    }

    /// Alias to module tag pairs, sorted by alias.
    pub fn aliases(&self) -> Vec<(&str, &str)> {
        let mut aliases: Vec<_> = self
            .aliases
            .iter()
            .map(|(a, t)| (a.as_str(), t.as_str()))
            .collect();
        aliases.sort();
        aliases
    }

    pub fn transformers(&self) -> &TransformerRegistry<C> {
        &self.registries.transformers
    }

    pub fn validators(&self) -> &ValidatorRegistry {
        &self.registries.validators
    }

    /// Usage of every overload of `name`, one per line.
    pub fn usage(&self, name: &str, key: Option<&K>) -> Option<String> {
        let module = self.find_module(name)?;
        let prefix = self.prefix_for(key);
        Some(
            module
                .commands()
                .iter()
                .map(|c| c.usage(prefix))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    /// Examples of every overload of `name`, one per line.
    pub fn examples(&self, name: &str, key: Option<&K>) -> Option<String> {
        let module = self.find_module(name)?;
        let prefix = self.prefix_for(key);
        Some(
            module
                .commands()
                .iter()
                .map(|c| c.examples(prefix))
                .filter(|e| !e.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    /// Description, usage, aliases and examples of `name`.
    pub fn help(&self, name: &str, key: Option<&K>) -> Option<String> {
        let module = self.find_module(name)?;
        let prefix = self.prefix_for(key);
        let mut sections = Vec::new();

        for command in module.commands() {
            let mut text = String::new();
            if !command.description().is_empty() {
                text.push_str(command.description());
                text.push('\n');
            }
            text.push_str("Usage: ");
            text.push_str(&command.usage(prefix));
            if !command.aliases().is_empty() {
                text.push_str("\nAliases: ");
                text.push_str(&command.aliases().join(", "));
            }
            let examples = command.examples(prefix);
            if !examples.is_empty() {
                text.push_str("\nExamples:\n");
                text.push_str(&examples);
            }
            sections.push(text);
        }
        Some(sections.join("\n\n"))
    }

    /// Dispatch one line of input.
    ///
    /// # Errors
    ///
    /// Binding and handler failures of the selected overload. Inputs that
    /// address nothing are reported through [`Outcome`].
    pub fn execute(&self, raw: &str, ctx: &C, key: Option<&K>) -> Result<Outcome<R>, CommandError>
    where
        R: 'static,
    {
        let prefix = self.prefix_for(key);
        if !raw.starts_with(prefix) {
            return Ok(Outcome::NoPrefix);
        }

        let (name, tail) = Self::split_command(Self::strip_prefix(raw, prefix));
        tracing::debug!(command = name, prefix, "received command");

        let name = self.fold(name);
        let Some(module) = self.find_module(&name) else {
            tracing::debug!(command = %name, "command does not exist");
            return Ok(Outcome::UnknownCommand { name });
        };

        let Some(command) = module.find_candidate(tail, ctx, &self.registries.transformers) else {
            tracing::debug!(module = %module.tag(), args = tail, "no overload accepts the arguments");
            return Ok(Outcome::NoCandidate {
                module: module.tag().to_string(),
            });
        };
        tracing::debug!(command = %command.name(), module = %module.tag(), "executing command");

        if !command.is_enabled() {
            return Ok(Outcome::Disabled {
                gear: command.gear().to_string(),
            });
        }

        let mut pre = HookEvent::new(HookPoint::CommandPreExecute, command.name()).with_args(tail);
        if !self.hooks.fire(&mut pre) {
            return Ok(Outcome::Cancelled);
        }

        let outcome = command.invoke(tail, ctx, &self.registries)?;
        if let Outcome::Completed(result) = &outcome {
            let mut post = HookEvent::new(HookPoint::CommandPostExecute, command.name())
                .with_args(tail)
                .with_result(result);
            self.hooks.fire(&mut post);
        }
        Ok(outcome)
    }
}

impl<C, R, K> fmt::Debug for CommandManager<C, R, K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandManager")
            .field("prefix", &self.prefix)
            .field("prefixes", &self.prefixes)
            .field("case_insensitive", &self.case_insensitive)
            .field("modules", &self.modules.len())
            .field("aliases", &self.aliases.len())
            .field("gears", &self.gears)
            .field("registries", &self.registries)
            .field("hooks", &self.hooks)
            .finish()
    }
}

/// Gear names compare by Unicode lowercase, like folded command names.
fn same_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// A checked command waiting to be inserted.
struct Staged<C, R> {
    tag: String,
    aliases: Vec<String>,
    command: InternalCommand<C, R>,
}

fn staged_alias<'a, C, R>(staged: &'a [Staged<C, R>], alias: &str) -> Option<&'a str> {
    staged
        .iter()
        .find(|s| s.aliases.iter().any(|a| a == alias))
        .map(|s| s.tag.as_str())
}

/// Mutable registration phase of a [`CommandManager`].
pub struct CommandManagerBuilder<C, R, K = String> {
    manager: CommandManager<C, R, K>,
}

impl<C, R, K> Default for CommandManagerBuilder<C, R, K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, R, K> CommandManagerBuilder<C, R, K>
where
    K: Eq + Hash,
{
    /// A builder with every built-in transformer and validator installed.
    pub fn new() -> Self {
        Self::with_registries(Registries::with_builtins())
    }

    /// A builder with no transformers or validators at all.
    pub fn bare() -> Self {
        Self::with_registries(Registries::empty())
    }

    fn with_registries(registries: Registries<C>) -> Self {
        Self {
            manager: CommandManager {
                prefix: DEFAULT_PREFIX.to_string(),
                prefixes: HashMap::new(),
                case_insensitive: true,
                modules: Vec::new(),
                index: HashMap::new(),
                aliases: HashMap::new(),
                gears: Vec::new(),
                registries,
                hooks: HookBus::new(),
            },
        }
    }

    /// Set the default prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.manager.prefix = prefix.into();
        self
    }

    /// Set the prefix used for routing key `key`.
    pub fn route_prefix(mut self, key: K, prefix: impl Into<String>) -> Self {
        self.manager.prefixes.insert(key, prefix.into());
        self
    }

    /// Fold command names and aliases to lowercase (default `true`).
    ///
    /// Set this before registering commands; names are folded as they
    /// are registered.
    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.manager.case_insensitive = enabled;
        self
    }

    /// Register a hook listener.
    pub fn on<F>(&mut self, point: HookPoint, listener: F)
    where
        F: Fn(&mut HookEvent<'_>) + Send + Sync + 'static,
    {
        self.manager.hooks.on(point, listener);
    }

    /// Register a gear and all of its commands.
    ///
    /// A gear cancelled by a `GearPreAdd` listener is skipped without error.
    /// Every command is checked before any is registered, so a failed call
    /// leaves the builder unchanged.
    ///
    /// # Errors
    ///
    /// Duplicate gear names, duplicate aliases and invalid command
    /// declarations.
    pub fn add_gear(&mut self, gear: Gear<C, R>) -> Result<(), RegistrationError> {
        if self.manager.gear(gear.name()).is_some() {
            return Err(RegistrationError::DuplicateGear(gear.name().to_string()));
        }
        let mut pre = HookEvent::new(HookPoint::GearPreAdd, gear.name());
        if !self.manager.hooks.fire(&mut pre) {
            return Ok(());
        }

        let (mut handle, specs) = gear.into_parts();
        tracing::debug!(gear = %handle.name(), commands = specs.len(), "registering gear");
        let staged = self.stage(&handle, specs)?;
        for name in self.commit(&handle, staged) {
            handle.record_command(&name);
        }

        let mut post = HookEvent::new(HookPoint::GearPostAdd, handle.name());
        self.manager.hooks.fire(&mut post);
        tracing::debug!(gear = %handle.name(), "registered gear");
        self.manager.gears.push(handle);
        Ok(())
    }

    /// Attach a single command to a registered gear.
    ///
    /// # Errors
    ///
    /// `UnknownGear` when no gear is named `gear`, plus the errors of
    /// [`add_gear`](Self::add_gear).
    pub fn add_command(&mut self, gear: &str, spec: CommandSpec<C, R>) -> Result<(), RegistrationError> {
        let position = self
            .manager
            .gears
            .iter()
            .position(|g| same_name(g.name(), gear))
            .ok_or_else(|| RegistrationError::UnknownGear(gear.to_string()))?;

        let mut pre = HookEvent::new(HookPoint::CommandPreAdd, spec.name());
        if !self.manager.hooks.fire(&mut pre) {
            return Ok(());
        }

        let handle = self.manager.gears[position].clone();
        let staged = self.stage(&handle, vec![spec])?;
        for name in self.commit(&handle, staged) {
            self.manager.gears[position].record_command(&name);
            let mut post = HookEvent::new(HookPoint::CommandPostAdd, &name);
            self.manager.hooks.fire(&mut post);
        }
        Ok(())
    }

    /// Build and check `specs` against the tables and each other without
    /// touching the tables.
    fn stage(
        &self,
        gear: &GearHandle,
        specs: Vec<CommandSpec<C, R>>,
    ) -> Result<Vec<Staged<C, R>>, RegistrationError> {
        let manager = &self.manager;
        let mut staged: Vec<Staged<C, R>> = Vec::with_capacity(specs.len());

        for spec in specs {
            let command = InternalCommand::new(spec, gear)?;
            let tag = manager.fold(command.name());
            let alias_target = |alias: &str| {
                manager
                    .aliases
                    .get(alias)
                    .cloned()
                    .or_else(|| staged_alias(&staged, alias).map(str::to_string))
            };

            if let Some(existing) = alias_target(&tag) {
                return Err(RegistrationError::DuplicateAlias {
                    alias: tag.clone(),
                    existing,
                    requested: tag,
                });
            }

            let mut aliases = Vec::new();
            for alias in command.aliases() {
                let alias = manager.fold(alias);
                if alias == tag || aliases.contains(&alias) {
                    continue;
                }
                let is_module =
                    manager.index.contains_key(&alias) || staged.iter().any(|s| s.tag == alias);
                let existing = if is_module {
                    Some(alias.clone())
                } else {
                    alias_target(&alias).filter(|t| *t != tag)
                };
                if let Some(existing) = existing {
                    return Err(RegistrationError::DuplicateAlias {
                        alias,
                        existing,
                        requested: tag,
                    });
                }
                aliases.push(alias);
            }

            staged.push(Staged { tag, aliases, command });
        }
        Ok(staged)
    }

    /// Insert staged commands, returning their names in order.
    fn commit(&mut self, gear: &GearHandle, staged: Vec<Staged<C, R>>) -> Vec<String> {
        let manager = &mut self.manager;
        let mut names = Vec::with_capacity(staged.len());

        for Staged { tag, aliases, command } in staged {
            for alias in aliases {
                manager.aliases.insert(alias, tag.clone());
            }

            let name = command.name().to_string();
            tracing::debug!(command = %name, module = %tag, gear = %gear.name(), "registered command");
            match manager.index.get(&tag).copied() {
                Some(i) => manager.modules[i].push(command),
                None => {
                    let mut module = CommandModule::new(tag.clone());
                    module.push(command);
                    manager.index.insert(tag, manager.modules.len());
                    manager.modules.push(module);
                }
            }
            names.push(name);
        }
        names
    }

    /// Register the transformer for `kind`.
    ///
    /// # Errors
    ///
    /// `DuplicateTransformer` if `kind` already has one; the first stays.
    pub fn add_transformer<T>(&mut self, kind: ArgKind, transformer: T) -> Result<(), RegistrationError>
    where
        T: Transformer<C> + 'static,
    {
        let mut pre = HookEvent::new(HookPoint::TransformerPreAdd, kind.name());
        if !self.manager.hooks.fire(&mut pre) {
            return Ok(());
        }
        self.manager
            .registries
            .transformers
            .insert(kind, Box::new(transformer))?;

        let mut post = HookEvent::new(HookPoint::TransformerPostAdd, kind.name());
        self.manager.hooks.fire(&mut post);
        tracing::debug!(%kind, "registered transformer");
        Ok(())
    }

    /// Register the validators for constraint `kind`.
    ///
    /// # Errors
    ///
    /// `DuplicateValidator` if `kind` is already registered.
    pub fn add_validators(
        &mut self,
        kind: ConstraintKind,
        validators: Vec<Box<dyn Validator>>,
    ) -> Result<(), RegistrationError> {
        let subject = kind.to_string();
        let mut pre = HookEvent::new(HookPoint::ValidatorPreAdd, &subject);
        if !self.manager.hooks.fire(&mut pre) {
            return Ok(());
        }
        let count = validators.len();
        self.manager.registries.validators.insert(kind, validators)?;

        let mut post = HookEvent::new(HookPoint::ValidatorPostAdd, &subject);
        self.manager.hooks.fire(&mut post);
        tracing::debug!(%kind, count, "registered validators");
        Ok(())
    }

    /// Freeze the registration tables.
    ///
    /// # Errors
    ///
    /// `MissingValidator` if a parameter uses a constraint that no
    /// validator handles.
    pub fn build(self) -> Result<CommandManager<C, R, K>, RegistrationError> {
        let manager = self.manager;
        for command in manager.commands() {
            for param in command.params() {
                for constraint in param.constraints() {
                    if !manager.registries.validators.contains(constraint.kind()) {
                        return Err(RegistrationError::MissingValidator {
                            command: command.name().to_string(),
                            parameter: param.name().to_string(),
                            constraint: constraint.kind(),
                        });
                    }
                }
            }
        }
        tracing::debug!(
            modules = manager.modules.len(),
            gears = manager.gears.len(),
            "command manager ready"
        );
        Ok(manager)
    }
}

impl<C, R, K> CommandManagerBuilder<C, R, K>
where
    K: Eq + Hash + FromStr,
{
    /// Copy prefixes and case folding from a loaded config.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidValue` if a routing key does not parse as `K`.
    pub fn apply_config(mut self, config: &Config) -> Result<Self, ConfigError> {
        self.manager.prefix = config.prefix().to_string();
        self.manager.case_insensitive = config.case_insensitive();
        for (key, prefix) in config.prefixes() {
            let parsed = key
                .parse::<K>()
                .map_err(|_| ConfigError::InvalidValue(format!("invalid routing key '{}'", key)))?;
            self.manager.prefixes.insert(parsed, prefix.to_string());
        }
        Ok(self)
    }
}

impl<C, R, K> fmt::Debug for CommandManagerBuilder<C, R, K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandManagerBuilder")
            .field("manager", &self.manager)
            .finish()
    }
}
