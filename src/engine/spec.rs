//! engine::spec
//!
//! Explicit command declarations.
//!
//! A [`CommandSpec`] carries everything the manager needs to know about a
//! command: its metadata, its ordered parameters and the handler to call
//! once arguments are bound. Several specs may share a name; each becomes
//! one overload of the same module.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::param::Param;

use super::args::Args;

/// Function invoked with the caller context and the bound arguments.
pub type Handler<C, R> = Box<dyn Fn(&C, &Args) -> anyhow::Result<R> + Send + Sync>;

/// Declaration of a single command overload.
///
/// # Templates
///
/// Usage and example templates may contain `<NAME>` (replaced with the
/// command name) and `<PREFIX>` (replaced with the prefix of the routing
/// key at render time).
pub struct CommandSpec<C, R> {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) usage: Vec<String>,
    pub(crate) examples: Vec<String>,
    pub(crate) raw_args: bool,
    pub(crate) params: Vec<Param>,
    pub(crate) data: BTreeMap<String, serde_json::Value>,
    pub(crate) handler: Option<Handler<C, R>>,
}

impl<C, R> CommandSpec<C, R> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            aliases: Vec::new(),
            usage: Vec::new(),
            examples: Vec::new(),
            raw_args: false,
            params: Vec::new(),
            data: BTreeMap::new(),
            handler: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Add a usage line, replacing the generated one.
    pub fn usage(mut self, template: impl Into<String>) -> Self {
        self.usage.push(template.into());
        self
    }

    pub fn example(mut self, template: impl Into<String>) -> Self {
        self.examples.push(template.into());
        self
    }

    /// Bind the whole argument tail to the single text parameter.
    pub fn raw_args(mut self) -> Self {
        self.raw_args = true;
        self
    }

    /// Append a parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Attach application metadata, readable from the registered command.
    /// A repeated key keeps the last value.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&C, &Args) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

impl<C, R> fmt::Debug for CommandSpec<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("raw_args", &self.raw_args)
            .field("params", &self.params)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}
