//! engine::command
//!
//! One concrete command overload and the outcome of dispatching it.
//!
//! # Binding
//!
//! [`InternalCommand::invoke`] turns an argument tail into [`Args`]:
//!
//! 1. The tail is split on whitespace; each token goes to the parameter at
//!    the same position.
//! 2. A trailing `Text` parameter takes the rest of the tail verbatim and a
//!    trailing `TextList` parameter takes the remaining tokens. Without such
//!    a parameter, surplus tokens are an error.
//! 3. Every other token is parsed by the transformer for its kind, then
//!    checked by the validators of the parameter's constraints.
//! 4. Omitted optional parameters take their default.
//!
//! Raw-args commands skip steps 1-3 and bind the whole tail to their only
//! parameter.
//!
//! # Scoring
//!
//! [`InternalCommand::soft_invoke`] parses without binding. Each token that
//! parses for its parameter scores 1 if the parameter is textual and 2
//! otherwise; the module picks the overload with the highest score.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::param::Param;
use crate::core::tokens::Tokens;
use crate::core::types::{ArgKind, Value};
use crate::error::{CommandError, RegistrationError};
use crate::transform::{ParseFailure, TransformerRegistry};
use crate::validate::ValidatorRegistry;

use super::args::Args;
use super::gear::GearHandle;
use super::spec::{CommandSpec, Handler};

/// Result of dispatching a line of input.
///
/// Only [`Outcome::Completed`] carries a handler result. The remaining
/// variants are the quiet "nothing ran" cases.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<R> {
    /// The handler ran and returned a value.
    Completed(R),

    /// The selected command belongs to a switched-off gear.
    Disabled {
        /// Name of the gear.
        gear: String,
    },

    /// A pre-execute hook cancelled the call.
    Cancelled,

    /// The input does not start with the prefix.
    NoPrefix,

    /// No module or alias matches the command name.
    UnknownCommand {
        /// The case-folded name that was looked up.
        name: String,
    },

    /// The module exists but no overload accepts the arguments.
    NoCandidate {
        /// The module tag.
        module: String,
    },
}

impl<R> Outcome<R> {
    /// Check if a handler ran.
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    /// The handler result, if any.
    pub fn value(self) -> Option<R> {
        match self {
            Outcome::Completed(v) => Some(v),
            _ => None,
        }
    }

    /// Short description of why nothing ran, `None` when completed.
    pub fn reason(&self) -> Option<String> {
        match self {
            Outcome::Completed(_) => None,
            Outcome::Disabled { gear } => Some(format!("gear '{}' is disabled", gear)),
            Outcome::Cancelled => Some("cancelled".to_string()),
            Outcome::NoPrefix => Some("input does not start with the prefix".to_string()),
            Outcome::UnknownCommand { name } => Some(format!("unknown command '{}'", name)),
            Outcome::NoCandidate { module } => {
                Some(format!("no overload of '{}' accepts these arguments", module))
            }
        }
    }
}

/// Transformer and validator tables consulted while binding.
pub struct Registries<C> {
    pub transformers: TransformerRegistry<C>,
    pub validators: ValidatorRegistry,
}

impl<C> Registries<C> {
    pub fn empty() -> Self {
        Self {
            transformers: TransformerRegistry::new(),
            validators: ValidatorRegistry::new(),
        }
    }

    pub fn with_builtins() -> Self {
        Self {
            transformers: TransformerRegistry::with_builtins(),
            validators: ValidatorRegistry::with_builtins(),
        }
    }
}

impl<C> fmt::Debug for Registries<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registries")
            .field("transformers", &self.transformers)
            .field("validators", &self.validators)
            .finish()
    }
}

/// A registered command overload.
pub struct InternalCommand<C, R> {
    name: String,
    description: String,
    aliases: Vec<String>,
    usage: Vec<String>,
    examples: Vec<String>,
    raw_args: bool,
    params: Vec<Param>,
    data: BTreeMap<String, serde_json::Value>,
    handler: Handler<C, R>,
    gear: String,
    enabled: Arc<AtomicBool>,
}

impl<C, R> InternalCommand<C, R> {
    /// Wrap `spec` as a command of `gear`.
    ///
    /// # Errors
    ///
    /// - `MissingHandler` if the spec has no handler
    /// - `InvalidParameters` for duplicate names or a `TextList` that is not last
    /// - `InvalidRawArgs` if a raw-args command does not have exactly one
    ///   `Text` or `TextList` parameter
    pub fn new(spec: CommandSpec<C, R>, gear: &GearHandle) -> Result<Self, RegistrationError> {
        let CommandSpec {
            name,
            description,
            aliases,
            usage,
            examples,
            raw_args,
            params,
            data,
            handler,
        } = spec;

        let handler = handler.ok_or_else(|| RegistrationError::MissingHandler(name.clone()))?;
        check_params(&name, &params)?;
        if raw_args {
            check_raw_args(&name, &params)?;
        }

        Ok(Self {
            name,
            description,
            aliases: aliases
                .into_iter()
                .filter(|a| !a.trim().is_empty())
                .collect(),
            usage,
            examples,
            raw_args,
            params,
            data,
            handler,
            gear: gear.name().to_string(),
            enabled: gear.switch(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn is_raw(&self) -> bool {
        self.raw_args
    }

    /// Metadata attached with [`CommandSpec::data`].
    pub fn data(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.data
    }

    pub fn datum(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Name of the owning gear.
    pub fn gear(&self) -> &str {
        &self.gear
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Usage text for `prefix`.
    ///
    /// Declared usage lines are joined with newlines; without any, the line
    /// is generated as `<prefix><name> (required) <optional>`.
    pub fn usage(&self, prefix: &str) -> String {
        let text = if self.usage.is_empty() {
            let mut line = format!("<PREFIX>{}", self.name);
            for param in &self.params {
                line.push(' ');
                line.push_str(&param.usage_token());
            }
            line
        } else {
            self.render(&self.usage)
        };
        text.replace("<PREFIX>", prefix)
    }

    /// Example lines for `prefix`, empty when none are declared.
    pub fn examples(&self, prefix: &str) -> String {
        self.render(&self.examples).replace("<PREFIX>", prefix)
    }

    fn render(&self, templates: &[String]) -> String {
        templates
            .iter()
            .map(|t| t.replace("<NAME>", &self.name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Bind `tail` and call the handler.
    pub fn invoke(
        &self,
        tail: &str,
        ctx: &C,
        registries: &Registries<C>,
    ) -> Result<Outcome<R>, CommandError> {
        if !self.is_enabled() {
            return Ok(Outcome::Disabled {
                gear: self.gear.clone(),
            });
        }

        let tokens = Tokens::new(tail);
        let mut bound: Vec<Option<Value>> = vec![None; self.params.len()];

        if self.raw_args {
            if !tokens.is_empty() {
                let param = &self.params[0];
                let value = match param.arg_kind() {
                    ArgKind::TextList => Value::TextList(tokens.tail(0)),
                    _ => Value::Text(tokens.rest(0).to_string()),
                };
                bound[0] = Some(registries.validators.apply(param, value)?);
            }
        } else {
            let variadic = self
                .params
                .last()
                .is_some_and(|p| p.arg_kind().is_variadic());
            if tokens.len() > self.params.len() && !variadic {
                return Err(CommandError::TooManyArguments {
                    command: self.name.clone(),
                    expected: self.params.len(),
                    given: tokens.len(),
                });
            }

            for (index, param) in self.params.iter().enumerate() {
                let Some(token) = tokens.get(index) else {
                    break;
                };
                let last = index + 1 == self.params.len();
                let value = match param.arg_kind() {
                    ArgKind::TextList => Value::TextList(tokens.tail(index)),
                    ArgKind::Text if last => Value::Text(tokens.rest(index).to_string()),
                    _ => self.transform(token, param, ctx, &registries.transformers)?,
                };
                bound[index] = Some(registries.validators.apply(param, value)?);
            }
        }

        let args = self.collect(bound)?;
        tracing::debug!(command = %self.name, args = args.len(), "invoking handler");
        (self.handler)(ctx, &args)
            .map(Outcome::Completed)
            .map_err(CommandError::from_handler)
    }

    fn transform(
        &self,
        token: &str,
        param: &Param,
        ctx: &C,
        transformers: &TransformerRegistry<C>,
    ) -> Result<Value, CommandError> {
        transformers
            .parse(token, param, ctx)
            .map_err(|failure| match failure {
                ParseFailure::Missing(kind) => CommandError::MissingTransformer {
                    parameter: param.name().to_string(),
                    kind,
                },
                ParseFailure::Rejected => CommandError::TransformerParse {
                    parameter: param.name().to_string(),
                    kind: param.kind().to_string(),
                    input: token.to_string(),
                },
            })
    }

    /// Fill defaults and report every required parameter left unbound.
    fn collect(&self, bound: Vec<Option<Value>>) -> Result<Args, CommandError> {
        let mut args = Args::new();
        let mut missing = Vec::new();
        for (param, value) in self.params.iter().zip(bound) {
            match value.or_else(|| param.default_value().cloned()) {
                Some(value) => args.push(param.name(), value),
                None => missing.push(param.name().to_string()),
            }
        }
        if missing.is_empty() {
            Ok(args)
        } else {
            Err(CommandError::MissingParameters(missing))
        }
    }

    /// Score how well `tail` fits this overload without binding it.
    pub fn soft_invoke(&self, tail: &str, ctx: &C, transformers: &TransformerRegistry<C>) -> usize {
        if !self.is_enabled() || tail.trim().is_empty() {
            return 0;
        }
        if self.raw_args {
            return 1;
        }

        Tokens::new(tail)
            .iter()
            .zip(&self.params)
            .map(|(token, param)| match param.arg_kind() {
                ArgKind::Text | ArgKind::TextList => 1,
                _ if transformers.parse(token, param, ctx).is_ok() => 2,
                _ => 0,
            })
            .sum()
    }
}

impl<C, R> fmt::Debug for InternalCommand<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InternalCommand")
            .field("name", &self.name)
            .field("gear", &self.gear)
            .field("aliases", &self.aliases)
            .field("raw_args", &self.raw_args)
            .field("params", &self.params)
            .finish()
    }
}

fn check_params(command: &str, params: &[Param]) -> Result<(), RegistrationError> {
    for (index, param) in params.iter().enumerate() {
        if params[..index].iter().any(|p| p.name() == param.name()) {
            return Err(RegistrationError::InvalidParameters {
                command: command.to_string(),
                reason: format!("parameter '{}' is declared twice", param.name()),
            });
        }
        if param.arg_kind() == ArgKind::TextList && index + 1 != params.len() {
            return Err(RegistrationError::InvalidParameters {
                command: command.to_string(),
                reason: format!("text-list parameter '{}' must be the last one", param.name()),
            });
        }
    }
    Ok(())
}

fn check_raw_args(command: &str, params: &[Param]) -> Result<(), RegistrationError> {
    let invalid = |reason: String| RegistrationError::InvalidRawArgs {
        command: command.to_string(),
        reason,
    };
    match params {
        [param] if matches!(param.arg_kind(), ArgKind::Text | ArgKind::TextList) => Ok(()),
        [param] => Err(invalid(format!(
            "parameter '{}' must be text or text-list, found {}",
            param.name(),
            param.kind()
        ))),
        _ => Err(invalid(format!(
            "expected exactly one parameter, found {}",
            params.len()
        ))),
    }
}
