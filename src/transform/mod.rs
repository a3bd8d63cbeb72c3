//! transform
//!
//! Transformers turn a single token into a typed [`Value`].
//!
//! # Registry
//!
//! [`TransformerRegistry`] holds at most one transformer per [`ArgKind`].
//! A second registration for the same kind is rejected and the first one
//! stays in place.
//!
//! # Special kinds
//!
//! - `TextList` has no transformer: it is only bound as a trailing or
//!   raw-args parameter, straight from the tokens.
//! - `Union` has no transformer either: the token is handed to the
//!   transformers of both alternatives, see [`TransformerRegistry::parse`].
//!
//! # Example
//!
//! ```
//! use armada::core::param::Param;
//! use armada::core::types::{ArgKind, ParamKind, Value};
//! use armada::transform::{FnTransformer, TransformerRegistry};
//!
//! let mut registry: TransformerRegistry<()> = TransformerRegistry::new();
//! registry
//!     .insert(
//!         ArgKind::Int,
//!         Box::new(FnTransformer::new(|input: &str, _: &Param, _: &()| {
//!             input.parse().ok().map(Value::Int)
//!         })),
//!     )
//!     .unwrap();
//!
//! let param = Param::new("n", ParamKind::Int);
//! assert_eq!(registry.parse("7", &param, &()), Ok(Value::Int(7)));
//! ```

pub mod builtin;

use std::collections::HashMap;
use std::fmt;

use crate::core::param::Param;
use crate::core::types::{ArgKind, Argument, ParamKind, Value};
use crate::error::RegistrationError;

/// Converts one input token into a value of a single kind.
///
/// Returning `None` means the token does not parse; the caller decides
/// whether that is an error (invocation) or a zero score (overload scoring).
pub trait Transformer<C>: Send + Sync {
    fn parse(&self, input: &str, param: &Param, ctx: &C) -> Option<Value>;
}

/// Adapter that lets a closure act as a [`Transformer`].
pub struct FnTransformer<F>(F);

impl<F> FnTransformer<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<C, F> Transformer<C> for FnTransformer<F>
where
    F: Fn(&str, &Param, &C) -> Option<Value> + Send + Sync,
{
    fn parse(&self, input: &str, param: &Param, ctx: &C) -> Option<Value> {
        (self.0)(input, param, ctx)
    }
}

/// Why a token could not be turned into a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// No transformer is registered for this kind.
    Missing(ArgKind),
    /// The transformer rejected the token.
    Rejected,
}

/// Transformers keyed by argument kind.
pub struct TransformerRegistry<C> {
    transformers: HashMap<ArgKind, Box<dyn Transformer<C>>>,
}

impl<C> Default for TransformerRegistry<C> {
    fn default() -> Self {
        Self {
            transformers: HashMap::new(),
        }
    }
}

impl<C> TransformerRegistry<C> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in transformer.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (kind, transformer) in builtin::transformers() {
            registry.transformers.insert(kind, transformer);
        }
        registry
    }

    /// Register `transformer` for `kind`.
    ///
    /// # Errors
    ///
    /// `RegistrationError::DuplicateTransformer` if `kind` already has one.
    pub fn insert(
        &mut self,
        kind: ArgKind,
        transformer: Box<dyn Transformer<C>>,
    ) -> Result<(), RegistrationError> {
        if self.transformers.contains_key(&kind) {
            return Err(RegistrationError::DuplicateTransformer(kind));
        }
        self.transformers.insert(kind, transformer);
        Ok(())
    }

    pub fn get(&self, kind: ArgKind) -> Option<&dyn Transformer<C>> {
        self.transformers.get(&kind).map(Box::as_ref)
    }

    pub fn contains(&self, kind: ArgKind) -> bool {
        self.transformers.contains_key(&kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<ArgKind> {
        let mut kinds: Vec<_> = self.transformers.keys().copied().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Parse `input` for `param`.
    ///
    /// `Union` parameters try both alternatives and succeed when at least
    /// one side parses; a side without a transformer counts as not parsing.
    pub fn parse(&self, input: &str, param: &Param, ctx: &C) -> Result<Value, ParseFailure> {
        match param.kind() {
            ParamKind::Union(first, second) => {
                let first = self.parse_alternative(input, param, first, ctx);
                let second = self.parse_alternative(input, param, second, ctx);
                if first.is_none() && second.is_none() {
                    return Err(ParseFailure::Rejected);
                }
                Ok(Value::Union {
                    first: first.map(Box::new),
                    second: second.map(Box::new),
                })
            }
            kind => {
                let kind = kind.arg_kind();
                let transformer = self.get(kind).ok_or(ParseFailure::Missing(kind))?;
                transformer
                    .parse(input, param, ctx)
                    .ok_or(ParseFailure::Rejected)
            }
        }
    }

    /// Convert a wildcard argument into a value of `kind`.
    pub fn convert(&self, argument: &Argument, kind: ParamKind, ctx: &C) -> Result<Value, ParseFailure> {
        self.parse(argument.raw(), &Param::new("argument", kind), ctx)
    }

    fn parse_alternative(
        &self,
        input: &str,
        param: &Param,
        kind: &ParamKind,
        ctx: &C,
    ) -> Option<Value> {
        let alternative = Param::new(param.name(), kind.clone());
        self.parse(input, &alternative, ctx).ok()
    }
}

impl<C> fmt::Debug for TransformerRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_param() -> Param {
        Param::new("n", ParamKind::Int)
    }

    #[test]
    fn builtins_cover_every_kind_but_list_and_union() {
        let registry: TransformerRegistry<()> = TransformerRegistry::with_builtins();
        for kind in ArgKind::ALL {
            let expected = !matches!(kind, ArgKind::TextList | ArgKind::Union);
            assert_eq!(registry.contains(kind), expected, "{}", kind);
        }
    }

    #[test]
    fn duplicate_insert_keeps_first() {
        let mut registry: TransformerRegistry<()> = TransformerRegistry::with_builtins();
        let err = registry
            .insert(
                ArgKind::Int,
                Box::new(FnTransformer::new(|_: &str, _: &Param, _: &()| {
                    Some(Value::Int(-1))
                })),
            )
            .unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateTransformer(ArgKind::Int));
        assert_eq!(registry.parse("5", &int_param(), &()), Ok(Value::Int(5)));
    }

    #[test]
    fn missing_transformer_is_reported() {
        let registry: TransformerRegistry<()> = TransformerRegistry::new();
        assert_eq!(
            registry.parse("5", &int_param(), &()),
            Err(ParseFailure::Missing(ArgKind::Int))
        );
    }

    #[test]
    fn union_parses_both_sides() {
        let registry: TransformerRegistry<()> = TransformerRegistry::with_builtins();
        let param = Param::new("amount", ParamKind::union(ParamKind::Int, ParamKind::Double));

        assert_eq!(
            registry.parse("2", &param, &()),
            Ok(Value::Union {
                first: Some(Box::new(Value::Int(2))),
                second: Some(Box::new(Value::Double(2.0))),
            })
        );
        assert_eq!(
            registry.parse("2.5", &param, &()),
            Ok(Value::Union {
                first: None,
                second: Some(Box::new(Value::Double(2.5))),
            })
        );
        assert_eq!(registry.parse("x", &param, &()), Err(ParseFailure::Rejected));
    }

    #[test]
    fn arguments_convert_after_binding() {
        let registry: TransformerRegistry<()> = TransformerRegistry::with_builtins();
        let argument = Argument::new("1..5");
        assert_eq!(
            registry.convert(&argument, ParamKind::UIntRange, &()),
            Ok(Value::UIntRange(1..=5))
        );
        assert_eq!(
            registry.convert(&argument, ParamKind::Int, &()),
            Err(ParseFailure::Rejected)
        );
        assert_eq!(
            TransformerRegistry::<()>::new().convert(&argument, ParamKind::Url, &()),
            Err(ParseFailure::Missing(ArgKind::Url))
        );
    }

    #[test]
    fn context_reaches_transformer() {
        let mut registry: TransformerRegistry<i32> = TransformerRegistry::new();
        registry
            .insert(
                ArgKind::Int,
                Box::new(FnTransformer::new(|input: &str, _: &Param, offset: &i32| {
                    input.parse::<i32>().ok().map(|n| Value::Int(n + offset))
                })),
            )
            .unwrap();
        assert_eq!(registry.parse("1", &int_param(), &10), Ok(Value::Int(11)));
    }
}
