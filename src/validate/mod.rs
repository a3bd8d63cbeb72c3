//! validate
//!
//! Validators enforce parameter [`Constraint`]s after a token has been
//! transformed.
//!
//! # Pipeline
//!
//! For each constraint on a parameter, in declaration order, every
//! validator registered for the constraint's [`ConstraintKind`] runs in
//! registration order:
//!
//! 1. `mutate` may replace the value (clamping, normalization)
//! 2. `validate` checks the possibly mutated value
//! 3. on failure, `error` describes the problem to the user
//!
//! # Registry
//!
//! Like transformers, each kind can be registered once. Registering the
//! same kind again fails and leaves the first list untouched.

pub mod builtin;

use std::collections::HashMap;
use std::fmt;

use crate::core::param::{Constraint, ConstraintKind, Param};
use crate::core::types::Value;
use crate::error::{CommandError, RegistrationError};

/// Checks (and optionally adjusts) a parsed value against a constraint.
pub trait Validator: Send + Sync {
    /// Adjust the value before it is checked.
    fn mutate(&self, _constraint: &Constraint, value: Value) -> Value {
        value
    }

    fn validate(&self, constraint: &Constraint, value: &Value) -> bool;

    fn error(&self, constraint: &Constraint, value: &Value) -> String {
        format!("'{}' does not satisfy {}", value, constraint)
    }
}

/// Validator lists keyed by constraint kind.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: HashMap<ConstraintKind, Vec<Box<dyn Validator>>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in validator.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (kind, validator) in builtin::validators() {
            registry.validators.insert(kind, vec![validator]);
        }
        registry
    }

    /// Register the validators for `kind`.
    ///
    /// # Errors
    ///
    /// `RegistrationError::DuplicateValidator` if `kind` is already registered.
    pub fn insert(
        &mut self,
        kind: ConstraintKind,
        validators: Vec<Box<dyn Validator>>,
    ) -> Result<(), RegistrationError> {
        if self.validators.contains_key(&kind) {
            return Err(RegistrationError::DuplicateValidator(kind));
        }
        self.validators.insert(kind, validators);
        Ok(())
    }

    pub fn get(&self, kind: ConstraintKind) -> &[Box<dyn Validator>] {
        self.validators.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether at least one validator handles `kind`.
    pub fn contains(&self, kind: ConstraintKind) -> bool {
        self.validators.get(&kind).is_some_and(|v| !v.is_empty())
    }

    pub fn kinds(&self) -> Vec<ConstraintKind> {
        let mut kinds: Vec<_> = self.validators.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Run every constraint of `param` over `value`.
    ///
    /// Returns the (possibly mutated) value.
    pub fn apply(&self, param: &Param, mut value: Value) -> Result<Value, CommandError> {
        for constraint in param.constraints() {
            for validator in self.get(constraint.kind()) {
                value = validator.mutate(constraint, value);
                if !validator.validate(constraint, &value) {
                    return Err(CommandError::Validation {
                        parameter: param.name().to_string(),
                        message: validator.error(constraint, &value),
                    });
                }
            }
        }
        Ok(value)
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ParamKind;

    struct Even;

    impl Validator for Even {
        fn validate(&self, _: &Constraint, value: &Value) -> bool {
            matches!(value, Value::Int(n) if n % 2 == 0)
        }

        fn error(&self, _: &Constraint, value: &Value) -> String {
            format!("{} is odd", value)
        }
    }

    #[test]
    fn duplicate_kind_rejected() {
        let mut registry = ValidatorRegistry::with_builtins();
        let err = registry
            .insert(ConstraintKind::Range, vec![Box::new(Even)])
            .unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateValidator(ConstraintKind::Range));
        assert_eq!(registry.get(ConstraintKind::Range).len(), 1);
    }

    #[test]
    fn apply_without_constraints_is_identity() {
        let registry = ValidatorRegistry::new();
        let param = Param::new("n", ParamKind::Int);
        assert_eq!(registry.apply(&param, Value::Int(3)).unwrap(), Value::Int(3));
    }

    #[test]
    fn custom_validator_error_names_parameter() {
        let mut registry = ValidatorRegistry::new();
        registry
            .insert(ConstraintKind::Range, vec![Box::new(Even)])
            .unwrap();
        let param = Param::new("n", ParamKind::Int).constraint(Constraint::range(0.0, 10.0));

        match registry.apply(&param, Value::Int(3)) {
            Err(CommandError::Validation { parameter, message }) => {
                assert_eq!(parameter, "n");
                assert_eq!(message, "3 is odd");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(registry.apply(&param, Value::Int(4)).is_ok());
    }

    #[test]
    fn mutation_happens_before_check() {
        let registry = ValidatorRegistry::with_builtins();
        let param = Param::new("pct", ParamKind::Int)
            .constraint(Constraint::clamp(0.0, 100.0))
            .constraint(Constraint::range(0.0, 100.0));
        assert_eq!(registry.apply(&param, Value::Int(101)).unwrap(), Value::Int(100));
        assert_eq!(registry.apply(&param, Value::Int(-1)).unwrap(), Value::Int(0));
    }
}
