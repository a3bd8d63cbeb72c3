//! core::param
//!
//! Parameter declarations and constraints.
//!
//! A [`Param`] is the explicit stand-in for a reflected function parameter:
//! a name, a [`ParamKind`], an optional default and a list of
//! [`Constraint`]s that validators enforce after parsing.
//!
//! # Example
//!
//! ```
//! use armada::core::param::{Constraint, Param};
//! use armada::core::types::{ParamKind, Value};
//!
//! let times = Param::new("times", ParamKind::Int)
//!     .default(Value::Int(1))
//!     .constraint(Constraint::clamp(1.0, 10.0));
//!
//! assert!(times.is_optional());
//! assert_eq!(times.usage_token(), "<times>");
//! ```

use std::fmt;

use serde::Serialize;

use super::types::{ArgKind, ParamKind, Value};

/// A declared command parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    kind: ParamKind,
    default: Option<Value>,
    constraints: Vec<Constraint>,
}

impl Param {
    /// Declare a required parameter.
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            constraints: Vec::new(),
        }
    }

    /// Make the parameter optional, bound to `value` when omitted.
    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Attach a constraint checked after parsing.
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ParamKind {
        &self.kind
    }

    pub fn arg_kind(&self) -> ArgKind {
        self.kind.arg_kind()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    /// Token shown in generated usage: `(name)` when required, `<name>` when optional.
    pub fn usage_token(&self) -> String {
        if self.is_optional() {
            format!("<{}>", self.name)
        } else {
            format!("({})", self.name)
        }
    }
}

/// Constraint attached to a parameter and enforced by validators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Numeric value is moved into `[min, max]`.
    Clamp { min: f64, max: f64 },
    /// Numeric value must lie within `[min, max]`.
    Range { min: f64, max: f64 },
    /// Text must contain a non-whitespace character.
    NonBlank,
    /// Text must not exceed this many characters.
    MaxLength(usize),
}

impl Constraint {
    pub fn clamp(min: f64, max: f64) -> Self {
        Constraint::Clamp { min, max }
    }

    pub fn range(min: f64, max: f64) -> Self {
        Constraint::Range { min, max }
    }

    /// The validator registry key.
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Clamp { .. } => ConstraintKind::Clamp,
            Constraint::Range { .. } => ConstraintKind::Range,
            Constraint::NonBlank => ConstraintKind::NonBlank,
            Constraint::MaxLength(_) => ConstraintKind::MaxLength,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Clamp { min, max } => write!(f, "clamp({}, {})", min, max),
            Constraint::Range { min, max } => write!(f, "range({}, {})", min, max),
            Constraint::NonBlank => f.write_str("non-blank"),
            Constraint::MaxLength(n) => write!(f, "max-length({})", n),
        }
    }
}

/// Fieldless key identifying a family of constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ConstraintKind {
    Clamp,
    Range,
    NonBlank,
    MaxLength,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintKind::Clamp => "clamp",
            ConstraintKind::Range => "range",
            ConstraintKind::NonBlank => "non-blank",
            ConstraintKind::MaxLength => "max-length",
        };
        f.write_str(name)
    }
}
