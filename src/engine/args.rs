//! engine::args
//!
//! Bound arguments handed to a command handler.
//!
//! Values are stored in parameter order. Typed getters check the bound
//! value's kind and report a mismatch as
//! [`CommandError::InvalidParameterTypes`], so a handler can simply use `?`.
//!
//! # Example
//!
//! ```
//! use armada::core::types::Value;
//! use armada::engine::Args;
//!
//! let args = Args::from_pairs([("name", Value::Text("Alice".into())), ("times", Value::Int(3))]);
//! assert_eq!(args.text("name").unwrap(), "Alice");
//! assert_eq!(args.int("times").unwrap(), 3);
//! assert!(args.int("name").is_err());
//! ```

use std::ops::RangeInclusive;

use url::Url;

use crate::core::types::{ArgKind, Argument, TimeUnit, Value};
use crate::error::{CommandError, ParameterMismatch};

/// Arguments bound to a command's parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<(String, Value)>,
}

macro_rules! copy_getter {
    ($(#[$doc:meta])* $fn:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $fn(&self, name: &str) -> Result<$ty, CommandError> {
            match self.lookup(name)? {
                Value::$variant(v) => Ok(*v),
                other => Err(mismatch(name, ArgKind::$variant, other)),
            }
        }
    };
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs, in order.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self {
            values: pairs.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }

    pub(crate) fn push(&mut self, name: &str, value: Value) {
        self.values.push((name.to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    fn lookup(&self, name: &str) -> Result<&Value, CommandError> {
        self.get(name)
            .ok_or_else(|| CommandError::MissingParameters(vec![name.to_string()]))
    }

    pub fn text(&self, name: &str) -> Result<&str, CommandError> {
        match self.lookup(name)? {
            Value::Text(s) => Ok(s),
            other => Err(mismatch(name, ArgKind::Text, other)),
        }
    }

    pub fn text_list(&self, name: &str) -> Result<&[String], CommandError> {
        match self.lookup(name)? {
            Value::TextList(items) => Ok(items),
            other => Err(mismatch(name, ArgKind::TextList, other)),
        }
    }

    copy_getter!(int, Int, i32);
    copy_getter!(long, Long, i64);
    copy_getter!(short, Short, i16);
    copy_getter!(byte, Byte, i8);
    copy_getter!(float, Float, f32);
    copy_getter!(double, Double, f64);
    copy_getter!(char, Char, char);
    copy_getter!(bool, Bool, bool);
    copy_getter!(time_unit, TimeUnit, TimeUnit);

    pub fn argument(&self, name: &str) -> Result<&Argument, CommandError> {
        match self.lookup(name)? {
            Value::Argument(arg) => Ok(arg),
            other => Err(mismatch(name, ArgKind::Argument, other)),
        }
    }

    pub fn int_range(&self, name: &str) -> Result<RangeInclusive<i32>, CommandError> {
        match self.lookup(name)? {
            Value::IntRange(r) => Ok(r.clone()),
            other => Err(mismatch(name, ArgKind::IntRange, other)),
        }
    }

    pub fn long_range(&self, name: &str) -> Result<RangeInclusive<i64>, CommandError> {
        match self.lookup(name)? {
            Value::LongRange(r) => Ok(r.clone()),
            other => Err(mismatch(name, ArgKind::LongRange, other)),
        }
    }

    pub fn uint_range(&self, name: &str) -> Result<RangeInclusive<u32>, CommandError> {
        match self.lookup(name)? {
            Value::UIntRange(r) => Ok(r.clone()),
            other => Err(mismatch(name, ArgKind::UIntRange, other)),
        }
    }

    pub fn ulong_range(&self, name: &str) -> Result<RangeInclusive<u64>, CommandError> {
        match self.lookup(name)? {
            Value::ULongRange(r) => Ok(r.clone()),
            other => Err(mismatch(name, ArgKind::ULongRange, other)),
        }
    }

    pub fn url(&self, name: &str) -> Result<&Url, CommandError> {
        match self.lookup(name)? {
            Value::Url(url) => Ok(url),
            other => Err(mismatch(name, ArgKind::Url, other)),
        }
    }

    /// The declared spelling of the chosen option.
    pub fn choice(&self, name: &str) -> Result<&str, CommandError> {
        match self.lookup(name)? {
            Value::Choice(s) => Ok(s),
            other => Err(mismatch(name, ArgKind::Choice, other)),
        }
    }

    /// Both sides of a union; at least one is present.
    pub fn union(&self, name: &str) -> Result<(Option<&Value>, Option<&Value>), CommandError> {
        match self.lookup(name)? {
            Value::Union { first, second } => Ok((first.as_deref(), second.as_deref())),
            other => Err(mismatch(name, ArgKind::Union, other)),
        }
    }
}

fn mismatch(name: &str, expected: ArgKind, actual: &Value) -> CommandError {
    CommandError::InvalidParameterTypes(vec![ParameterMismatch {
        name: name.to_string(),
        expected,
        actual: actual.kind(),
    }])
}
