//! core::types
//!
//! Strong types for argument kinds and parsed values.
//!
//! # Types
//!
//! - [`ArgKind`] - Closed set of argument kinds (transformer registry key)
//! - [`ParamKind`] - Declared kind of a parameter, possibly carrying data
//! - [`Value`] - A parsed argument value
//! - [`Argument`] - Wildcard argument that keeps the raw token
//! - [`TimeUnit`] - Time unit names accepted on the command line
//!
//! Arbitrary-precision numbers have no kind of their own; an
//! [`ArgKind::Argument`] parameter keeps the token for the handler to parse
//! with whatever big-number type it uses.
//!
//! # Examples
//!
//! ```
//! use armada::core::types::{ArgKind, ParamKind, TimeUnit, Value};
//!
//! assert_eq!(ParamKind::Int.arg_kind(), ArgKind::Int);
//! assert_eq!(Value::Int(3).kind(), ArgKind::Int);
//! assert_eq!("ms".parse::<TimeUnit>().unwrap(), TimeUnit::Milliseconds);
//! ```

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Errors from type parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown time unit: {0}")]
    InvalidTimeUnit(String),

    #[error("invalid range '{0}', expected <start>..<end>")]
    InvalidRange(String),
}

/// The closed set of argument kinds understood by the dispatcher.
///
/// Transformers are registered per kind. Adding a kind means extending
/// this enum and [`crate::transform::builtin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ArgKind {
    Text,
    TextList,
    Int,
    Long,
    Short,
    Byte,
    Float,
    Double,
    Char,
    Bool,
    Argument,
    TimeUnit,
    IntRange,
    LongRange,
    UIntRange,
    ULongRange,
    Url,
    Choice,
    Union,
}

impl ArgKind {
    /// Every kind, in declaration order.
    pub const ALL: [ArgKind; 19] = [
        ArgKind::Text,
        ArgKind::TextList,
        ArgKind::Int,
        ArgKind::Long,
        ArgKind::Short,
        ArgKind::Byte,
        ArgKind::Float,
        ArgKind::Double,
        ArgKind::Char,
        ArgKind::Bool,
        ArgKind::Argument,
        ArgKind::TimeUnit,
        ArgKind::IntRange,
        ArgKind::LongRange,
        ArgKind::UIntRange,
        ArgKind::ULongRange,
        ArgKind::Url,
        ArgKind::Choice,
        ArgKind::Union,
    ];

    /// Human-readable name used in error messages and listings.
    pub fn name(&self) -> &'static str {
        match self {
            ArgKind::Text => "text",
            ArgKind::TextList => "text-list",
            ArgKind::Int => "int",
            ArgKind::Long => "long",
            ArgKind::Short => "short",
            ArgKind::Byte => "byte",
            ArgKind::Float => "float",
            ArgKind::Double => "double",
            ArgKind::Char => "char",
            ArgKind::Bool => "bool",
            ArgKind::Argument => "argument",
            ArgKind::TimeUnit => "time-unit",
            ArgKind::IntRange => "int-range",
            ArgKind::LongRange => "long-range",
            ArgKind::UIntRange => "uint-range",
            ArgKind::ULongRange => "ulong-range",
            ArgKind::Url => "url",
            ArgKind::Choice => "choice",
            ArgKind::Union => "union",
        }
    }

    /// Whether a trailing parameter of this kind absorbs surplus tokens.
    pub fn is_variadic(&self) -> bool {
        matches!(self, ArgKind::Text | ArgKind::TextList)
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared kind of a command parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    Text,
    TextList,
    Int,
    Long,
    Short,
    Byte,
    Float,
    Double,
    Char,
    Bool,
    Argument,
    TimeUnit,
    IntRange,
    LongRange,
    UIntRange,
    ULongRange,
    /// An absolute URL.
    Url,
    /// One of a fixed set of names, matched case-insensitively.
    Choice(Vec<String>),
    /// Either of two kinds; both are attempted.
    Union(Box<ParamKind>, Box<ParamKind>),
}

impl ParamKind {
    /// Convenience constructor for [`ParamKind::Choice`].
    pub fn choice<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParamKind::Choice(choices.into_iter().map(Into::into).collect())
    }

    /// Convenience constructor for [`ParamKind::Union`].
    pub fn union(first: ParamKind, second: ParamKind) -> Self {
        ParamKind::Union(Box::new(first), Box::new(second))
    }

    /// The registry key for this kind.
    pub fn arg_kind(&self) -> ArgKind {
        match self {
            ParamKind::Text => ArgKind::Text,
            ParamKind::TextList => ArgKind::TextList,
            ParamKind::Int => ArgKind::Int,
            ParamKind::Long => ArgKind::Long,
            ParamKind::Short => ArgKind::Short,
            ParamKind::Byte => ArgKind::Byte,
            ParamKind::Float => ArgKind::Float,
            ParamKind::Double => ArgKind::Double,
            ParamKind::Char => ArgKind::Char,
            ParamKind::Bool => ArgKind::Bool,
            ParamKind::Argument => ArgKind::Argument,
            ParamKind::TimeUnit => ArgKind::TimeUnit,
            ParamKind::IntRange => ArgKind::IntRange,
            ParamKind::LongRange => ArgKind::LongRange,
            ParamKind::UIntRange => ArgKind::UIntRange,
            ParamKind::ULongRange => ArgKind::ULongRange,
            ParamKind::Url => ArgKind::Url,
            ParamKind::Choice(_) => ArgKind::Choice,
            ParamKind::Union(_, _) => ArgKind::Union,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Choice(choices) => write!(f, "choice({})", choices.join("|")),
            ParamKind::Union(a, b) => write!(f, "union({}, {})", a, b),
            other => f.write_str(other.arg_kind().name()),
        }
    }
}

/// A parsed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    TextList(Vec<String>),
    Int(i32),
    Long(i64),
    Short(i16),
    Byte(i8),
    Float(f32),
    Double(f64),
    Char(char),
    Bool(bool),
    Argument(Argument),
    TimeUnit(TimeUnit),
    IntRange(RangeInclusive<i32>),
    LongRange(RangeInclusive<i64>),
    UIntRange(RangeInclusive<u32>),
    ULongRange(RangeInclusive<u64>),
    Url(Url),
    Choice(String),
    Union {
        first: Option<Box<Value>>,
        second: Option<Box<Value>>,
    },
}

impl Value {
    /// The kind this value was produced for.
    pub fn kind(&self) -> ArgKind {
        match self {
            Value::Text(_) => ArgKind::Text,
            Value::TextList(_) => ArgKind::TextList,
            Value::Int(_) => ArgKind::Int,
            Value::Long(_) => ArgKind::Long,
            Value::Short(_) => ArgKind::Short,
            Value::Byte(_) => ArgKind::Byte,
            Value::Float(_) => ArgKind::Float,
            Value::Double(_) => ArgKind::Double,
            Value::Char(_) => ArgKind::Char,
            Value::Bool(_) => ArgKind::Bool,
            Value::Argument(_) => ArgKind::Argument,
            Value::TimeUnit(_) => ArgKind::TimeUnit,
            Value::IntRange(_) => ArgKind::IntRange,
            Value::LongRange(_) => ArgKind::LongRange,
            Value::UIntRange(_) => ArgKind::UIntRange,
            Value::ULongRange(_) => ArgKind::ULongRange,
            Value::Url(_) => ArgKind::Url,
            Value::Choice(_) => ArgKind::Choice,
            Value::Union { .. } => ArgKind::Union,
        }
    }

    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(f64::from(*v)),
            Value::Long(v) => Some(*v as f64),
            Value::Short(v) => Some(f64::from(*v)),
            Value::Byte(v) => Some(f64::from(*v)),
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Exact view of an integer value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            Value::Short(v) => Some(i64::from(*v)),
            Value::Byte(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Text view of the value, if it is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Choice(s) => Some(s),
            Value::Argument(arg) => Some(arg.raw()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) | Value::Choice(s) => f.write_str(s),
            Value::TextList(items) => f.write_str(&items.join(" ")),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Char(c) => write!(f, "{}", c),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Argument(arg) => f.write_str(arg.raw()),
            Value::TimeUnit(unit) => write!(f, "{}", unit),
            Value::IntRange(r) => write!(f, "{}..{}", r.start(), r.end()),
            Value::LongRange(r) => write!(f, "{}..{}", r.start(), r.end()),
            Value::UIntRange(r) => write!(f, "{}..{}", r.start(), r.end()),
            Value::ULongRange(r) => write!(f, "{}..{}", r.start(), r.end()),
            Value::Url(url) => f.write_str(url.as_str()),
            Value::Union { first, second } => match (first, second) {
                (Some(v), _) | (None, Some(v)) => write!(f, "{}", v),
                (None, None) => f.write_str("<none>"),
            },
        }
    }
}

/// A wildcard argument whose type is decided by the handler.
///
/// Getters return `None` when the raw token does not convert.
///
/// # Example
///
/// ```
/// use armada::core::types::Argument;
///
/// let arg = Argument::new("42");
/// assert_eq!(arg.as_i32(), Some(42));
/// assert_eq!(arg.as_f64(), Some(42.0));
/// assert_eq!(arg.parse::<u8>(), Some(42));
/// assert_eq!(Argument::new("x").as_i32(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Argument(String);

impl Argument {
    /// Wrap a raw token.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token.
    pub fn raw(&self) -> &str {
        &self.0
    }

    pub fn as_i8(&self) -> Option<i8> {
        self.parse()
    }

    pub fn as_i16(&self) -> Option<i16> {
        self.parse()
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.parse()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.parse()
    }

    pub fn as_f32(&self) -> Option<f32> {
        self.parse()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.parse()
    }

    /// Parse the raw token into any [`FromStr`] type.
    pub fn parse<T: FromStr>(&self) -> Option<T> {
        self.0.parse().ok()
    }
}

/// Units of time accepted by [`ArgKind::TimeUnit`] parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Length of one unit in nanoseconds.
    pub fn nanos(&self) -> u64 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Microseconds => 1_000,
            TimeUnit::Milliseconds => 1_000_000,
            TimeUnit::Seconds => 1_000_000_000,
            TimeUnit::Minutes => 60 * 1_000_000_000,
            TimeUnit::Hours => 3_600 * 1_000_000_000,
            TimeUnit::Days => 86_400 * 1_000_000_000,
        }
    }

    /// Convert `amount` of this unit into `target` units.
    ///
    /// ```
    /// use armada::core::types::TimeUnit;
    ///
    /// assert_eq!(TimeUnit::Minutes.convert(2.0, TimeUnit::Seconds), 120.0);
    /// assert_eq!(TimeUnit::Milliseconds.convert(1500.0, TimeUnit::Seconds), 1.5);
    /// ```
    pub fn convert(&self, amount: f64, target: TimeUnit) -> f64 {
        amount * self.nanos() as f64 / target.nanos() as f64
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "nanoseconds",
            TimeUnit::Microseconds => "microseconds",
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.to_ascii_lowercase().as_str() {
            "ns" | "nano" | "nanos" | "nanosecond" | "nanoseconds" => TimeUnit::Nanoseconds,
            "us" | "µs" | "micro" | "micros" | "microsecond" | "microseconds" => {
                TimeUnit::Microseconds
            }
            "ms" | "milli" | "millis" | "millisecond" | "milliseconds" => TimeUnit::Milliseconds,
            "s" | "sec" | "secs" | "second" | "seconds" => TimeUnit::Seconds,
            "m" | "min" | "mins" | "minute" | "minutes" => TimeUnit::Minutes,
            "h" | "hr" | "hrs" | "hour" | "hours" => TimeUnit::Hours,
            "d" | "day" | "days" => TimeUnit::Days,
            _ => return Err(TypeError::InvalidTimeUnit(s.to_string())),
        };
        Ok(unit)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an inclusive `start..end` range.
///
/// ```
/// use armada::core::types::parse_range;
///
/// assert_eq!(parse_range::<i32>("1..5").unwrap(), 1..=5);
/// assert!(parse_range::<i32>("1-5").is_err());
/// ```
pub fn parse_range<T: FromStr>(input: &str) -> Result<RangeInclusive<T>, TypeError> {
    let (start, end) = input
        .split_once("..")
        .ok_or_else(|| TypeError::InvalidRange(input.to_string()))?;
    let start = start
        .trim()
        .parse()
        .map_err(|_| TypeError::InvalidRange(input.to_string()))?;
    let end = end
        .trim()
        .parse()
        .map_err(|_| TypeError::InvalidRange(input.to_string()))?;
    Ok(start..=end)
}
