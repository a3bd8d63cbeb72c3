//! validate::builtin
//!
//! Validators installed by `CommandManagerBuilder::new`.

use crate::core::param::{Constraint, ConstraintKind};
use crate::core::types::Value;

use super::Validator;

/// Moves numeric values into `[min, max]`.
///
/// Integers are compared exactly against the integer part of the bounds.
/// Only NaN fails, since it has no place in any interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClampValidator;

impl Validator for ClampValidator {
    fn mutate(&self, constraint: &Constraint, value: Value) -> Value {
        let Constraint::Clamp { min, max } = constraint else {
            return value;
        };
        if let Some(n) = value.as_i64() {
            return match integer_bounds(*min, *max) {
                Some((lo, hi)) if lo <= hi && !(lo..=hi).contains(&i128::from(n)) => {
                    with_integer(value, i128::from(n).clamp(lo, hi))
                }
                _ => value,
            };
        }
        match value.as_f64() {
            Some(n) if min <= max && (n < *min || n > *max) => with_float(value, n.clamp(*min, *max)),
            _ => value,
        }
    }

    fn validate(&self, _: &Constraint, value: &Value) -> bool {
        !value.as_f64().is_some_and(f64::is_nan)
    }

    fn error(&self, _: &Constraint, value: &Value) -> String {
        format!("{} cannot be clamped", value)
    }
}

/// Rejects numeric values outside `[min, max]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeValidator;

impl Validator for RangeValidator {
    fn validate(&self, constraint: &Constraint, value: &Value) -> bool {
        let Constraint::Range { min, max } = constraint else {
            return true;
        };
        if let Some(n) = value.as_i64() {
            return integer_bounds(*min, *max)
                .is_some_and(|(lo, hi)| (lo..=hi).contains(&i128::from(n)));
        }
        match value.as_f64() {
            Some(n) => n >= *min && n <= *max,
            None => true,
        }
    }

    fn error(&self, constraint: &Constraint, value: &Value) -> String {
        match constraint {
            Constraint::Range { min, max } => {
                format!("{} is outside the range {} to {}", value, min, max)
            }
            other => format!("'{}' does not satisfy {}", value, other),
        }
    }
}

/// Rejects text made only of whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonBlankValidator;

impl Validator for NonBlankValidator {
    fn validate(&self, _: &Constraint, value: &Value) -> bool {
        match value {
            Value::TextList(items) => !items.is_empty(),
            other => other.as_text().map_or(true, |s| !s.trim().is_empty()),
        }
    }

    fn error(&self, _: &Constraint, _: &Value) -> String {
        "value cannot be blank".to_string()
    }
}

/// Rejects text longer than the limit, counted in characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxLengthValidator;

impl Validator for MaxLengthValidator {
    fn validate(&self, constraint: &Constraint, value: &Value) -> bool {
        match (constraint, value.as_text()) {
            (Constraint::MaxLength(limit), Some(s)) => s.chars().count() <= *limit,
            _ => true,
        }
    }

    fn error(&self, constraint: &Constraint, value: &Value) -> String {
        match constraint {
            Constraint::MaxLength(limit) => format!(
                "value is {} characters long, the limit is {}",
                value.as_text().map_or(0, |s| s.chars().count()),
                limit
            ),
            other => format!("'{}' does not satisfy {}", value, other),
        }
    }
}

/// The integers inside `[min, max]`, `None` if either bound is NaN.
fn integer_bounds(min: f64, max: f64) -> Option<(i128, i128)> {
    if min.is_nan() || max.is_nan() {
        return None;
    }
    Some((min.ceil() as i128, max.floor() as i128))
}

/// Replace the integer in `value`, saturating at the bounds of its kind.
fn with_integer(value: Value, n: i128) -> Value {
    fn fit<T: TryFrom<i128> + Copy>(n: i128, lo: T, hi: T) -> T {
        T::try_from(n).unwrap_or(if n < 0 { lo } else { hi })
    }
    match value {
        Value::Int(_) => Value::Int(fit(n, i32::MIN, i32::MAX)),
        Value::Long(_) => Value::Long(fit(n, i64::MIN, i64::MAX)),
        Value::Short(_) => Value::Short(fit(n, i16::MIN, i16::MAX)),
        Value::Byte(_) => Value::Byte(fit(n, i8::MIN, i8::MAX)),
        other => other,
    }
}

fn with_float(value: Value, n: f64) -> Value {
    match value {
        Value::Float(_) => Value::Float(n as f32),
        Value::Double(_) => Value::Double(n),
        other => other,
    }
}

/// Every built-in validator with its kind.
pub fn validators() -> Vec<(ConstraintKind, Box<dyn Validator>)> {
    vec![
        (ConstraintKind::Clamp, Box::new(ClampValidator) as Box<dyn Validator>),
        (ConstraintKind::Range, Box::new(RangeValidator) as Box<dyn Validator>),
        (ConstraintKind::NonBlank, Box::new(NonBlankValidator) as Box<dyn Validator>),
        (ConstraintKind::MaxLength, Box::new(MaxLengthValidator) as Box<dyn Validator>),
    ]
}
