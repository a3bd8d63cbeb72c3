//! transform::builtin
//!
//! Transformers installed by `CommandManagerBuilder::new`.
//!
//! Numeric transformers ignore `,` and `_` digit separators, so `1,000`
//! and `1_000` both parse as one thousand.

use crate::core::param::Param;
use crate::core::types::{parse_range, ArgKind, Argument, ParamKind, TimeUnit, Value};

use url::Url;

use super::Transformer;

fn strip_separators(input: &str) -> String {
    input.chars().filter(|c| *c != ',' && *c != '_').collect()
}

macro_rules! number_transformer {
    ($name:ident, $ty:ty, $variant:ident) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl<C> Transformer<C> for $name {
            fn parse(&self, input: &str, _: &Param, _: &C) -> Option<Value> {
                strip_separators(input).parse::<$ty>().ok().map(Value::$variant)
            }
        }
    };
}

number_transformer!(IntTransformer, i32, Int);
number_transformer!(LongTransformer, i64, Long);
number_transformer!(ShortTransformer, i16, Short);
number_transformer!(ByteTransformer, i8, Byte);
number_transformer!(FloatTransformer, f32, Float);
number_transformer!(DoubleTransformer, f64, Double);

/// Identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTransformer;

impl<C> Transformer<C> for TextTransformer {
    fn parse(&self, input: &str, _: &Param, _: &C) -> Option<Value> {
        Some(Value::Text(input.to_string()))
    }
}

/// Exactly one character.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharTransformer;

impl<C> Transformer<C> for CharTransformer {
    fn parse(&self, input: &str, _: &Param, _: &C) -> Option<Value> {
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(Value::Char(c)),
            _ => None,
        }
    }
}

/// `true` in any case is true; every other token is false.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolTransformer;

impl<C> Transformer<C> for BoolTransformer {
    fn parse(&self, input: &str, _: &Param, _: &C) -> Option<Value> {
        Some(Value::Bool(input.eq_ignore_ascii_case("true")))
    }
}

/// Keeps the raw token for the handler to convert.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentTransformer;

impl<C> Transformer<C> for ArgumentTransformer {
    fn parse(&self, input: &str, _: &Param, _: &C) -> Option<Value> {
        Some(Value::Argument(Argument::new(input)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeUnitTransformer;

impl<C> Transformer<C> for TimeUnitTransformer {
    fn parse(&self, input: &str, _: &Param, _: &C) -> Option<Value> {
        input.parse::<TimeUnit>().ok().map(Value::TimeUnit)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntRangeTransformer;

impl<C> Transformer<C> for IntRangeTransformer {
    fn parse(&self, input: &str, _: &Param, _: &C) -> Option<Value> {
        parse_range::<i32>(input).ok().map(Value::IntRange)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LongRangeTransformer;

impl<C> Transformer<C> for LongRangeTransformer {
    fn parse(&self, input: &str, _: &Param, _: &C) -> Option<Value> {
        parse_range::<i64>(input).ok().map(Value::LongRange)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UIntRangeTransformer;

impl<C> Transformer<C> for UIntRangeTransformer {
    fn parse(&self, input: &str, _: &Param, _: &C) -> Option<Value> {
        parse_range::<u32>(input).ok().map(Value::UIntRange)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ULongRangeTransformer;

impl<C> Transformer<C> for ULongRangeTransformer {
    fn parse(&self, input: &str, _: &Param, _: &C) -> Option<Value> {
        parse_range::<u64>(input).ok().map(Value::ULongRange)
    }
}

/// Absolute URLs only; relative references do not parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlTransformer;

impl<C> Transformer<C> for UrlTransformer {
    fn parse(&self, input: &str, _: &Param, _: &C) -> Option<Value> {
        Url::parse(input).ok().map(Value::Url)
    }
}

/// Case-insensitive match against the declared choices.
///
/// Produces the declared spelling, not the input's.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChoiceTransformer;

impl<C> Transformer<C> for ChoiceTransformer {
    fn parse(&self, input: &str, param: &Param, _: &C) -> Option<Value> {
        match param.kind() {
            ParamKind::Choice(choices) => choices
                .iter()
                .find(|choice| choice.eq_ignore_ascii_case(input))
                .map(|choice| Value::Choice(choice.clone())),
            _ => None,
        }
    }
}

/// Every built-in transformer with its kind.
pub fn transformers<C>() -> Vec<(ArgKind, Box<dyn Transformer<C>>)> {
    vec![
        entry(ArgKind::Text, TextTransformer),
        entry(ArgKind::Int, IntTransformer),
        entry(ArgKind::Long, LongTransformer),
        entry(ArgKind::Short, ShortTransformer),
        entry(ArgKind::Byte, ByteTransformer),
        entry(ArgKind::Float, FloatTransformer),
        entry(ArgKind::Double, DoubleTransformer),
        entry(ArgKind::Char, CharTransformer),
        entry(ArgKind::Bool, BoolTransformer),
        entry(ArgKind::Argument, ArgumentTransformer),
        entry(ArgKind::TimeUnit, TimeUnitTransformer),
        entry(ArgKind::IntRange, IntRangeTransformer),
        entry(ArgKind::LongRange, LongRangeTransformer),
        entry(ArgKind::UIntRange, UIntRangeTransformer),
        entry(ArgKind::ULongRange, ULongRangeTransformer),
        entry(ArgKind::Url, UrlTransformer),
        entry(ArgKind::Choice, ChoiceTransformer),
    ]
}

fn entry<C, T>(kind: ArgKind, transformer: T) -> (ArgKind, Box<dyn Transformer<C>>)
where
    T: Transformer<C> + 'static,
{
    (kind, Box::new(transformer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<T: Transformer<()>>(t: T, kind: ParamKind, input: &str) -> Option<Value> {
        t.parse(input, &Param::new("p", kind), &())
    }

    #[test]
    fn numbers_ignore_separators() {
        assert_eq!(
            parse(IntTransformer, ParamKind::Int, "1,000"),
            Some(Value::Int(1000))
        );
        assert_eq!(
            parse(LongTransformer, ParamKind::Long, "9_000_000_000"),
            Some(Value::Long(9_000_000_000))
        );
        assert_eq!(
            parse(DoubleTransformer, ParamKind::Double, "1,234.5"),
            Some(Value::Double(1234.5))
        );
    }

    #[test]
    fn numbers_reject_overflow_and_junk() {
        assert_eq!(parse(ByteTransformer, ParamKind::Byte, "128"), None);
        assert_eq!(parse(ShortTransformer, ParamKind::Short, "-32768"), Some(Value::Short(-32768)));
        assert_eq!(parse(IntTransformer, ParamKind::Int, "12a"), None);
        assert_eq!(parse(IntTransformer, ParamKind::Int, "1.5"), None);
    }

    #[test]
    fn char_needs_exactly_one() {
        assert_eq!(parse(CharTransformer, ParamKind::Char, "é"), Some(Value::Char('é')));
        assert_eq!(parse(CharTransformer, ParamKind::Char, "ab"), None);
        assert_eq!(parse(CharTransformer, ParamKind::Char, ""), None);
    }

    #[test]
    fn bool_is_lenient() {
        assert_eq!(parse(BoolTransformer, ParamKind::Bool, "TRUE"), Some(Value::Bool(true)));
        assert_eq!(parse(BoolTransformer, ParamKind::Bool, "yes"), Some(Value::Bool(false)));
    }

    #[test]
    fn choice_returns_declared_spelling() {
        let kind = ParamKind::choice(["Red", "Green"]);
        assert_eq!(
            parse(ChoiceTransformer, kind.clone(), "red"),
            Some(Value::Choice("Red".into()))
        );
        assert_eq!(parse(ChoiceTransformer, kind, "blue"), None);
        assert_eq!(parse(ChoiceTransformer, ParamKind::Text, "red"), None);
    }

    #[test]
    fn ranges_and_units() {
        assert_eq!(
            parse(IntRangeTransformer, ParamKind::IntRange, "0..10"),
            Some(Value::IntRange(0..=10))
        );
        assert_eq!(
            parse(TimeUnitTransformer, ParamKind::TimeUnit, "Minutes"),
            Some(Value::TimeUnit(TimeUnit::Minutes))
        );
        assert_eq!(parse(TimeUnitTransformer, ParamKind::TimeUnit, "parsecs"), None);
    }

    #[test]
    fn unsigned_ranges_reject_negatives() {
        assert_eq!(
            parse(UIntRangeTransformer, ParamKind::UIntRange, "3..4000000000"),
            Some(Value::UIntRange(3..=4_000_000_000))
        );
        assert_eq!(parse(UIntRangeTransformer, ParamKind::UIntRange, "-1..4"), None);
        assert_eq!(
            parse(ULongRangeTransformer, ParamKind::ULongRange, "0..18446744073709551615"),
            Some(Value::ULongRange(0..=u64::MAX))
        );
    }

    #[test]
    fn urls_must_be_absolute() {
        match parse(UrlTransformer, ParamKind::Url, "https://example.com/path") {
            Some(Value::Url(url)) => assert_eq!(url.host_str(), Some("example.com")),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(parse(UrlTransformer, ParamKind::Url, "/relative/path"), None);
        assert_eq!(parse(UrlTransformer, ParamKind::Url, "not a url"), None);
    }

    #[test]
    fn argument_keeps_token() {
        let value = parse(ArgumentTransformer, ParamKind::Argument, "42").unwrap();
        match value {
            Value::Argument(arg) => assert_eq!(arg.as_i64(), Some(42)),
            other => panic!("unexpected {:?}", other),
        }
    }
}
