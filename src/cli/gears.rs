//! cli::gears
//!
//! The demo gears served by the `armada` binary.
//!
//! # Gears
//!
//! - `core` - `echo` (raw arguments), `shout`/`yell`, `whoami`
//! - `greetings` - `greet name [times]`
//! - `math` - `add` overloads for integers and decimals, `repeat` with a
//!   clamped count
//! - `time` - `convert amount from to`

use crate::core::param::{Constraint, Param};
use crate::core::types::{ParamKind, Value};
use crate::engine::{CommandManagerBuilder, CommandSpec, Gear};
use crate::error::RegistrationError;

/// Caller context handed to every demo command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: String,
}

impl Session {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }
}

/// Upper bound for `repeat`.
pub const MAX_REPEAT: f64 = 10.0;

/// Register every demo gear on `builder`.
pub fn install<K>(builder: &mut CommandManagerBuilder<Session, String, K>) -> Result<(), RegistrationError>
where
    K: Eq + std::hash::Hash,
{
    builder.add_gear(core_gear())?;
    builder.add_gear(greetings_gear())?;
    builder.add_gear(math_gear())?;
    builder.add_gear(time_gear())?;
    Ok(())
}

fn core_gear() -> Gear<Session, String> {
    Gear::new("core")
        .description("Text utilities")
        .command(
            CommandSpec::new("echo")
                .description("Repeat the input exactly as typed")
                .raw_args()
                .param(Param::new("text", ParamKind::Text).default(Value::Text(String::new())))
                .example("<PREFIX><NAME> hello   world")
                .handler(|_, args| Ok(args.text("text")?.to_string())),
        )
        .command(
            CommandSpec::new("shout")
                .description("Upper-case the input")
                .alias("yell")
                .param(Param::new("text", ParamKind::Text).constraint(Constraint::NonBlank))
                .example("<PREFIX><NAME> hello there")
                .handler(|_, args| Ok(args.text("text")?.to_uppercase())),
        )
        .command(
            CommandSpec::new("whoami")
                .description("Show the calling user")
                .handler(|session: &Session, _| Ok(session.user.clone())),
        )
}

fn greetings_gear() -> Gear<Session, String> {
    Gear::new("greetings").description("Polite commands").command(
        CommandSpec::new("greet")
            .description("Greet someone, possibly several times")
            .param(Param::new("name", ParamKind::Text))
            .param(
                Param::new("times", ParamKind::Int)
                    .default(Value::Int(1))
                    .constraint(Constraint::clamp(1.0, MAX_REPEAT)),
            )
            .example("<PREFIX><NAME> Alice")
            .example("<PREFIX><NAME> Alice 3")
            .handler(|_, args| {
                let name = args.text("name")?;
                let times = args.int("times")?;
                let greeting = format!("Hello, {}!", name);
                Ok(vec![greeting; times.max(1) as usize].join(" "))
            }),
    )
}

fn math_gear() -> Gear<Session, String> {
    Gear::new("math")
        .description("Arithmetic")
        .command(
            CommandSpec::new("add")
                .description("Add two integers")
                .alias("plus")
                .param(Param::new("a", ParamKind::Int))
                .param(Param::new("b", ParamKind::Int))
                .example("<PREFIX><NAME> 1 2")
                .handler(|_, args| {
                    let sum = i64::from(args.int("a")?) + i64::from(args.int("b")?);
                    Ok(sum.to_string())
                }),
        )
        .command(
            CommandSpec::new("add")
                .description("Add two decimals")
                .alias("plus")
                .param(Param::new("a", ParamKind::Double))
                .param(Param::new("b", ParamKind::Double))
                .example("<PREFIX><NAME> 1.5 2.25")
                .handler(|_, args| Ok((args.double("a")? + args.double("b")?).to_string())),
        )
        .command(
            CommandSpec::new("repeat")
                .description("Repeat a word up to ten times")
                .param(Param::new("text", ParamKind::Text))
                .param(Param::new("count", ParamKind::Int).constraint(Constraint::clamp(1.0, MAX_REPEAT)))
                .example("<PREFIX><NAME> ha 3")
                .data("max", MAX_REPEAT)
                .handler(|_, args| {
                    let text = args.text("text")?;
                    let count = args.int("count")?;
                    Ok(vec![text; count.max(1) as usize].join(" "))
                }),
        )
}

fn time_gear() -> Gear<Session, String> {
    Gear::new("time").description("Time units").command(
        CommandSpec::new("convert")
            .description("Convert an amount between time units")
            .param(Param::new("amount", ParamKind::Double))
            .param(Param::new("from", ParamKind::TimeUnit))
            .param(Param::new("to", ParamKind::TimeUnit))
            .example("<PREFIX><NAME> 90 min hours")
            .handler(|_, args| {
                let amount = args.double("amount")?;
                let from = args.time_unit("from")?;
                let to = args.time_unit("to")?;
                Ok(format!("{} {}", from.convert(amount, to), to))
            }),
    )
}
