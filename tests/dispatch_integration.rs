//! Integration tests for command dispatch.
//!
//! These tests drive a fully built manager through `execute`, the same way
//! an embedding application would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use armada::core::param::Param;
use armada::core::types::{ArgKind, ParamKind, Value};
use armada::engine::{
    Args, CommandManager, CommandManagerBuilder, CommandSpec, Gear, HookPoint, Outcome,
};
use armada::error::{CommandError, RegistrationError};
use armada::transform::FnTransformer;

// =============================================================================
// Test Fixtures
// =============================================================================

/// Caller context recorded by handlers.
#[derive(Debug, Default)]
struct Ctx {
    calls: AtomicUsize,
}

type Manager = CommandManager<Ctx, String>;

/// Records what a handler was called with.
fn recorder(log: &Arc<Mutex<Vec<String>>>) -> impl Fn(&Ctx, &Args) -> anyhow::Result<String> + Send + Sync {
    let log = Arc::clone(log);
    move |ctx, args| {
        ctx.calls.fetch_add(1, Ordering::SeqCst);
        let line = args
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(",");
        log.lock().unwrap().push(line.clone());
        Ok(line)
    }
}

fn build(gear: Gear<Ctx, String>) -> Manager {
    let mut builder = CommandManagerBuilder::new();
    builder.add_gear(gear).unwrap();
    builder.build().unwrap()
}

// =============================================================================
// Prefix handling
// =============================================================================

#[test]
fn unrecognized_prefix_touches_nothing() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let manager = build(Gear::new("g").command(
        CommandSpec::new("ping").handler(recorder(&log)),
    ));
    let ctx = Ctx::default();

    assert_eq!(manager.execute("?ping", &ctx, None).unwrap(), Outcome::NoPrefix);
    assert_eq!(manager.execute("ping", &ctx, None).unwrap(), Outcome::NoPrefix);
    assert_eq!(manager.execute("", &ctx, None).unwrap(), Outcome::NoPrefix);
    assert_eq!(ctx.calls.load(Ordering::SeqCst), 0);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn routing_key_selects_prefix() {
    let mut builder: CommandManagerBuilder<Ctx, String> =
        CommandManagerBuilder::new().route_prefix("admin".to_string(), "?");
    builder
        .add_gear(Gear::new("g").command(CommandSpec::new("ping").handler(|_, _| Ok("pong".into()))))
        .unwrap();
    let manager = builder.build().unwrap();
    let ctx = Ctx::default();
    let admin = "admin".to_string();

    assert_eq!(
        manager.execute("?ping", &ctx, Some(&admin)).unwrap().value().as_deref(),
        Some("pong")
    );
    assert_eq!(manager.execute("!ping", &ctx, Some(&admin)).unwrap(), Outcome::NoPrefix);
    assert!(manager.execute("!ping", &ctx, None).unwrap().is_completed());
}

// =============================================================================
// Aliases
// =============================================================================

#[test]
fn alias_dispatch_matches_canonical() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let manager = build(Gear::new("g").command(
        CommandSpec::new("greet")
            .alias("hi")
            .param(Param::new("name", ParamKind::Text))
            .handler(recorder(&log)),
    ));
    let ctx = Ctx::default();

    let canonical = manager.execute("!greet Bob", &ctx, None).unwrap();
    let alias = manager.execute("!HI Bob", &ctx, None).unwrap();
    let mixed = manager.execute("!GrEeT Bob", &ctx, None).unwrap();

    assert_eq!(canonical, alias);
    assert_eq!(canonical, mixed);
    assert_eq!(*log.lock().unwrap(), vec!["name=Bob"; 3]);
}

#[test]
fn unknown_command_is_an_outcome() {
    let manager = build(Gear::new("g"));
    assert_eq!(
        manager.execute("!Nope a b", &Ctx::default(), None).unwrap(),
        Outcome::UnknownCommand { name: "nope".into() }
    );
}

// =============================================================================
// Overload selection
// =============================================================================

#[test]
fn highest_score_wins_and_ties_go_first() {
    let manager = build(
        Gear::new("math")
            .command(
                CommandSpec::new("add")
                    .param(Param::new("a", ParamKind::Int))
                    .param(Param::new("b", ParamKind::Int))
                    .handler(|_, args| Ok(format!("int {}", args.int("a")? + args.int("b")?))),
            )
            .command(
                CommandSpec::new("add")
                    .param(Param::new("a", ParamKind::Double))
                    .param(Param::new("b", ParamKind::Double))
                    .handler(|_, args| Ok(format!("double {}", args.double("a")? + args.double("b")?))),
            )
            .command(
                CommandSpec::new("add")
                    .param(Param::new("a", ParamKind::Text))
                    .param(Param::new("b", ParamKind::Text))
                    .handler(|_, args| Ok(format!("text {}{}", args.text("a")?, args.text("b")?))),
            ),
    );
    let ctx = Ctx::default();
    let run = |line: &str| manager.execute(line, &ctx, None).unwrap().value().unwrap();

    assert_eq!(run("!add 1 2"), "int 3");
    assert_eq!(run("!add 1.5 2"), "double 3.5");
    assert_eq!(run("!add a b"), "text ab");

    // Every overload scores 2 here, so the integer overload is chosen and fails to bind.
    let err = manager.execute("!add 1 b", &ctx, None).unwrap_err();
    assert_eq!(err.code(), "transformer_parse");
}

#[test]
fn no_overload_accepts_arguments() {
    let manager = build(Gear::new("g").command(
        CommandSpec::new("double")
            .param(Param::new("n", ParamKind::Int))
            .handler(|_, args| Ok((args.int("n")? * 2).to_string())),
    ));
    assert_eq!(
        manager.execute("!double many", &Ctx::default(), None).unwrap(),
        Outcome::NoCandidate { module: "double".into() }
    );
}

// =============================================================================
// Binding
// =============================================================================

#[test]
fn too_many_tokens_for_fixed_arity() {
    let manager = build(Gear::new("g").command(
        CommandSpec::new("pair")
            .param(Param::new("a", ParamKind::Int))
            .param(Param::new("b", ParamKind::Int))
            .handler(|_, _| Ok(String::new())),
    ));
    let ctx = Ctx::default();

    assert!(manager.execute("!pair 1 2", &ctx, None).unwrap().is_completed());
    match manager.execute("!pair 1 2 3", &ctx, None) {
        Err(CommandError::TooManyArguments { expected, given, .. }) => {
            assert_eq!((expected, given), (2, 3));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn greet_binds_name_and_times() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let manager = build(Gear::new("g").command(
        CommandSpec::new("greet")
            .param(Param::new("name", ParamKind::Text))
            .param(Param::new("times", ParamKind::Int))
            .handler(recorder(&log)),
    ));

    manager.execute("!greet Alice 3", &Ctx::default(), None).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["name=Alice,times=3"]);
}

#[test]
fn raw_echo_keeps_spacing() {
    let manager = build(Gear::new("g").command(
        CommandSpec::new("echo")
            .raw_args()
            .param(Param::new("text", ParamKind::Text))
            .handler(|_, args| Ok(args.text("text")?.to_string())),
    ));

    assert_eq!(
        manager.execute("!echo hello   world", &Ctx::default(), None).unwrap().value().as_deref(),
        Some("hello   world")
    );
}

#[test]
fn trailing_list_collects_tokens() {
    let manager = build(Gear::new("g").command(
        CommandSpec::new("tag")
            .param(Param::new("id", ParamKind::Int))
            .param(Param::new("labels", ParamKind::TextList))
            .handler(|_, args| Ok(format!("{}:{}", args.int("id")?, args.text_list("labels")?.join("|")))),
    ));

    assert_eq!(
        manager.execute("!tag 7 a  b c", &Ctx::default(), None).unwrap().value().as_deref(),
        Some("7:a|b|c")
    );
}

#[test]
fn optional_parameter_default() {
    let manager = build(Gear::new("g").command(
        CommandSpec::new("greet")
            .param(Param::new("name", ParamKind::Text))
            .param(Param::new("times", ParamKind::Int).default(Value::Int(1)))
            .handler(|_, args| Ok(format!("{}x{}", args.text("name")?, args.int("times")?))),
    ));
    let ctx = Ctx::default();

    assert_eq!(manager.execute("!greet Al", &ctx, None).unwrap().value().as_deref(), Some("Alx1"));
    assert_eq!(manager.execute("!greet Al 4", &ctx, None).unwrap().value().as_deref(), Some("Alx4"));
}

#[test]
fn handler_type_mismatch_is_reported() {
    let manager = build(Gear::new("g").command(
        CommandSpec::new("oops")
            .param(Param::new("n", ParamKind::Int))
            .handler(|_, args| Ok(args.text("n")?.to_string())),
    ));
    let err = manager.execute("!oops 1", &Ctx::default(), None).unwrap_err();
    assert_eq!(err.code(), "invalid_parameter_types");
}

// =============================================================================
// Registries
// =============================================================================

#[test]
fn duplicate_transformer_keeps_first() {
    let mut builder: CommandManagerBuilder<Ctx, String> = CommandManagerBuilder::new();
    let err = builder
        .add_transformer(
            ArgKind::Int,
            FnTransformer::new(|_: &str, _: &Param, _: &Ctx| Some(Value::Int(-1))),
        )
        .unwrap_err();
    assert_eq!(err, RegistrationError::DuplicateTransformer(ArgKind::Int));

    builder
        .add_gear(Gear::new("g").command(
            CommandSpec::new("id")
                .param(Param::new("n", ParamKind::Int))
                .handler(|_, args| Ok(args.int("n")?.to_string())),
        ))
        .unwrap();
    let manager = builder.build().unwrap();
    assert_eq!(
        manager.execute("!id 42", &Ctx::default(), None).unwrap().value().as_deref(),
        Some("42")
    );
}

#[test]
fn custom_transformer_uses_context() {
    #[derive(Default)]
    struct Offset(i32);

    let mut builder: CommandManagerBuilder<Offset, String> = CommandManagerBuilder::bare();
    builder
        .add_transformer(
            ArgKind::Int,
            FnTransformer::new(|input: &str, _: &Param, ctx: &Offset| {
                input.parse::<i32>().ok().map(|n| Value::Int(n + ctx.0))
            }),
        )
        .unwrap();
    builder
        .add_gear(Gear::new("g").command(
            CommandSpec::new("shift")
                .param(Param::new("n", ParamKind::Int))
                .handler(|_, args| Ok(args.int("n")?.to_string())),
        ))
        .unwrap();
    let manager = builder.build().unwrap();

    assert_eq!(
        manager.execute("!shift 1", &Offset(10), None).unwrap().value().as_deref(),
        Some("11")
    );
}

// =============================================================================
// Gears and hooks
// =============================================================================

#[test]
fn disabled_gear_never_calls_handler() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let manager = build(Gear::new("g").command(CommandSpec::new("ping").handler(recorder(&log))));
    let ctx = Ctx::default();

    manager.set_gear_enabled("g", false);
    assert_eq!(
        manager.execute("!ping", &ctx, None).unwrap(),
        Outcome::Disabled { gear: "g".into() }
    );
    assert_eq!(ctx.calls.load(Ordering::SeqCst), 0);

    manager.set_gear_enabled("G", true);
    assert!(manager.execute("!ping", &ctx, None).unwrap().is_completed());
}

#[test]
fn post_execute_hook_sees_result() {
    let seen = Arc::new(Mutex::new(None));
    let mut builder: CommandManagerBuilder<Ctx, String> = CommandManagerBuilder::new();
    let slot = Arc::clone(&seen);
    builder.on(HookPoint::CommandPostExecute, move |event| {
        *slot.lock().unwrap() = event.result::<String>().cloned();
    });
    builder
        .add_gear(Gear::new("g").command(CommandSpec::new("ping").handler(|_, _| Ok("pong".into()))))
        .unwrap();
    let manager = builder.build().unwrap();

    manager.execute("!ping", &Ctx::default(), None).unwrap();
    assert_eq!(seen.lock().unwrap().as_deref(), Some("pong"));
}

#[test]
fn manager_dispatches_from_many_threads() {
    let manager = Arc::new(build(Gear::new("g").command(
        CommandSpec::new("sq")
            .param(Param::new("n", ParamKind::Long))
            .handler(|_, args| Ok((args.long("n")? * args.long("n")?).to_string())),
    )));

    let handles: Vec<_> = (0..4i64)
        .map(|i| {
            let manager = Arc::clone(&manager);
            std::thread::spawn(move || {
                let line = format!("!sq {}", i);
                manager.execute(&line, &Ctx::default(), None).unwrap().value().unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec!["0", "1", "4", "9"]);
}
