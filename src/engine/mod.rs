//! engine
//!
//! Registers commands and dispatches text input to them.
//!
//! # Architecture
//!
//! - [`spec`] - Declarative command descriptions supplied by callers
//! - [`gear`] - Named groups of commands with a shared on/off switch
//! - [`command`] - A validated overload, its binding and its scoring
//! - [`module`] - All overloads sharing one name, and overload selection
//! - [`args`] - Typed access to bound arguments inside handlers
//! - [`hooks`] - Listeners around registration and execution
//! - [`manager`] - The builder and the immutable dispatcher
//!
//! # Dispatch Lifecycle
//!
//! ```text
//! prefix -> split -> resolve name -> select overload -> pre hook -> invoke -> post hook
//! ```
//!
//! # Invariants
//!
//! - Registration only happens on [`CommandManagerBuilder`]; a built
//!   [`CommandManager`] is read-only apart from gear switches
//! - Every command has a handler and a valid parameter shape
//! - Every constraint used by a parameter has registered validators
//! - Overload selection is deterministic for a given registration order

pub mod args;
pub mod command;
pub mod gear;
pub mod hooks;
pub mod manager;
pub mod module;
pub mod spec;

pub use args::Args;
pub use command::{InternalCommand, Outcome, Registries};
pub use gear::{Gear, GearHandle};
pub use hooks::{HookBus, HookEvent, HookPoint};
pub use manager::{CommandManager, CommandManagerBuilder};
pub use module::CommandModule;
pub use spec::{CommandSpec, Handler};
