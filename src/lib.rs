//! Armada - text-command dispatch with typed arguments
//!
//! Armada turns lines such as `!greet Alice 3` into calls of registered
//! handlers. Commands are grouped into gears, may be overloaded under one
//! name, and declare typed parameters that are parsed by transformers and
//! checked by validators before the handler runs.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface for the `armada` binary
//! - [`engine`] - Registration, overload selection and dispatch
//! - [`transform`] - Token to value parsing per argument kind
//! - [`validate`] - Constraint checks on parsed values
//! - [`core`] - Argument kinds, parameters, tokenization, configuration
//! - [`error`] - Registration and dispatch errors
//! - [`ui`] - User-facing output
//!
//! # Correctness Invariants
//!
//! Armada maintains the following invariants:
//!
//! 1. Registration is finished before the first dispatch
//! 2. Input without the active prefix never reaches a command
//! 3. A handler only sees arguments that parsed and validated
//! 4. The same input and registration order always select the same overload

pub mod cli;
pub mod core;
pub mod engine;
pub mod error;
pub mod transform;
pub mod ui;
pub mod validate;
