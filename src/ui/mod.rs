//! ui
//!
//! User-facing output for the `armada` binary.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! Results go to stdout, diagnostics to stderr. Library diagnostics are
//! emitted through `tracing` and never printed here.

pub mod output;
