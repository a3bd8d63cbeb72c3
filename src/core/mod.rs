//! core
//!
//! Core domain types and configuration for Armada.
//!
//! # Modules
//!
//! - [`types`] - Argument kinds and parsed values
//! - [`param`] - Parameter declarations and constraints
//! - [`tokens`] - Whitespace tokenization of command input
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Argument kinds form a closed set; parsing is dispatched on the kind
//! - Parameters are declared explicitly instead of being discovered
//! - Tokenization never allocates per token

pub mod config;
pub mod param;
pub mod tokens;
pub mod types;
