//! The `fsh` interactive file explorer.
//!
//! This crate is the thin shell around [`fsh_core`]: it reads command lines,
//! maps them onto [`fsh_core::Session`] operations and renders the outcome.

#![deny(
    missing_docs,
    dead_code,
    nonstandard_style,
    unused_mut,
    unused_variables,
    unused_unsafe,
    unreachable_patterns
)]

pub mod cli;
pub mod commands;
pub mod logging;
mod render;
pub mod repl;

/// Version number of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
