//! pkgsign CLI library — command implementations and package discovery.
#![deny(warnings, clippy::all, clippy::pedantic)]
#![warn(missing_docs)]

/// CLI subcommand implementations.
pub mod commands;
pub mod walker;
