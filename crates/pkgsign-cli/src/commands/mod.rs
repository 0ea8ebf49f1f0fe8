//! CLI subcommand implementations.

pub mod verify;
