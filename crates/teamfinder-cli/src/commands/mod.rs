//! One-shot subcommands.

pub mod browse;
pub mod config;
