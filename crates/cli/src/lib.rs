//! CLI tool for driving an in-process Chord ring.
//!
//! Provides commands for:
//! - Resolving which node owns a name
//! - Writing, reading and removing entries through the owner
//! - Inspecting ring membership and per-node record counts

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
