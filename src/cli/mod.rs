//! Command-Line Interface
//!
//! Subcommand implementations plus console output helpers and the live
//! progress renderer. Argument parsing itself lives in the binary.

pub mod commands;
pub mod render;
pub mod ui;
