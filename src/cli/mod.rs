//! Command-line interface module
//!
//! Provides argument parsing and command execution.

pub mod args;
pub mod commands;

pub use args::{Args, parse_args};
pub use commands::{execute_command, run_create_user};
