//! Utility modules for common functionality
//!
//! Provides reusable utilities for file operations and interactive prompts.

pub mod fs;
pub mod prompt;

pub use fs::FileSystemUtils;
pub use prompt::{ConsolePrompter, Prompter};
