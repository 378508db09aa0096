//! # create_user
//!
//! Administrative command that creates a user inside an existing realm of a
//! multi-tenant application, driven by command-line flags or interactive
//! prompts.
//!
//! ## Features
//!
//! - Terms of Service acknowledgement required before anything else runs
//! - Email syntax validation, with re-prompting in interactive mode
//! - Password from a file, an explicit flag, or a salted initial password
//! - Realm lookup and user creation behind the [`core::UserDirectory`] trait
//!
//! ## Example
//!
//! ```no_run
//! use create_user::{cli::run_create_user, config::Config, core::JsonDirectory};
//! use create_user::core::{RealmSelector, Secret};
//! use create_user::utils::ConsolePrompter;
//!
//! let config = Config {
//!     debug: false,
//!     tos_accepted: true,
//!     realm: RealmSelector::parse("acme"),
//!     email: Some("iago@acme.test".to_string()),
//!     full_name: Some("Iago".to_string()),
//!     password: Some(Secret::new("secret123")),
//!     password_file: None,
//!     directory_path: "directory.json".into(),
//!     initial_password_salt: None,
//! };
//! let mut directory = JsonDirectory::open(&config.directory_path)?;
//! let profile = run_create_user(&config, &mut directory, &mut ConsolePrompter::stdio())?;
//! println!("Created user {}", profile.id);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity
///
/// Logs go to stderr so stdout stays free for interactive prompts.
/// `RUST_LOG` overrides the level picked from `debug`.
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
