//! Configuration management for the create_user command
//!
//! Centralizes the invocation options. Building a [`Config`] never touches the
//! file system, so the Terms of Service check stays the first thing that can
//! fail.

use crate::{cli::Args, core::directory::RealmSelector, core::password::Secret};
use std::{env, path::PathBuf};

/// Environment variable holding the initial password salt
pub const INITIAL_PASSWORD_SALT_VAR: &str = "INITIAL_PASSWORD_SALT";

/// Environment variable overriding the user directory location
pub const DIRECTORY_VAR: &str = "CREATE_USER_DIRECTORY";

/// Default user directory file
pub const DEFAULT_DIRECTORY: &str = "directory.json";

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// Operator confirmed the user accepted the Terms of Service
    pub tos_accepted: bool,
    /// Realm the user is created in
    pub realm: RealmSelector,
    /// Email given on the command line
    pub email: Option<String>,
    /// Full name given on the command line
    pub full_name: Option<String>,
    /// Password given with `--password`
    pub password: Option<Secret>,
    /// Password file given with `--password-file`
    pub password_file: Option<PathBuf>,
    /// User directory file
    pub directory_path: PathBuf,
    /// Salt for generated initial passwords
    pub initial_password_salt: Option<Secret>,
}

impl Config {
    /// Create configuration from command line arguments and the process environment
    pub fn from_args(args: &Args) -> Self {
        Self::from_args_with_env(args, |key| env::var(key).ok())
    }

    /// Create configuration with an explicit environment lookup
    pub fn from_args_with_env<F>(args: &Args, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let directory_path = args
            .directory
            .clone()
            .or_else(|| lookup(DIRECTORY_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIRECTORY));

        Self {
            debug: args.debug,
            tos_accepted: args.tos,
            realm: RealmSelector::parse(&args.realm),
            email: args.email.clone(),
            full_name: args.full_name.clone(),
            password: args.password.clone().map(Secret::new),
            password_file: args.password_file.clone(),
            directory_path,
            initial_password_salt: lookup(INITIAL_PASSWORD_SALT_VAR).map(Secret::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["create_user", "--realm", "acme"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = Config::from_args_with_env(&args(&[]), |_| None);
        assert!(!config.tos_accepted);
        assert_eq!(config.directory_path, PathBuf::from(DEFAULT_DIRECTORY));
        assert!(config.initial_password_salt.is_none());
        assert_eq!(config.realm, RealmSelector::StringId("acme".to_string()));
    }

    #[test]
    fn test_environment_supplies_salt_and_directory() {
        let config = Config::from_args_with_env(&args(&[]), |key| match key {
            INITIAL_PASSWORD_SALT_VAR => Some("pepper".to_string()),
            DIRECTORY_VAR => Some("/srv/users.json".to_string()),
            _ => None,
        });
        assert_eq!(
            config.initial_password_salt.as_ref().map(Secret::expose),
            Some("pepper")
        );
        assert_eq!(config.directory_path, PathBuf::from("/srv/users.json"));
    }

    #[test]
    fn test_directory_flag_beats_environment() {
        let config = Config::from_args_with_env(&args(&["--directory", "local.json"]), |key| {
            (key == DIRECTORY_VAR).then(|| "/srv/users.json".to_string())
        });
        assert_eq!(config.directory_path, PathBuf::from("local.json"));
    }

    #[test]
    fn test_password_is_redacted_in_debug_output() {
        let config = Config::from_args_with_env(&args(&["--password", "hunter2"]), |_| None);
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
