//! Error types for the create_user command
//!
//! Every failure is reported to the operator as a single line, so the
//! `Display` output of each variant is the user-facing message.

use crate::core::directory::DirectoryError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the create_user command
#[derive(Error, Debug)]
pub enum CreateUserError {
    /// The operator did not pass `--this-user-has-accepted-the-tos`
    #[error(
        "You must confirm that this user has accepted the Terms of Service by passing --this-user-has-accepted-the-tos."
    )]
    TermsNotAccepted,

    /// Conflicting or incomplete arguments
    #[error("{message}")]
    Usage { message: String },

    /// Malformed email address
    #[error("Invalid email address.")]
    InvalidEmail,

    /// No password source produced a usable password
    #[error("Password is unusable.")]
    UnusablePassword,

    /// The directory already holds a user with this identity
    #[error("User already exists.")]
    UserExists,

    /// The realm selector matched nothing
    #[error("There is no realm with id '{selector}'. Aborting.")]
    RealmNotFound { selector: String },

    /// File system operation errors
    #[error("File system error: {operation} failed on {}", path.display())]
    FileSystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Interactive input could not be read
    #[error("Failed to read interactive input")]
    Prompt {
        #[source]
        source: std::io::Error,
    },

    /// Any other failure reported by the user directory
    #[error(transparent)]
    Directory(DirectoryError),
}

impl CreateUserError {
    /// Create a new usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a new file system error
    pub fn file_system<P: Into<PathBuf>>(
        operation: impl Into<String>,
        path: P,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new prompt error
    pub fn prompt(source: std::io::Error) -> Self {
        Self::Prompt { source }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::TermsNotAccepted | Self::Usage { .. } => 2,
            _ => 1,
        }
    }
}

impl From<DirectoryError> for CreateUserError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::RealmNotFound { selector } => Self::RealmNotFound { selector },
            other => Self::Directory(other),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CreateUserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_is_exact() {
        assert_eq!(CreateUserError::UserExists.to_string(), "User already exists.");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CreateUserError::TermsNotAccepted.exit_code(), 2);
        assert_eq!(CreateUserError::usage("bad").exit_code(), 2);
        assert_eq!(CreateUserError::InvalidEmail.exit_code(), 1);
        assert_eq!(CreateUserError::UserExists.exit_code(), 1);
    }

    #[test]
    fn test_realm_lookup_error_is_lifted() {
        let err: CreateUserError = DirectoryError::RealmNotFound {
            selector: "acme".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "There is no realm with id 'acme'. Aborting."
        );
    }
}
