//! User directory access
//!
//! The command reaches realms and users only through [`UserDirectory`].
//! [`JsonDirectory`] is the file-backed implementation used by the binary. It
//! assumes one writer at a time: two concurrent runs each save their own view
//! of the file, and the later save wins.

use crate::{core::password::Secret, utils::fs::FileSystemUtils};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Audit event recorded when a user is created
pub const USER_CREATED_EVENT: &str = "user_created";

/// Errors reported by a user directory
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// No realm matches the selector
    #[error("No realm matches '{selector}'")]
    RealmNotFound { selector: String },

    /// A user with the same identity already exists in the realm
    #[error("User {email} already exists in realm {realm_id}")]
    Conflict { email: String, realm_id: u64 },

    /// The directory file could not be read or written
    #[error("User directory error: {operation} failed on {}", path.display())]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory file is not valid
    #[error("User directory {} is malformed", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The request violates a directory constraint other than uniqueness
    #[error("Integrity error: {message}")]
    Integrity { message: String },
}

/// How a realm is picked on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RealmSelector {
    /// Numeric realm id
    Id(u64),
    /// Realm string id (subdomain)
    StringId(String),
}

impl RealmSelector {
    /// All-digit selectors are numeric ids, anything else is a string id
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = raw.parse() {
                return Self::Id(id);
            }
        }
        Self::StringId(raw.to_string())
    }

    /// Check whether this selector picks `realm`
    pub fn matches(&self, realm: &Realm) -> bool {
        match self {
            Self::Id(id) => realm.id == *id,
            Self::StringId(string_id) => realm.string_id == *string_id,
        }
    }
}

impl fmt::Display for RealmSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::StringId(string_id) => f.write_str(string_id),
        }
    }
}

/// An isolated namespace of users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Realm {
    pub id: u64,
    pub string_id: String,
    pub name: String,
}

/// Request to create a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: Secret,
    pub realm_id: u64,
    pub full_name: String,
    /// User the creation is attributed to; `None` for system-initiated creation
    pub acting_user: Option<u64>,
    /// Accepted Terms of Service version; `None` forces the ToS flow on login
    pub tos_version: Option<String>,
}

/// A stored user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: u64,
    pub realm_id: u64,
    pub email: String,
    pub full_name: String,
    pub password_digest: String,
    pub tos_version: Option<String>,
    pub date_joined: DateTime<Utc>,
}

/// One entry of the realm audit log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditLogEntry {
    pub event_type: String,
    pub realm_id: u64,
    pub modified_user_id: u64,
    pub acting_user_id: Option<u64>,
    pub event_time: DateTime<Utc>,
}

/// Capability to look up realms and create users
pub trait UserDirectory {
    /// Find the realm picked by `selector`
    fn get_realm(&self, selector: &RealmSelector) -> Result<Realm, DirectoryError>;

    /// Create a user; fails with [`DirectoryError::Conflict`] on a duplicate identity
    fn create_user(&mut self, user: NewUser) -> Result<UserProfile, DirectoryError>;
}

/// Serialized contents of a directory file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectoryState {
    #[serde(default)]
    pub realms: Vec<Realm>,
    #[serde(default)]
    pub users: Vec<UserProfile>,
    #[serde(default)]
    pub audit_log: Vec<AuditLogEntry>,
}

impl DirectoryState {
    fn find_user(&self, realm_id: u64, email: &str) -> Option<&UserProfile> {
        self.users
            .iter()
            .find(|u| u.realm_id == realm_id && u.email.eq_ignore_ascii_case(email))
    }

    fn next_user_id(&self) -> u64 {
        self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1
    }
}

/// User directory stored in a JSON file
#[derive(Debug)]
pub struct JsonDirectory {
    path: PathBuf,
    state: DirectoryState,
    fs_utils: FileSystemUtils,
}

impl JsonDirectory {
    /// Load the directory stored at `path`
    #[instrument]
    pub fn open<P: AsRef<Path> + fmt::Debug>(path: P) -> Result<Self, DirectoryError> {
        let path = path.as_ref().to_path_buf();
        let fs_utils = FileSystemUtils::new();

        let contents = fs_utils
            .read_file_to_string(&path)
            .map_err(|source| DirectoryError::Io {
                operation: "read".to_string(),
                path: path.clone(),
                source,
            })?;
        let state: DirectoryState =
            serde_json::from_str(&contents).map_err(|source| DirectoryError::Format {
                path: path.clone(),
                source,
            })?;

        debug!(
            "Loaded user directory with {} realm(s) and {} user(s)",
            state.realms.len(),
            state.users.len()
        );

        Ok(Self {
            path,
            state,
            fs_utils,
        })
    }

    /// Create a directory file at `path` holding `state`
    #[cfg(test)]
    pub(crate) fn create<P: AsRef<Path>>(
        path: P,
        state: DirectoryState,
    ) -> Result<Self, DirectoryError> {
        let directory = Self {
            path: path.as_ref().to_path_buf(),
            state,
            fs_utils: FileSystemUtils::new(),
        };
        directory.save()?;
        Ok(directory)
    }

    /// Current contents of the directory
    #[cfg(test)]
    pub(crate) fn state(&self) -> &DirectoryState {
        &self.state
    }

    fn save(&self) -> Result<(), DirectoryError> {
        let contents =
            serde_json::to_string_pretty(&self.state).map_err(|source| DirectoryError::Format {
                path: self.path.clone(),
                source,
            })?;

        self.fs_utils
            .write_file_atomic(&self.path, contents)
            .map_err(|source| DirectoryError::Io {
                operation: "write".to_string(),
                path: self.path.clone(),
                source,
            })
    }
}

impl UserDirectory for JsonDirectory {
    fn get_realm(&self, selector: &RealmSelector) -> Result<Realm, DirectoryError> {
        self.state
            .realms
            .iter()
            .find(|realm| selector.matches(realm))
            .cloned()
            .ok_or_else(|| DirectoryError::RealmNotFound {
                selector: selector.to_string(),
            })
    }

    #[instrument(skip(self, user), fields(email = %user.email, realm_id = user.realm_id))]
    fn create_user(&mut self, user: NewUser) -> Result<UserProfile, DirectoryError> {
        if !self.state.realms.iter().any(|r| r.id == user.realm_id) {
            return Err(DirectoryError::Integrity {
                message: format!("realm {} does not exist", user.realm_id),
            });
        }

        if self.state.find_user(user.realm_id, &user.email).is_some() {
            return Err(DirectoryError::Conflict {
                email: user.email,
                realm_id: user.realm_id,
            });
        }

        let now = Utc::now();
        let profile = UserProfile {
            id: self.state.next_user_id(),
            realm_id: user.realm_id,
            password_digest: password_digest(user.realm_id, &user.email, &user.password),
            email: user.email,
            full_name: user.full_name,
            tos_version: user.tos_version,
            date_joined: now,
        };

        self.state.users.push(profile.clone());
        self.state.audit_log.push(AuditLogEntry {
            event_type: USER_CREATED_EVENT.to_string(),
            realm_id: profile.realm_id,
            modified_user_id: profile.id,
            acting_user_id: user.acting_user,
            event_time: now,
        });
        self.save()?;

        info!("Stored user {} in {}", profile.id, self.path.display());
        Ok(profile)
    }
}

/// Salted SHA-256 digest of a password, in `sha256$<hex>` form
fn password_digest(realm_id: u64, email: &str, password: &Secret) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}:", realm_id, email.to_lowercase()).as_bytes());
    hasher.update(password.expose().as_bytes());
    let hex: String = hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect();
    format!("sha256${hex}")
}
