//! Password resolution
//!
//! A password comes from the first source in an ordered list that yields one:
//! a password file, then an explicit `--password` value, then a generated
//! initial password.

use crate::{
    error::{CreateUserError, Result},
    utils::fs::FileSystemUtils,
};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, instrument, warn};

/// Length of a generated initial password
const INITIAL_PASSWORD_LENGTH: usize = 16;

/// A secret string whose `Debug` output is redacted
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the plaintext value
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Generator for deterministic initial passwords
#[derive(Debug, Clone)]
pub struct InitialPasswordGenerator {
    salt: Option<Secret>,
}

impl InitialPasswordGenerator {
    /// Create a generator; without a salt every initial password is unusable
    pub fn new(salt: Option<Secret>) -> Self {
        Self { salt }
    }

    /// Initial password for `email`, or `None` if passwords are unusable
    pub fn initial_password(&self, email: &str) -> Option<Secret> {
        let salt = self.salt.as_ref()?;

        let mut hasher = Sha256::new();
        hasher.update(salt.expose().as_bytes());
        hasher.update(email.as_bytes());
        let encoded = base64::encode(hasher.finalize());

        Some(Secret::new(&encoded[..INITIAL_PASSWORD_LENGTH]))
    }
}

/// A place a password can come from
pub trait PasswordSource: fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Produce a password for `email`, or `None` to defer to the next source
    fn resolve(&self, email: &str) -> Result<Option<Secret>>;
}

/// Password read from a file, surrounding whitespace trimmed
#[derive(Debug)]
pub struct PasswordFile {
    path: PathBuf,
    fs_utils: FileSystemUtils,
}

impl PasswordFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fs_utils: FileSystemUtils::new(),
        }
    }
}

impl PasswordSource for PasswordFile {
    fn name(&self) -> &'static str {
        "password file"
    }

    fn resolve(&self, _email: &str) -> Result<Option<Secret>> {
        debug!("Reading password from {}", self.path.display());
        let contents = self
            .fs_utils
            .read_file_to_string(&self.path)
            .map_err(|e| CreateUserError::file_system("read", &self.path, e))?;
        Ok(Some(Secret::new(contents.trim())))
    }
}

/// Password passed directly on the command line
#[derive(Debug)]
pub struct ExplicitPassword {
    password: Secret,
}

impl ExplicitPassword {
    pub fn new(password: Secret) -> Self {
        Self { password }
    }
}

impl PasswordSource for ExplicitPassword {
    fn name(&self) -> &'static str {
        "--password"
    }

    fn resolve(&self, _email: &str) -> Result<Option<Secret>> {
        warn!("Passwords given with --password are visible in the process list and shell history");
        Ok(Some(self.password.clone()))
    }
}

/// Deterministic initial password derived from the email
#[derive(Debug)]
pub struct InitialPassword {
    generator: InitialPasswordGenerator,
}

impl InitialPassword {
    pub fn new(generator: InitialPasswordGenerator) -> Self {
        Self { generator }
    }
}

impl PasswordSource for InitialPassword {
    fn name(&self) -> &'static str {
        "initial password"
    }

    fn resolve(&self, email: &str) -> Result<Option<Secret>> {
        Ok(self.generator.initial_password(email))
    }
}

/// Ordered list of password sources; the first one that yields a value wins
#[derive(Debug, Default)]
pub struct PasswordResolver {
    sources: Vec<Box<dyn PasswordSource>>,
}

impl PasswordResolver {
    /// Create an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard precedence: file, then explicit value, then initial password
    pub fn standard(
        password_file: Option<PathBuf>,
        password: Option<Secret>,
        generator: InitialPasswordGenerator,
    ) -> Self {
        let mut resolver = Self::new();
        if let Some(path) = password_file {
            resolver = resolver.with_source(PasswordFile::new(path));
        }
        if let Some(password) = password {
            resolver = resolver.with_source(ExplicitPassword::new(password));
        }
        resolver.with_source(InitialPassword::new(generator))
    }

    /// Append a source with lower precedence than every existing one
    pub fn with_source<S: PasswordSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Names of the configured sources, highest precedence first
    #[cfg(test)]
    pub(crate) fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Resolve the password for `email`
    #[instrument(skip(self))]
    pub fn resolve(&self, email: &str) -> Result<Secret> {
        for source in &self.sources {
            if let Some(password) = source.resolve(email)? {
                debug!("Password taken from {}", source.name());
                return Ok(password);
            }
            debug!("No password from {}", source.name());
        }

        Err(CreateUserError::UnusablePassword)
    }
}
