//! User creation driver
//!
//! Checks the Terms of Service acknowledgement, resolves the realm, identity
//! and password, then hands the user to the directory.

use crate::{
    config::Config,
    core::{
        directory::{DirectoryError, NewUser, UserDirectory, UserProfile},
        email::EmailValidator,
        identity::resolve_identity,
        password::{InitialPasswordGenerator, PasswordResolver},
    },
    error::{CreateUserError, Result},
    utils::prompt::Prompter,
};
use tracing::{debug, info, instrument};

/// Creates one user from a [`Config`] against injected collaborators
pub struct UserCreator<'a, D: ?Sized, P: ?Sized> {
    directory: &'a mut D,
    prompter: &'a mut P,
    validator: EmailValidator,
}

impl<'a, D, P> UserCreator<'a, D, P>
where
    D: UserDirectory + ?Sized,
    P: Prompter + ?Sized,
{
    /// Create a new user creator
    pub fn new(directory: &'a mut D, prompter: &'a mut P) -> Result<Self> {
        Ok(Self {
            directory,
            prompter,
            validator: EmailValidator::new()?,
        })
    }

    /// Run the whole creation flow
    #[instrument(skip(self, config), fields(realm = %config.realm))]
    pub fn create(&mut self, config: &Config) -> Result<UserProfile> {
        if !config.tos_accepted {
            return Err(CreateUserError::TermsNotAccepted);
        }

        let realm = self.directory.get_realm(&config.realm)?;
        debug!("Creating user in realm {} ({})", realm.string_id, realm.id);

        let identity = resolve_identity(
            config.email.as_deref(),
            config.full_name.as_deref(),
            &self.validator,
            &mut *self.prompter,
        )?;

        let resolver = PasswordResolver::standard(
            config.password_file.clone(),
            config.password.clone(),
            InitialPasswordGenerator::new(config.initial_password_salt.clone()),
        );
        let password = resolver.resolve(&identity.email)?;

        let new_user = NewUser {
            email: identity.email,
            password,
            realm_id: realm.id,
            full_name: identity.full_name,
            acting_user: None,
            tos_version: None,
        };

        let profile = self.directory.create_user(new_user).map_err(|e| match e {
            DirectoryError::Conflict { .. } => CreateUserError::UserExists,
            other => other.into(),
        })?;

        info!(
            "Created user {} <{}> in realm {} (no acting user)",
            profile.id, profile.email, realm.string_id
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        directory::{Realm, RealmSelector},
        password::Secret,
    };
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// In-memory directory recording every creation request
    struct RecordingDirectory {
        realms: Vec<Realm>,
        created: Vec<NewUser>,
        fail_with: Option<DirectoryError>,
    }

    impl RecordingDirectory {
        fn new() -> Self {
            Self {
                realms: vec![Realm {
                    id: 3,
                    string_id: "acme".to_string(),
                    name: "Acme".to_string(),
                }],
                created: Vec::new(),
                fail_with: None,
            }
        }
    }

    impl UserDirectory for RecordingDirectory {
        fn get_realm(
            &self,
            selector: &RealmSelector,
        ) -> std::result::Result<Realm, DirectoryError> {
            self.realms
                .iter()
                .find(|r| selector.matches(r))
                .cloned()
                .ok_or_else(|| DirectoryError::RealmNotFound {
                    selector: selector.to_string(),
                })
        }

        fn create_user(
            &mut self,
            user: NewUser,
        ) -> std::result::Result<UserProfile, DirectoryError> {
            if let Some(err) = self.fail_with.take() {
                return Err(err);
            }
            let profile = UserProfile {
                id: self.created.len() as u64 + 1,
                realm_id: user.realm_id,
                email: user.email.clone(),
                full_name: user.full_name.clone(),
                password_digest: String::new(),
                tos_version: user.tos_version.clone(),
                date_joined: chrono::Utc::now(),
            };
            self.created.push(user);
            Ok(profile)
        }
    }

    /// Prompter that must never be consulted
    struct NoPrompter;

    impl Prompter for NoPrompter {
        fn prompt(&mut self, label: &str) -> io::Result<String> {
            panic!("unexpected prompt: {label}");
        }

        fn report(&mut self, message: &str) -> io::Result<()> {
            panic!("unexpected report: {message}");
        }
    }

    fn config() -> Config {
        Config {
            debug: false,
            tos_accepted: true,
            realm: RealmSelector::parse("acme"),
            email: Some("iago@acme.test".to_string()),
            full_name: Some("Iago".to_string()),
            password: Some(Secret::new("from-flag")),
            password_file: None,
            directory_path: PathBuf::from("unused.json"),
            initial_password_salt: None,
        }
    }

    fn run(directory: &mut RecordingDirectory, config: &Config) -> Result<UserProfile> {
        let mut prompter = NoPrompter;
        UserCreator::new(directory, &mut prompter)?.create(config)
    }

    #[test]
    fn test_creates_user_without_acting_user() {
        let mut directory = RecordingDirectory::new();
        let profile = run(&mut directory, &config()).unwrap();

        assert_eq!(profile.realm_id, 3);
        assert_eq!(directory.created.len(), 1);
        let request = &directory.created[0];
        assert_eq!(request.email, "iago@acme.test");
        assert_eq!(request.full_name, "Iago");
        assert_eq!(request.password.expose(), "from-flag");
        assert_eq!(request.acting_user, None);
        assert_eq!(request.tos_version, None);
    }

    #[test]
    fn test_terms_not_accepted_fails_first() {
        let mut directory = RecordingDirectory::new();
        directory.realms.clear();

        let config = Config {
            tos_accepted: false,
            email: Some("not-an-email".to_string()),
            full_name: None,
            password_file: Some(PathBuf::from("/nonexistent/password")),
            ..config()
        };

        let err = run(&mut directory, &config).unwrap_err();
        assert!(matches!(err, CreateUserError::TermsNotAccepted));
        assert!(directory.created.is_empty());
    }

    #[test]
    fn test_unknown_realm() {
        let mut directory = RecordingDirectory::new();
        let config = Config {
            realm: RealmSelector::parse("99"),
            ..config()
        };

        let err = run(&mut directory, &config).unwrap_err();
        assert_eq!(err.to_string(), "There is no realm with id '99'. Aborting.");
    }

    #[test]
    fn test_invalid_email_never_reaches_directory() {
        let mut directory = RecordingDirectory::new();
        let config = Config {
            email: Some("iago-at-acme".to_string()),
            ..config()
        };

        let err = run(&mut directory, &config).unwrap_err();
        assert!(matches!(err, CreateUserError::InvalidEmail));
        assert!(directory.created.is_empty());
    }

    #[test]
    fn test_password_file_wins_over_flag() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("password");
        fs::write(&path, "  secret123  \n").unwrap();

        let mut directory = RecordingDirectory::new();
        let config = Config {
            password_file: Some(path),
            ..config()
        };

        run(&mut directory, &config).unwrap();
        assert_eq!(directory.created[0].password.expose(), "secret123");
    }

    #[test]
    fn test_unusable_initial_password() {
        let mut directory = RecordingDirectory::new();
        let config = Config {
            password: None,
            ..config()
        };

        let err = run(&mut directory, &config).unwrap_err();
        assert!(matches!(err, CreateUserError::UnusablePassword));
        assert!(directory.created.is_empty());
    }

    #[test]
    fn test_generated_initial_password() {
        let mut directory = RecordingDirectory::new();
        let config = Config {
            password: None,
            initial_password_salt: Some(Secret::new("pepper")),
            ..config()
        };

        run(&mut directory, &config).unwrap();
        assert_eq!(directory.created[0].password.expose(), "TOibz2XkQzGQoK8j");
    }

    #[test]
    fn test_conflict_becomes_user_exists() {
        let mut directory = RecordingDirectory::new();
        directory.fail_with = Some(DirectoryError::Conflict {
            email: "iago@acme.test".to_string(),
            realm_id: 3,
        });

        let err = run(&mut directory, &config()).unwrap_err();
        assert!(matches!(err, CreateUserError::UserExists));
        assert_eq!(err.to_string(), "User already exists.");
    }

    #[test]
    fn test_other_directory_failures_propagate() {
        let mut directory = RecordingDirectory::new();
        directory.fail_with = Some(DirectoryError::Integrity {
            message: "full name too long".to_string(),
        });

        let err = run(&mut directory, &config()).unwrap_err();
        assert!(matches!(
            err,
            CreateUserError::Directory(DirectoryError::Integrity { .. })
        ));
    }
}
