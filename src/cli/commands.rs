//! Command implementation for the CLI

use crate::{
    config::Config,
    core::{JsonDirectory, UserCreator, UserDirectory, directory::UserProfile},
    error::{CreateUserError, Result},
    utils::prompt::{ConsolePrompter, Prompter},
};
use tracing::{info, instrument};

/// Execute create_user against the configured directory file and the console
#[instrument(skip(config))]
pub fn execute_command(config: &Config) -> Result<()> {
    // Checked before the directory is opened so nothing else can fail first
    if !config.tos_accepted {
        return Err(CreateUserError::TermsNotAccepted);
    }

    info!("Using user directory: {}", config.directory_path.display());
    let mut directory = JsonDirectory::open(&config.directory_path)?;
    let mut prompter = ConsolePrompter::stdio();

    let profile = run_create_user(config, &mut directory, &mut prompter)?;
    info!("User {} created successfully", profile.email);
    Ok(())
}

/// Run create_user against arbitrary collaborators
pub fn run_create_user<D, P>(
    config: &Config,
    directory: &mut D,
    prompter: &mut P,
) -> Result<UserProfile>
where
    D: UserDirectory + ?Sized,
    P: Prompter + ?Sized,
{
    UserCreator::new(directory, prompter)?.create(config)
}
