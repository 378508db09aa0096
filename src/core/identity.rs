//! Email and full name resolution
//!
//! Both values come from the command line, or both from interactive prompts.

use crate::{
    core::email::EmailValidator,
    error::{CreateUserError, Result},
    utils::prompt::Prompter,
};
use tracing::debug;

const EMAIL_PROMPT: &str = "Email: ";
const FULL_NAME_PROMPT: &str = "Full name: ";

const SHAPE_USAGE: &str = "Either specify an email and full name as two parameters, \
or specify no parameters for interactive user creation.";

/// Email and full name of the user being created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub full_name: String,
}

/// Resolve the identity from positional values or, when both are absent, by prompting
pub fn resolve_identity<P: Prompter + ?Sized>(
    email: Option<&str>,
    full_name: Option<&str>,
    validator: &EmailValidator,
    prompter: &mut P,
) -> Result<Identity> {
    match (email, full_name) {
        (Some(email), Some(full_name)) => {
            validator.validate(email)?;
            Ok(Identity {
                email: email.to_string(),
                full_name: full_name.to_string(),
            })
        }
        (None, None) => prompt_identity(validator, prompter),
        _ => Err(CreateUserError::usage(SHAPE_USAGE)),
    }
}

fn prompt_identity<P: Prompter + ?Sized>(
    validator: &EmailValidator,
    prompter: &mut P,
) -> Result<Identity> {
    let email = loop {
        let candidate = prompter.prompt(EMAIL_PROMPT).map_err(CreateUserError::prompt)?;
        if validator.is_valid(&candidate) {
            break candidate;
        }
        debug!("Interactive email rejected, asking again");
        prompter
            .report(&CreateUserError::InvalidEmail.to_string())
            .map_err(CreateUserError::prompt)?;
    };

    let full_name = prompter
        .prompt(FULL_NAME_PROMPT)
        .map_err(CreateUserError::prompt)?;

    Ok(Identity { email, full_name })
}
