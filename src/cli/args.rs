//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Create the specified user with a default initial password.
///
/// The user is created without an accepted ToS version, so they go through the
/// ToS flow on first login. Omit both <EMAIL> and <FULL_NAME> for interactive
/// user creation.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about)]
#[command(name = "create_user")]
pub struct Args {
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Acknowledgement that the user has already accepted the ToS
    #[arg(long = "this-user-has-accepted-the-tos")]
    pub tos: bool,

    /// Password of the new user. For development only: passwords passed this
    /// way can be read from the process list and shell history
    #[arg(long)]
    pub password: Option<String>,

    /// The file containing the password of the new user
    #[arg(long = "password-file", value_name = "PATH")]
    pub password_file: Option<PathBuf>,

    /// The numeric or string ID of the existing realm to add the user to
    #[arg(short = 'r', long = "realm", value_name = "ID")]
    pub realm: String,

    /// User directory file (defaults to $CREATE_USER_DIRECTORY, then directory.json)
    #[arg(long, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Email address of the new user
    #[arg(value_name = "EMAIL")]
    pub email: Option<String>,

    /// Full name of the new user
    #[arg(value_name = "FULL_NAME")]
    pub full_name: Option<String>,
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
