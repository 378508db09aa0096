#![allow(clippy::cargo_common_metadata)]
use create_user::{cli, config::Config, setup_logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = cli::parse_args();

    // Setup logging based on debug flag
    if let Err(e) = setup_logging(args.debug) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    // Initialize configuration
    let config = Config::from_args(&args);

    // Execute the command, reporting failures as a single line
    match cli::execute_command(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
