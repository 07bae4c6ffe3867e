//! stackwright CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Configuration error
//! - 5: Engine error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wright_engine::EngineError;
use wright_programs::ProgramError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CONFIG_ERROR: u8 = 3;
    pub const ENGINE_ERROR: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(cli.verbose, cli.quiet)));
    let log_result = tracing_subscriber::registry()
        .with(cli.log_json.then(|| fmt::layer().json()))
        .with((!cli.log_json).then(|| fmt::layer().with_target(false)))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::List(args) => commands::list::execute(args).await,
        Commands::Preview(args) => commands::preview::execute(args).await,
        Commands::Emit(args) => commands::emit::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

fn default_log_filter(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "warn"
    } else if verbose {
        "wright=debug,warn"
    } else {
        "wright=info,warn"
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(program_error) = e.downcast_ref::<ProgramError>() {
        return match program_error {
            ProgramError::ProgramNotFound(_) => ExitCodes::INVALID_ARGS,
            ProgramError::Engine(engine_error) => categorize_engine_error(engine_error),
        };
    }

    if let Some(engine_error) = e.downcast_ref::<EngineError>() {
        return categorize_engine_error(engine_error);
    }

    ExitCodes::GENERAL_ERROR
}

fn categorize_engine_error(e: &EngineError) -> u8 {
    if e.is_config_error() {
        return ExitCodes::CONFIG_ERROR;
    }

    match e {
        EngineError::Io(_) | EngineError::Yaml(_) | EngineError::Json(_) => {
            ExitCodes::GENERAL_ERROR
        }
        _ => ExitCodes::ENGINE_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use commands::StackArgs;
    use std::fs;
    use tempfile::tempdir;

    fn args_with_config_file(path: &std::path::Path) -> StackArgs {
        StackArgs {
            program: "nginx-app".to_string(),
            stack: "dev".to_string(),
            config_file: Some(path.to_path_buf()),
            config: Vec::new(),
        }
    }

    #[test]
    fn test_unknown_program_is_invalid_args() {
        let err = anyhow::Error::from(ProgramError::ProgramNotFound("nope".to_string()));
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);
    }

    #[test]
    fn test_config_errors() {
        let missing: anyhow::Result<()> =
            Err(EngineError::ConfigMissing("01-solution:nginxTitle".to_string()))
                .context("Program nginx-app failed");
        assert_eq!(categorize_error(&missing.unwrap_err()), ExitCodes::CONFIG_ERROR);

        let override_err =
            anyhow::Error::from(EngineError::InvalidOverride("novalue".to_string()));
        assert_eq!(categorize_error(&override_err), ExitCodes::CONFIG_ERROR);
    }

    #[test]
    fn test_unreadable_config_file_is_config_error() {
        let dir = tempdir().unwrap();
        let malformed = dir.path().join("Pulumi.dev.yaml");
        fs::write(&malformed, "config: [not, a, map").unwrap();

        let err = args_with_config_file(&malformed)
            .settings_in(dir.path(), "01-solution")
            .unwrap_err();
        assert_eq!(categorize_error(&err), ExitCodes::CONFIG_ERROR);

        let err = args_with_config_file(&dir.path().join("nope.yaml"))
            .settings_in(dir.path(), "01-solution")
            .unwrap_err();
        assert_eq!(categorize_error(&err), ExitCodes::CONFIG_ERROR);
    }

    #[test]
    fn test_engine_errors() {
        let err = anyhow::Error::from(ProgramError::Engine(EngineError::RegistrationFailed {
            name: "firewall".to_string(),
            message: "quota".to_string(),
        }));
        assert_eq!(categorize_error(&err), ExitCodes::ENGINE_ERROR);

        let err = anyhow::Error::from(EngineError::DuplicateResource("a".to_string()));
        assert_eq!(categorize_error(&err), ExitCodes::ENGINE_ERROR);
    }

    #[test]
    fn test_other_errors_are_general() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(categorize_error(&err), ExitCodes::GENERAL_ERROR);
    }

    #[test]
    fn test_default_log_filter() {
        assert_eq!(default_log_filter(false, false), "wright=info,warn");
        assert_eq!(default_log_filter(true, false), "wright=debug,warn");
        assert_eq!(default_log_filter(true, true), "warn");
    }
}
