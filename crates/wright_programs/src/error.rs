//! Error types for the programs module.

use thiserror::Error;

/// Result type alias for program lookup and execution.
pub type ProgramResult<T> = Result<T, ProgramError>;

/// Errors that can occur when selecting or running a program.
#[derive(Error, Debug)]
pub enum ProgramError {
    #[error("Program not found: {0}")]
    ProgramNotFound(String),

    #[error(transparent)]
    Engine(#[from] wright_engine::EngineError),
}
