//! CLI-specific error types and exit-code mappings.

use ggbake_core::{PublishError, StageFailure, ValidationError};
use thiserror::Error;

/// CLI-facing error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A required input was missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// A pipeline stage failed; carries the external diagnostic.
    #[error("{0}")]
    Stage(String),

    /// Argument-level problem detected before the pipeline ran.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General/external failure
    /// - 2: Misuse (invalid arguments or missing inputs)
    /// - 74: IO error (EX_IOERR)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Stage(_) => 1,
            Self::Validation(_) | Self::Arguments(_) => 2,
            Self::Io(_) => 74,
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<StageFailure> for CliError {
    fn from(err: StageFailure) -> Self {
        Self::Stage(err.to_string())
    }
}

impl From<PublishError> for CliError {
    fn from(err: PublishError) -> Self {
        match err {
            PublishError::Validation(e) => e.into(),
            PublishError::Stage(e) => e.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// Interactive prompts report through anyhow (they only ever fail on stdin).
impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::Io(err.to_string())
    }
}
