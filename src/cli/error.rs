//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("cannot write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Io(_) => crate::exitcode::IOERR,
            CliError::Application(e) => match e {
                _ if e.is_usage() => crate::exitcode::USAGE,
                ApplicationError::IdentityResolution { .. } | ApplicationError::Config { .. } => {
                    crate::exitcode::CONFIG
                }
                ApplicationError::Transport { source, .. }
                | ApplicationError::Remote { source, .. }
                    if source.is_auth_failure() =>
                {
                    crate::exitcode::NOPERM
                }
                ApplicationError::Transport { .. } | ApplicationError::Remote { .. } => {
                    crate::exitcode::UNAVAILABLE
                }
                ApplicationError::Output(_) => crate::exitcode::IOERR,
                _ => crate::exitcode::SOFTWARE,
            },
        }
    }
}
