//! Application-level errors (wraps domain and infrastructure errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// Stage annotations attached to infrastructure failures.
pub mod stage {
    pub const MODEL_UUID: &str = "failed to get model uuid";
    pub const HTTP_CLIENT: &str = "failed to create an http client";
    pub const API_CLIENT: &str = "failed to create an api client";
    pub const CREATE_ALLOCATION: &str = "failed to create allocation";
    pub const UPDATE_ALLOCATION: &str = "failed to update the allocation";
}

/// Application errors: argument validation plus annotated boundary failures.
///
/// Boundary failures render as `<stage>: <cause>`.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    InvalidArgs(String),

    #[error("unrecognized args: {0:?}")]
    UnrecognizedArgs(Vec<String>),

    #[error("{context}: {source}")]
    IdentityResolution {
        context: &'static str,
        #[source]
        source: InfraError,
    },

    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: InfraError,
    },

    #[error("{context}: {source}")]
    Remote {
        context: &'static str,
        #[source]
        source: InfraError,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

impl ApplicationError {
    /// Whether the error was detected from the command line alone.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            ApplicationError::Domain(_)
                | ApplicationError::InvalidArgs(_)
                | ApplicationError::UnrecognizedArgs(_)
        )
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
