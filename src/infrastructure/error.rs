//! Infrastructure-level errors (local stores and the HTTP boundary)

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at I/O boundaries: local model stores, credentials and the remote API.
///
/// Application code treats these as opaque causes and annotates them with the stage
/// that failed.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("no credentials: {0}")]
    Credentials(String),

    #[error("invalid api url: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("interaction required: visit {visit_url} to authenticate")]
    InteractionRequired { visit_url: String },
}

impl InfraError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the failure means the caller is not authorised.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            InfraError::Credentials(_) | InfraError::InteractionRequired { .. } => true,
            InfraError::Remote { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
