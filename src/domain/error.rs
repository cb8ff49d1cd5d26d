//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed input values.
/// These are detected locally, before any store or network access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid budget specification, expecting <budget>:<limit>")]
    MalformedSpec { token: String },

    #[error("at least one service is required")]
    NoServices,

    #[error("invalid model name {0:?}, expecting [<controller>:]<model>")]
    InvalidModelSelector(String),
}
