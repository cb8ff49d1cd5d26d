//! Application layer: the allocation commands
//!
//! This layer orchestrates domain validation and depends on I/O boundary traits.

pub mod commands;
pub mod error;
pub mod error_ext;

pub use error::{stage, ApplicationError, ApplicationResult};
pub use error_ext::InfraResultExt;
