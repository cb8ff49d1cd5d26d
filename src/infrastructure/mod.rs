//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements the boundary traits the commands depend on: model stores,
//! the authenticated HTTP session and the budget API client.

pub mod budget_api;
pub mod di;
pub mod error;
pub mod http;
pub mod store;
pub mod traits;

pub use error::{InfraError, InfraResult};
