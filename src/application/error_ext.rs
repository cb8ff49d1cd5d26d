//! Stage annotation helpers for boundary results
//!
//! Provides extension traits for wrapping infrastructure failures with the stage that failed.

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::InfraResult;

/// Extension trait for converting `InfraResult` to `ApplicationResult` with a stage label.
///
/// # Example
/// ```ignore
/// let session = scope.new_client().transport_stage(stage::HTTP_CLIENT)?;
/// ```
pub trait InfraResultExt<T> {
    /// Local model store lookup failed.
    fn identity_stage(self, context: &'static str) -> ApplicationResult<T>;

    /// Building the session or the API client failed.
    fn transport_stage(self, context: &'static str) -> ApplicationResult<T>;

    /// The remote service call failed.
    fn remote_stage(self, context: &'static str) -> ApplicationResult<T>;
}

impl<T> InfraResultExt<T> for InfraResult<T> {
    fn identity_stage(self, context: &'static str) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::IdentityResolution { context, source })
    }

    fn transport_stage(self, context: &'static str) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Transport { context, source })
    }

    fn remote_stage(self, context: &'static str) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Remote { context, source })
    }
}
