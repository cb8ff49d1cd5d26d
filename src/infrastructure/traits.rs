//! I/O boundary traits for testability
//!
//! These traits abstract the local stores, the authenticated transport and the
//! remote allocation service, allowing commands to be tested with stub implementations.

use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::domain::{AllocationRequest, AllocationUpdate, ModelSelector};
use crate::infrastructure::InfraResult;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Resolves the selected model to its UUID from local client state.
pub trait ModelResolver: Send + Sync {
    fn model_uuid(&self, selector: &ModelSelector) -> InfraResult<String>;
}

/// An authenticated HTTP session.
///
/// Owned by one command invocation and closed when the command finishes.
pub trait HttpSession: Send {
    /// Client carrying the session credentials.
    fn http(&self) -> &reqwest::blocking::Client;

    /// Release the session. Calling it twice is a no-op.
    fn close(&mut self) -> InfraResult<()>;
}

/// Opens authenticated HTTP sessions.
pub trait SessionFactory: Send + Sync {
    fn open(&self) -> InfraResult<Box<dyn HttpSession>>;
}

/// The remote allocation service.
pub trait AllocationApi: Send + Sync {
    /// Allocate `request.budget` to exactly `request.services`, replacing any prior
    /// allocation of those services. Returns the service's confirmation message.
    fn create_allocation(&self, request: &AllocationRequest) -> InfraResult<String>;

    /// Change the limit of the allocation already bound to `update.service`.
    fn update_allocation(&self, update: &AllocationUpdate) -> InfraResult<String>;
}

/// Builds an [`AllocationApi`] on top of an authenticated session.
pub trait ApiClientFactory: Send + Sync {
    fn new_client(&self, session: &dyn HttpSession) -> InfraResult<Arc<dyn AllocationApi>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
