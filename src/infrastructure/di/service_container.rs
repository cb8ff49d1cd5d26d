//! Service container for dependency injection
//!
//! Wires up the stores, the session factory and the API client factory.

use std::sync::Arc;

use crate::application::commands::CommandDeps;
use crate::config::Settings;
use crate::infrastructure::budget_api::BudgetApiClientFactory;
use crate::infrastructure::http::BakerySessionFactory;
use crate::infrastructure::store::{ClientStore, EndpointStore};
use crate::infrastructure::traits::{
    ApiClientFactory, FileSystem, ModelResolver, RealFileSystem, SessionFactory,
};

/// Container holding the collaborators of both commands.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Controller/account/model keyed store, used by `allocate`
    pub client_store: Arc<dyn ModelResolver>,

    /// Model-name keyed endpoint store, used by `update-allocation`
    pub endpoint_store: Arc<dyn ModelResolver>,

    /// Authenticated transport
    pub sessions: Arc<dyn SessionFactory>,

    /// Budget service client construction
    pub api_factory: Arc<dyn ApiClientFactory>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let client_store = Arc::new(ClientStore::new(fs.clone(), &settings.data_dir));
        let endpoint_store = Arc::new(EndpointStore::new(fs.clone(), &settings.data_dir));
        let sessions = Arc::new(BakerySessionFactory::new(
            fs,
            settings.token.clone(),
            settings.token_file(),
        ));
        let api_factory = Arc::new(BudgetApiClientFactory::new(settings.api_url.clone()));
        Self::with_deps(settings, client_store, endpoint_store, sessions, api_factory)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        client_store: Arc<dyn ModelResolver>,
        endpoint_store: Arc<dyn ModelResolver>,
        sessions: Arc<dyn SessionFactory>,
        api_factory: Arc<dyn ApiClientFactory>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            client_store,
            endpoint_store,
            sessions,
            api_factory,
        }
    }

    /// Collaborators for `allocate`.
    pub fn allocate_deps(&self) -> CommandDeps {
        CommandDeps {
            resolver: self.client_store.clone(),
            sessions: self.sessions.clone(),
            api_factory: self.api_factory.clone(),
        }
    }

    /// Collaborators for `update-allocation`.
    pub fn update_allocation_deps(&self) -> CommandDeps {
        CommandDeps {
            resolver: self.endpoint_store.clone(),
            sessions: self.sessions.clone(),
            api_factory: self.api_factory.clone(),
        }
    }
}
