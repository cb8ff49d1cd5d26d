//! Stub collaborators that record how the commands use them
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use budgetctl::application::commands::CommandDeps;
use budgetctl::domain::{AllocationRequest, AllocationUpdate, ModelSelector};
use budgetctl::infrastructure::traits::{
    AllocationApi, ApiClientFactory, HttpSession, ModelResolver, SessionFactory,
};
use budgetctl::infrastructure::{InfraError, InfraResult};

pub const MODEL_UUID: &str = "deadbeef-0bad-400d-8000-4b1d0d06f00d";

pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[derive(Default)]
pub struct StubResolver {
    pub failure: Option<String>,
    pub calls: AtomicUsize,
    pub selectors: Mutex<Vec<ModelSelector>>,
}

impl ModelResolver for StubResolver {
    fn model_uuid(&self, selector: &ModelSelector) -> InfraResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.selectors.lock().unwrap().push(selector.clone());
        match &self.failure {
            Some(message) => Err(InfraError::NotFound(message.clone())),
            None => Ok(MODEL_UUID.to_string()),
        }
    }
}

pub struct StubSession {
    client: reqwest::blocking::Client,
    closes: Arc<AtomicUsize>,
}

impl HttpSession for StubSession {
    fn http(&self) -> &reqwest::blocking::Client {
        &self.client
    }

    fn close(&mut self) -> InfraResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct StubSessionFactory {
    pub failure: Option<String>,
    pub opens: AtomicUsize,
    pub closes: Arc<AtomicUsize>,
}

impl SessionFactory for StubSessionFactory {
    fn open(&self) -> InfraResult<Box<dyn HttpSession>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            return Err(InfraError::Credentials(message.clone()));
        }
        Ok(Box::new(StubSession {
            client: reqwest::blocking::Client::new(),
            closes: self.closes.clone(),
        }))
    }
}

pub struct RecordingApi {
    pub response: Result<String, String>,
    pub created: Mutex<Vec<AllocationRequest>>,
    pub updated: Mutex<Vec<AllocationUpdate>>,
}

impl RecordingApi {
    pub fn replying(message: &str) -> Self {
        Self {
            response: Ok(message.to_string()),
            created: Mutex::default(),
            updated: Mutex::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            created: Mutex::default(),
            updated: Mutex::default(),
        }
    }

    fn reply(&self) -> InfraResult<String> {
        self.response.clone().map_err(|message| InfraError::Remote {
            status: 404,
            message,
        })
    }
}

impl AllocationApi for RecordingApi {
    fn create_allocation(&self, request: &AllocationRequest) -> InfraResult<String> {
        self.created.lock().unwrap().push(request.clone());
        self.reply()
    }

    fn update_allocation(&self, update: &AllocationUpdate) -> InfraResult<String> {
        self.updated.lock().unwrap().push(update.clone());
        self.reply()
    }
}

pub struct StubApiFactory {
    pub api: Arc<RecordingApi>,
    pub failure: Option<String>,
    pub creations: AtomicUsize,
}

impl StubApiFactory {
    pub fn new(api: RecordingApi) -> Self {
        Self {
            api: Arc::new(api),
            failure: None,
            creations: AtomicUsize::new(0),
        }
    }
}

impl ApiClientFactory for StubApiFactory {
    fn new_client(&self, _session: &dyn HttpSession) -> InfraResult<Arc<dyn AllocationApi>> {
        self.creations.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            return Err(InfraError::NotFound(message.clone()));
        }
        Ok(self.api.clone())
    }
}

/// All stubs for one command invocation.
pub struct Harness {
    pub resolver: Arc<StubResolver>,
    pub sessions: Arc<StubSessionFactory>,
    pub api_factory: Arc<StubApiFactory>,
}

impl Harness {
    pub fn new(api: RecordingApi) -> Self {
        budgetctl::util::testing::init_test_setup();
        Self {
            resolver: Arc::new(StubResolver::default()),
            sessions: Arc::new(StubSessionFactory::default()),
            api_factory: Arc::new(StubApiFactory::new(api)),
        }
    }

    pub fn with_resolver_failure(mut self, message: &str) -> Self {
        self.resolver = Arc::new(StubResolver {
            failure: Some(message.to_string()),
            ..StubResolver::default()
        });
        self
    }

    pub fn with_session_failure(mut self, message: &str) -> Self {
        self.sessions = Arc::new(StubSessionFactory {
            failure: Some(message.to_string()),
            ..StubSessionFactory::default()
        });
        self
    }

    pub fn with_api_factory_failure(mut self, message: &str) -> Self {
        self.api_factory = Arc::new(StubApiFactory {
            api: self.api_factory.api.clone(),
            failure: Some(message.to_string()),
            creations: AtomicUsize::new(0),
        });
        self
    }

    pub fn created(&self) -> Vec<AllocationRequest> {
        self.api_factory.api.created.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<AllocationUpdate> {
        self.api_factory.api.updated.lock().unwrap().clone()
    }

    pub fn deps(&self) -> CommandDeps {
        CommandDeps {
            resolver: self.resolver.clone(),
            sessions: self.sessions.clone(),
            api_factory: self.api_factory.clone(),
        }
    }

    pub fn resolver_calls(&self) -> usize {
        self.resolver.calls.load(Ordering::SeqCst)
    }

    pub fn sessions_opened(&self) -> usize {
        self.sessions.opens.load(Ordering::SeqCst)
    }

    pub fn sessions_closed(&self) -> usize {
        self.sessions.closes.load(Ordering::SeqCst)
    }

    pub fn clients_created(&self) -> usize {
        self.api_factory.creations.load(Ordering::SeqCst)
    }
}
