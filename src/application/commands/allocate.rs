//! `allocate`: assign a budget allocation to services

use std::io::Write;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::commands::{Command, CommandDeps, CommandInfo, HttpScope, ModelContext};
use crate::application::{stage, ApplicationError, ApplicationResult, InfraResultExt};
use crate::domain::{AllocationRequest, BudgetSpec, ModelSelector};
use crate::infrastructure::traits::{AllocationApi, ApiClientFactory};

pub const NAME: &str = "allocate";

pub const PURPOSE: &str = "allocate budget to services";

pub const DOC: &str = "\
Allocate budget for the specified services, replacing any prior allocations
made for the specified services.

Usage:

 budgetctl allocate <budget>:<value> <service> [<service2> ...]

Example:

 budgetctl allocate somebudget:42 db
     Assigns service \"db\" to an allocation on budget \"somebudget\" with the limit \"42\".
";

/// Creates or replaces the allocation of a budget across one or more services.
pub struct AllocateCommand {
    model: ModelContext,
    http: HttpScope,
    api_factory: Arc<dyn ApiClientFactory>,
    api: Option<Arc<dyn AllocationApi>>,
    request: Option<AllocationRequest>,
}

impl AllocateCommand {
    pub fn new(selector: ModelSelector, deps: &CommandDeps) -> Self {
        Self {
            model: ModelContext::new(selector, deps.resolver.clone()),
            http: HttpScope::new(deps.sessions.clone()),
            api_factory: deps.api_factory.clone(),
            api: None,
            request: None,
        }
    }

    /// Whether an HTTP session is currently held.
    pub fn is_session_open(&self) -> bool {
        self.http.is_open()
    }

    /// The validated request, available after a successful `init`.
    pub fn request(&self) -> Option<&AllocationRequest> {
        self.request.as_ref()
    }
}

impl Command for AllocateCommand {
    fn info(&self) -> CommandInfo {
        CommandInfo {
            name: NAME,
            purpose: PURPOSE,
            doc: DOC,
        }
    }

    fn init(&mut self, args: &[String]) -> ApplicationResult<()> {
        if args.len() < 2 {
            return Err(ApplicationError::InvalidArgs(
                "budget and service name required".into(),
            ));
        }
        let spec = BudgetSpec::parse(&args[0])?;
        let model = self.model.model_uuid().identity_stage(stage::MODEL_UUID)?;
        debug!(
            "init: budget={}, model={}, services={:?}",
            spec, model, &args[1..]
        );
        self.request = Some(AllocationRequest::new(spec, model, args[1..].to_vec())?);
        Ok(())
    }

    #[instrument(skip_all, fields(model = %self.model.selector()))]
    fn run(&mut self, out: &mut dyn Write) -> ApplicationResult<()> {
        let request = self.request.clone().ok_or_else(|| {
            ApplicationError::InvalidArgs("budget and service name required".into())
        })?;

        let session = self.http.new_client().transport_stage(stage::HTTP_CLIENT)?;
        let api = match &self.api {
            Some(api) => api.clone(),
            None => {
                let api = self
                    .api_factory
                    .new_client(session)
                    .transport_stage(stage::API_CLIENT)?;
                self.api = Some(api.clone());
                api
            }
        };

        let message = api
            .create_allocation(&request)
            .remote_stage(stage::CREATE_ALLOCATION)?;
        debug!("run: allocation created");
        out.write_all(message.as_bytes())?;
        Ok(())
    }
}
