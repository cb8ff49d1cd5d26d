//! `update-allocation`: change the limit of an existing allocation

use std::io::Write;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::commands::{Command, CommandDeps, CommandInfo, HttpScope, ModelContext};
use crate::application::{stage, ApplicationError, ApplicationResult, InfraResultExt};
use crate::domain::{is_whole_number, AllocationUpdate, ModelSelector};
use crate::infrastructure::traits::ApiClientFactory;

pub const NAME: &str = "update-allocation";

pub const PURPOSE: &str = "update an allocation";

pub const DOC: &str = "\
Updates an existing allocation on a service.

Example:
 budgetctl update-allocation wordpress 10
     Sets the allocation for the wordpress service to 10.
";

/// Updates the limit of the allocation bound to one service.
///
/// Composes the model context with a scoped HTTP session; the session is closed when
/// `run` returns, whatever the outcome, and again on drop if `run` never happened.
pub struct UpdateAllocationCommand {
    model: ModelContext,
    http: HttpScope,
    api_factory: Arc<dyn ApiClientFactory>,
    target: Option<(String, String)>,
}

impl UpdateAllocationCommand {
    pub fn new(selector: ModelSelector, deps: &CommandDeps) -> Self {
        Self {
            model: ModelContext::new(selector, deps.resolver.clone()),
            http: HttpScope::new(deps.sessions.clone()),
            api_factory: deps.api_factory.clone(),
            target: None,
        }
    }

    /// Whether an HTTP session is currently held.
    pub fn is_session_open(&self) -> bool {
        self.http.is_open()
    }

    fn request_update(&mut self, out: &mut dyn Write) -> ApplicationResult<()> {
        let (service, value) = self.target.clone().ok_or_else(|| {
            ApplicationError::InvalidArgs("service and value required".into())
        })?;
        let model = self.model.model_uuid().identity_stage(stage::MODEL_UUID)?;
        let session = self.http.new_client().transport_stage(stage::HTTP_CLIENT)?;
        let api = self
            .api_factory
            .new_client(session)
            .transport_stage(stage::API_CLIENT)?;

        let update = AllocationUpdate {
            model,
            service,
            value,
        };
        debug!("run: {:?}", update);
        let message = api
            .update_allocation(&update)
            .remote_stage(stage::UPDATE_ALLOCATION)?;
        out.write_all(message.as_bytes())?;
        Ok(())
    }
}

impl Command for UpdateAllocationCommand {
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
                "service and value required".into(),
            ));
        }
        let (service, value) = (&args[0], &args[1]);
        if !is_whole_number(value) {
            return Err(ApplicationError::InvalidArgs(
                "value needs to be a whole number".into(),
            ));
        }
        if args.len() > 2 {
            return Err(ApplicationError::UnrecognizedArgs(args[2..].to_vec()));
        }
        self.target = Some((service.clone(), value.clone()));
        Ok(())
    }

    #[instrument(skip_all)]
    fn run(&mut self, out: &mut dyn Write) -> ApplicationResult<()> {
        let result = self.request_update(out);
        self.http.close();
        result
    }
}
