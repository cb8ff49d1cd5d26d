//! Allocation commands
//!
//! Each command validates its arguments in [`Command::init`] and performs exactly one
//! remote request in [`Command::run`]. Collaborators are injected through [`CommandDeps`].

pub mod allocate;
mod context;
pub mod update_allocation;

use std::io::Write;
use std::sync::Arc;

use crate::application::ApplicationResult;
use crate::infrastructure::traits::{ApiClientFactory, ModelResolver, SessionFactory};

pub use allocate::AllocateCommand;
pub use context::{HttpScope, ModelContext};
pub use update_allocation::UpdateAllocationCommand;

/// Name and help text of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub purpose: &'static str,
    pub doc: &'static str,
}

/// A single-shot command: validate, then run once.
pub trait Command {
    fn info(&self) -> CommandInfo;

    /// Validate positional arguments. No network access happens here.
    fn init(&mut self, args: &[String]) -> ApplicationResult<()>;

    /// Perform the request and write the service's message to `out`.
    fn run(&mut self, out: &mut dyn Write) -> ApplicationResult<()>;
}

/// Collaborators a command is constructed with.
#[derive(Clone)]
pub struct CommandDeps {
    pub resolver: Arc<dyn ModelResolver>,
    pub sessions: Arc<dyn SessionFactory>,
    pub api_factory: Arc<dyn ApiClientFactory>,
}

/// Initialise `command` with `args` and run it.
pub fn execute(
    command: &mut dyn Command,
    args: &[String],
    out: &mut dyn Write,
) -> ApplicationResult<()> {
    command.init(args)?;
    command.run(out)
}
