//! Command dispatch: maps parsed arguments onto application commands

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::commands::{
    execute, AllocateCommand, Command, UpdateAllocationCommand,
};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::CliResult;
use crate::config::{global_config_path, Settings};
use crate::domain::ModelSelector;
use crate::infrastructure::di::ServiceContainer;

/// Execute the parsed command, writing results to stdout.
pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute_command_to(cli, container, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Execute the parsed command, writing results to `out`.
pub fn execute_command_to(
    cli: &Cli,
    container: &ServiceContainer,
    out: &mut dyn Write,
) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Allocate { args }) => {
            let selector = model_selector(cli, &container.settings)?;
            let mut command = AllocateCommand::new(selector, &container.allocate_deps());
            run(&mut command, args, out)
        }
        Some(Commands::UpdateAllocation { args }) => {
            let selector = model_selector(cli, &container.settings)?;
            let mut command =
                UpdateAllocationCommand::new(selector, &container.update_allocation_deps());
            run(&mut command, args, out)
        }
        Some(Commands::Config { command }) => _config(command, &container.settings, out),
        Some(Commands::Completion { shell }) => _completion(*shell, out),
        None => {
            write!(out, "{}", Cli::command().render_help())?;
            Ok(())
        }
    }
}

/// Model selection: `--model` wins over the configured default.
fn model_selector(cli: &Cli, settings: &Settings) -> CliResult<ModelSelector> {
    let selector = match cli.model.as_deref().or(settings.model.as_deref()) {
        Some(value) => ModelSelector::parse(value).map_err(ApplicationError::from)?,
        None => ModelSelector::default(),
    };
    Ok(selector.with_account(settings.account.clone()))
}

#[instrument(skip_all, fields(command = command.info().name))]
fn run(command: &mut dyn Command, args: &[String], out: &mut dyn Write) -> CliResult<()> {
    debug!("args: {:?}", args);
    execute(command, args, out)?;
    Ok(())
}

fn _config(command: &ConfigCommands, settings: &Settings, out: &mut dyn Write) -> CliResult<()> {
    match command {
        ConfigCommands::Show => write!(out, "{}", settings.to_toml()?)?,
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unavailable>".into());
            writeln!(out, "{}", output::labelled("global", &global))?;
            writeln!(
                out,
                "{}",
                output::labelled("data", &settings.data_dir.display())
            )?;
            writeln!(
                out,
                "{}",
                output::labelled("token", &settings.token_file().display())
            )?;
        }
        ConfigCommands::Template => write!(out, "{}", Settings::template())?,
    }
    Ok(())
}

fn _completion(shell: Shell, out: &mut dyn Write) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
    Ok(())
}
