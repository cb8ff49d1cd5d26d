//! CLI argument definitions using clap

use clap::{ArgAction, Parser, Subcommand};

use crate::application::commands::{allocate, update_allocation};

/// Allocate budgets to services running in a managed model
#[derive(Parser, Debug)]
#[command(name = "budgetctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Model to operate in, [<controller>:]<model>
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Allocate budget to services
    #[command(long_about = allocate::DOC)]
    Allocate {
        /// <budget>:<limit> <service> [<service2> ...]
        #[arg(value_name = "ARGS", allow_negative_numbers = true)]
        args: Vec<String>,
    },

    /// Update an allocation
    #[command(name = "update-allocation", long_about = update_allocation::DOC)]
    UpdateAllocation {
        /// <service> <value>
        #[arg(value_name = "ARGS", allow_negative_numbers = true)]
        args: Vec<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,

    /// Show config paths
    Path,

    /// Print a config template
    Template,
}
