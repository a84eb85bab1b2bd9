//! Command-line surface for sd
//!
//! Thin layer over the library: clap parsing, dispatch, and exit-code
//! mapping. Alias names act as dynamic subcommands (`sd update`, `sd sync`,
//! user-defined names) via clap's external-subcommand escape.

mod add;
mod alias;
mod context;
mod prune;
mod run;
pub mod style;
mod tree;

use crate::cli::context::CommandContext;
use clap::{Parser, Subcommand};
use sd::error::Result;
use std::process::ExitCode;

/// Exit code signalling "run paused; resolve, then --continue or --abort".
pub const EXIT_PAUSED: u8 = 3;

/// A tool for managing stacked git branches
#[derive(Debug, Parser)]
#[command(name = "sd", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new branch stacked on top of the current branch
    Add {
        /// Name of the new branch
        branch: String,
    },

    /// Run a shell command on the current branch and all its descendants
    Run {
        /// Command template; `$SD_CURRENT_BRANCH` etc. are expanded by the shell
        #[arg(value_name = "COMMAND")]
        command: Option<String>,

        /// Command to run once before the traversal starts
        #[arg(long = "pre-flight", value_name = "CMD")]
        pre_flight: Option<String>,

        /// Command to run once after the traversal completes
        #[arg(long = "post-flight", value_name = "CMD")]
        post_flight: Option<String>,

        /// Continue a paused run, optionally with a remediation command
        #[arg(long = "continue", value_name = "CMD", num_args = 0..=1, conflicts_with = "abort_run")]
        continue_run: Option<Option<String>>,

        /// Abort a paused run, optionally with a remediation command
        #[arg(long = "abort", value_name = "CMD", num_args = 0..=1)]
        abort_run: Option<Option<String>>,
    },

    /// Show all tracked branches as a tree under the trunk
    Tree,

    /// Delete and untrack branches fully merged into the trunk
    Prune,

    /// Manage command aliases
    Alias {
        #[command(subcommand)]
        command: alias::AliasCommand,
    },

    /// Invoke an alias: `sd <alias> [KEY=VALUE ...] [--continue [CMD] | --abort [CMD]]`
    #[command(external_subcommand)]
    External(Vec<String>),
}

/// Parse arguments and dispatch. Returns the process exit code.
pub fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut ctx = CommandContext::new()?;

    match cli.command {
        Command::Add { branch } => {
            add::run_add(&mut ctx, &branch)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run {
            command,
            pre_flight,
            post_flight,
            continue_run,
            abort_run,
        } => run::run_command(&ctx, command, pre_flight, post_flight, continue_run, abort_run),
        Command::Tree => {
            tree::run_tree(&ctx);
            Ok(ExitCode::SUCCESS)
        }
        Command::Prune => {
            prune::run_prune(&mut ctx)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Alias { command } => {
            alias::run_alias_command(&mut ctx, command)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::External(tokens) => run::run_alias(&ctx, &tokens),
    }
}
