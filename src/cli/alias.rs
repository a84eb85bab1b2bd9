//! Alias management commands

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use clap::Subcommand;
use dialoguer::Confirm;
use sd::alias::{AliasSource, AliasSpec, BUILTINS, is_builtin, parse_env_overrides};
use sd::error::{Error, Result};

/// Subcommands of `sd alias`
#[derive(Debug, Subcommand)]
pub enum AliasCommand {
    /// Define or replace a user alias
    Set {
        /// Alias name
        name: String,
        /// Main command template to run on each branch
        #[arg(long, value_name = "CMD")]
        run: String,
        /// Command to run once before the traversal starts
        #[arg(long = "pre-flight", value_name = "CMD")]
        pre_flight: Option<String>,
        /// Command to run once after the traversal completes
        #[arg(long = "post-flight", value_name = "CMD")]
        post_flight: Option<String>,
        /// Only run on descendant branches, skipping the start branch
        #[arg(long = "descendants-only")]
        descendants_only: bool,
        /// Start execution from the root of the stack
        #[arg(long = "start-from-root")]
        start_from_root: bool,
        /// Description shown in listings
        #[arg(long)]
        description: Option<String>,
        /// Default remediation for --continue
        #[arg(long = "continue-cmd", value_name = "CMD")]
        continue_cmd: Option<String>,
        /// Default remediation for --abort
        #[arg(long = "abort-cmd", value_name = "CMD")]
        abort_cmd: Option<String>,
        /// Default environment variable (repeatable)
        #[arg(long = "env", value_name = "KEY=VALUE")]
        env: Vec<String>,
        /// Redefine a built-in alias without prompting
        #[arg(long)]
        force: bool,
    },

    /// List built-in and user aliases
    #[command(alias = "ls")]
    List {
        /// Show the full definition of each alias
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show one alias in detail
    Show {
        /// Alias name
        name: String,
    },

    /// Remove a user alias
    Rm {
        /// Alias name
        name: String,
    },
}

/// Dispatch `sd alias` subcommands.
pub fn run_alias_command(ctx: &mut CommandContext, command: AliasCommand) -> Result<()> {
    match command {
        AliasCommand::Set {
            name,
            run,
            pre_flight,
            post_flight,
            descendants_only,
            start_from_root,
            description,
            continue_cmd,
            abort_cmd,
            env,
            force,
        } => {
            let spec = AliasSpec {
                description: description.unwrap_or_else(|| format!("User alias for: {run}")),
                run,
                pre_flight,
                post_flight,
                descendants_only,
                start_from_root,
                continue_cmd,
                abort_cmd,
                env: parse_env_overrides(&env)?,
            };
            set_alias(ctx, &name, spec, force)
        }
        AliasCommand::List { verbose } => {
            list_aliases(ctx, verbose);
            Ok(())
        }
        AliasCommand::Show { name } => show_alias(ctx, &name),
        AliasCommand::Rm { name } => {
            ctx.registry.remove(&name)?;
            ctx.registry.save(&ctx.repo_root)?;
            println!("{} User alias '{}' removed.", check(), name.accent());
            Ok(())
        }
    }
}

/// Define a user alias, confirming interactively before shadowing a built-in.
fn set_alias(ctx: &mut CommandContext, name: &str, spec: AliasSpec, force: bool) -> Result<()> {
    let result = ctx.registry.set(name, spec.clone(), force);
    match result {
        Err(Error::AliasShadowsBuiltin(_)) => {
            let confirmed = Confirm::new()
                .with_prompt(format!("'{name}' is a built-in alias. Redefine it?"))
                .default(false)
                .interact()
                .map_err(|_| Error::AliasShadowsBuiltin(name.to_string()))?;
            if !confirmed {
                return Err(Error::AliasShadowsBuiltin(name.to_string()));
            }
            ctx.registry.set(name, spec, true)?;
        }
        other => other?,
    }
    ctx.registry.save(&ctx.repo_root)?;

    println!("{} User alias '{}' saved.", check(), name.accent());
    let (saved, _) = ctx.registry.resolve(name)?;
    print_spec(saved, "   ");
    Ok(())
}

fn list_aliases(ctx: &CommandContext, verbose: bool) {
    println!("{}", "Built-in aliases:".emphasis());
    for (name, spec) in BUILTINS.iter() {
        println!("  {}: {}", name.accent(), spec.description.muted());
        if verbose {
            print_spec(spec, "    ");
        }
    }

    let user = ctx.registry.user_aliases();
    if !user.is_empty() {
        println!();
        println!("{}", "User aliases (.sd_aliases.json):".emphasis());
        for (name, spec) in user {
            println!("  {}: {}", name.accent(), spec.description.muted());
            if verbose {
                print_spec(spec, "    ");
            }
        }
    }
}

fn show_alias(ctx: &CommandContext, name: &str) -> Result<()> {
    let (spec, source) = ctx.registry.resolve(name)?;
    let origin = match source {
        AliasSource::Builtin => "built-in",
        AliasSource::User => "user-defined",
    };
    println!("{} {} {}", "Alias:".emphasis(), name.accent(), format!("({origin})").muted());
    if is_builtin(name) && source == AliasSource::User {
        println!("{}", "  (shadows a built-in)".warn());
    }
    println!("Description: {}", spec.description);
    print_spec(spec, "");
    Ok(())
}

fn print_spec(spec: &AliasSpec, indent: &str) {
    println!("{indent}Run: {}", spec.run);
    if let Some(pre) = &spec.pre_flight {
        println!("{indent}Pre-flight: {pre}");
    }
    if let Some(post) = &spec.post_flight {
        println!("{indent}Post-flight: {post}");
    }
    if spec.descendants_only {
        println!("{indent}Descendants only: yes");
    }
    if spec.start_from_root {
        println!("{indent}Start from root: yes");
    }
    if let Some(cmd) = &spec.continue_cmd {
        println!("{indent}Continue command: {cmd}");
    }
    if let Some(cmd) = &spec.abort_cmd {
        println!("{indent}Abort command: {cmd}");
    }
    if !spec.env.is_empty() {
        let pairs: Vec<String> = spec.env.iter().map(|(k, v)| format!("{k}={v}")).collect();
        println!("{indent}Environment: {}", pairs.join(", "));
    }
}
