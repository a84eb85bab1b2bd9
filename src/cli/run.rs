//! Run command and dynamic alias dispatch
//!
//! Both paths converge on the same engine flow: resolve a spec (ad-hoc for
//! `sd run`, from the registry for `sd <alias>`), then start, resume, or
//! abort depending on the flags.

use crate::cli::EXIT_PAUSED;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::{eprintln, println};
use sd::alias::{AliasSpec, parse_env_overrides};
use sd::engine::Outcome;
use sd::git::Vcs;
use sd::error::{Error, Result};
use sd::git::ensure_clean_state;
use std::collections::BTreeMap;
use std::process::ExitCode;

/// Continue/abort flags and env overrides for one invocation
#[derive(Debug, Default)]
struct RunFlow {
    continue_run: Option<Option<String>>,
    abort_run: Option<Option<String>>,
    overrides: BTreeMap<String, String>,
}

/// Handle `sd run`.
pub fn run_command(
    ctx: &CommandContext,
    command: Option<String>,
    pre_flight: Option<String>,
    post_flight: Option<String>,
    continue_run: Option<Option<String>>,
    abort_run: Option<Option<String>>,
) -> Result<ExitCode> {
    let resuming = continue_run.is_some() || abort_run.is_some();
    if resuming && command.is_some() {
        return Err(Error::Usage(
            "cannot provide a COMMAND when using --continue or --abort".to_string(),
        ));
    }
    if !resuming && command.is_none() {
        return Err(Error::Usage(
            "a COMMAND is required for a new run operation".to_string(),
        ));
    }

    let spec = AliasSpec {
        run: command.unwrap_or_default(),
        pre_flight,
        post_flight,
        ..AliasSpec::default()
    };
    let flow = RunFlow {
        continue_run,
        abort_run,
        overrides: BTreeMap::new(),
    };
    execute(ctx, "run", &spec, flow)
}

/// Handle `sd <alias> [KEY=VALUE ...] [--continue [CMD] | --abort [CMD]]`.
pub fn run_alias(ctx: &CommandContext, tokens: &[String]) -> Result<ExitCode> {
    let (name, rest) = tokens
        .split_first()
        .ok_or_else(|| Error::Usage("missing alias name".to_string()))?;

    let flow = parse_alias_tokens(rest)?;
    let (spec, _) = ctx.registry.resolve(name)?;
    execute(ctx, name, spec, flow)
}

/// Parse the free-form tokens after an alias name.
fn parse_alias_tokens(tokens: &[String]) -> Result<RunFlow> {
    let mut flow = RunFlow::default();
    let mut env_tokens = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--continue" || token == "--abort" {
            // Anything following the flag is a remediation command, which may
            // itself contain '=' (e.g. "git -c rerere.enabled=true rebase --continue").
            let value = tokens.get(i + 1).filter(|next| !next.starts_with("--"));
            if let Some(v) = value {
                i += 1;
                set_flow_flag(&mut flow, token, Some(v.clone()))?;
            } else {
                set_flow_flag(&mut flow, token, None)?;
            }
        } else if !token.starts_with("--") && token.contains('=') {
            env_tokens.push(token.clone());
        } else {
            return Err(Error::Usage(format!(
                "invalid alias argument '{token}': expected KEY=VALUE, --continue, or --abort"
            )));
        }
        i += 1;
    }

    let resuming = flow.continue_run.is_some() || flow.abort_run.is_some();
    if resuming && !env_tokens.is_empty() {
        return Err(Error::EnvDuringResume);
    }
    flow.overrides = parse_env_overrides(&env_tokens)?;
    Ok(flow)
}

fn set_flow_flag(flow: &mut RunFlow, flag: &str, value: Option<String>) -> Result<()> {
    if flow.continue_run.is_some() || flow.abort_run.is_some() {
        return Err(Error::Usage(
            "--continue and --abort are mutually exclusive and may appear only once".to_string(),
        ));
    }
    if flag == "--continue" {
        flow.continue_run = Some(value);
    } else {
        flow.abort_run = Some(value);
    }
    Ok(())
}

/// Shared engine flow for `run` and alias invocations.
fn execute(ctx: &CommandContext, operation: &str, spec: &AliasSpec, flow: RunFlow) -> Result<ExitCode> {
    let engine = ctx.engine();

    if let Some(remediation) = flow.abort_run {
        println!("Aborting '{}' operation...", operation.accent());
        engine.abort(remediation.as_deref())?;
        println!("{} Abort complete for '{}'.", check(), operation.accent());
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(remediation) = flow.continue_run {
        println!("Continuing '{}' operation...", operation.accent());
        let outcome = engine.resume(&ctx.graph, remediation.as_deref())?;
        return Ok(report(operation, &outcome));
    }

    spec.validate(operation)?;
    ensure_clean_state(&ctx.git_dir)?;
    println!(
        "Starting '{}' on '{}'...",
        operation.accent(),
        ctx.vcs.current_branch()?.accent()
    );
    let outcome = engine.start(&ctx.graph, operation, spec, &flow.overrides)?;
    Ok(report(operation, &outcome))
}

/// Print the outcome and map it to an exit code.
fn report(operation: &str, outcome: &Outcome) -> ExitCode {
    match outcome {
        Outcome::Completed => {
            println!(
                "{} {}",
                check(),
                format!("Success! '{operation}' complete.").success()
            );
            ExitCode::SUCCESS
        }
        Outcome::Paused {
            branch,
            operation: paused_op,
        } => {
            eprintln!();
            eprintln!("{}", format!("Command failed on branch '{branch}'.").error());
            eprintln!();
            eprintln!("Fix the issue and then run:");
            eprintln!("  {}", format!("sd {paused_op} --continue").emphasis());
            eprintln!();
            eprintln!("To abort the run entirely, run:");
            eprintln!("  {}", format!("sd {paused_op} --abort").emphasis());
            ExitCode::from(EXIT_PAUSED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_env_tokens_into_overrides() {
        let flow = parse_alias_tokens(&tokens(&["REMOTE=origin", "DEPTH=2"])).unwrap();
        assert_eq!(flow.overrides["REMOTE"], "origin");
        assert_eq!(flow.overrides["DEPTH"], "2");
        assert!(flow.continue_run.is_none());
        assert!(flow.abort_run.is_none());
    }

    #[test]
    fn test_parse_bare_continue_flag() {
        let flow = parse_alias_tokens(&tokens(&["--continue"])).unwrap();
        assert_eq!(flow.continue_run, Some(None));
    }

    #[test]
    fn test_parse_remediation_containing_equals() {
        let cmd = "git -c rerere.enabled=true rebase --continue";
        let flow = parse_alias_tokens(&tokens(&["--continue", cmd])).unwrap();
        assert_eq!(flow.continue_run, Some(Some(cmd.to_string())));
        assert!(flow.overrides.is_empty());
    }

    #[test]
    fn test_parse_abort_with_remediation() {
        let flow = parse_alias_tokens(&tokens(&["--abort", "git rebase --abort"])).unwrap();
        assert_eq!(flow.abort_run, Some(Some("git rebase --abort".to_string())));
    }

    #[test]
    fn test_env_tokens_rejected_during_resume() {
        let err = parse_alias_tokens(&tokens(&["REMOTE=origin", "--continue"])).unwrap_err();
        assert!(matches!(err, Error::EnvDuringResume));

        let err = parse_alias_tokens(&tokens(&["REMOTE=origin", "--abort"])).unwrap_err();
        assert!(matches!(err, Error::EnvDuringResume));
    }

    #[test]
    fn test_continue_and_abort_are_exclusive() {
        let err = parse_alias_tokens(&tokens(&["--continue", "--abort"])).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let err = parse_alias_tokens(&tokens(&["--verbose"])).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }
}
