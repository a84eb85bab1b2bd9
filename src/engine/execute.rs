//! Resumable execution - the effectful engine
//!
//! Drives a planned sequence through the shell, one branch at a time. A
//! failing branch does not raise an error: it persists a [`PauseState`] and
//! yields [`Outcome::Paused`], because the follow-up (resolve conflicts,
//! `--continue` or `--abort`) happens in a different process, possibly hours
//! later. The pause file plus a pure transition function replaces any
//! suspended call-stack machinery.

use super::pause::{PauseState, clear_pause, load_pause, save_pause};
use super::plan::plan;
use crate::alias::AliasSpec;
use crate::error::{Error, Result};
use crate::git::Vcs;
use crate::graph::Graph;
use crate::shell;
use std::collections::BTreeMap;
use std::path::Path;

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every branch succeeded; nothing left to do
    Completed,
    /// A branch's command failed; pause state is on disk
    Paused {
        /// The branch whose command failed
        branch: String,
        /// Operation name, for the continue/abort hint
        operation: String,
    },
}

/// The resumable execution engine
///
/// Holds only borrowed collaborators; all durable state lives on disk so a
/// fresh process can pick up where a previous one stopped.
pub struct Engine<'a> {
    vcs: &'a dyn Vcs,
    git_dir: &'a Path,
}

impl<'a> Engine<'a> {
    /// Create an engine over the given collaborator and metadata location.
    pub fn new(vcs: &'a dyn Vcs, git_dir: &'a Path) -> Self {
        Self { vcs, git_dir }
    }

    /// Start a new run of `spec` from the current checkout.
    ///
    /// Fails with [`Error::OperationInProgress`] while pause state exists,
    /// before any side effect. The pre-flight command runs once, before any
    /// branch is touched; its failure aborts the whole operation with no
    /// pause state, since nothing has been mutated yet.
    pub fn start(
        &self,
        graph: &Graph,
        operation: &str,
        spec: &AliasSpec,
        overrides: &BTreeMap<String, String>,
    ) -> Result<Outcome> {
        if let Some(existing) = load_pause(self.git_dir)? {
            return Err(Error::OperationInProgress(existing.operation));
        }

        let start_branch = self.vcs.current_branch()?;
        let env = spec.resolved_env(overrides);
        let steps = plan(graph, &start_branch, spec.mode())?;

        if let Some(pre) = &spec.pre_flight {
            let flight_env = flight_env(&graph.trunk, &start_branch, &env);
            if !shell::run(pre, &flight_env)? {
                return Err(Error::PreFlightFailed);
            }
        }

        let state = PauseState {
            operation: operation.to_string(),
            start_branch,
            run_template: spec.run.clone(),
            remaining: steps,
            continue_cmd: spec.continue_cmd.clone(),
            abort_cmd: spec.abort_cmd.clone(),
            post_flight: spec.post_flight.clone(),
            env,
        };
        self.drive(&graph.trunk, state)
    }

    /// Resume a paused run.
    ///
    /// Runs the remediation command (the override if supplied, else the
    /// stored `continue_cmd`, else nothing), then retries the branch that
    /// failed and continues down the remaining sequence. A failing
    /// remediation leaves the operation paused and the state untouched.
    pub fn resume(&self, graph: &Graph, remediation: Option<&str>) -> Result<Outcome> {
        let state = load_pause(self.git_dir)?.ok_or(Error::NothingToResume)?;

        let remediation_cmd = remediation
            .map(str::to_string)
            .or_else(|| state.continue_cmd.clone());
        if let Some(cmd) = remediation_cmd {
            let mut env = state.env.clone();
            env.insert("SD_CURRENT_BRANCH".to_string(), self.vcs.current_branch()?);
            if !shell::run(&cmd, &env)? {
                eprintln!("Remediation command failed; operation remains paused.");
                let branch = state
                    .remaining
                    .first()
                    .map_or_else(String::new, |s| s.branch.clone());
                return Ok(Outcome::Paused {
                    branch,
                    operation: state.operation,
                });
            }
        }

        self.drive(&graph.trunk, state)
    }

    /// Abort a paused run.
    ///
    /// Runs the remediation (override, else stored `abort_cmd`, else
    /// nothing), returns to the branch the run started from, and deletes the
    /// pause state unconditionally - a failed remediation is reported but
    /// must never leave the operation stuck.
    pub fn abort(&self, remediation: Option<&str>) -> Result<()> {
        let state = load_pause(self.git_dir)?.ok_or(Error::NothingToResume)?;

        let remediation_cmd = remediation
            .map(str::to_string)
            .or_else(|| state.abort_cmd.clone());
        if let Some(cmd) = remediation_cmd {
            let mut env = state.env.clone();
            if let Ok(current) = self.vcs.current_branch() {
                env.insert("SD_CURRENT_BRANCH".to_string(), current);
            }
            match shell::run(&cmd, &env) {
                Ok(true) => {}
                Ok(false) => eprintln!("Warning: abort remediation failed; cleaning up anyway."),
                Err(e) => eprintln!("Warning: abort remediation could not run ({e}); cleaning up anyway."),
            }
        }

        if let Err(e) = self.vcs.checkout(&state.start_branch) {
            eprintln!(
                "Warning: could not return to '{}': {e}",
                state.start_branch
            );
        }

        clear_pause(self.git_dir)
    }

    /// Process the remaining sequence in order, pausing on the first failure.
    ///
    /// The front step is only popped after its command succeeds, so a
    /// persisted state always carries the failing branch at the front for
    /// retry.
    fn drive(&self, trunk: &str, mut state: PauseState) -> Result<Outcome> {
        while let Some(step) = state.remaining.first().cloned() {
            self.vcs.checkout(&step.branch)?;

            let mut env = flight_env(trunk, &state.start_branch, &state.env);
            env.insert("SD_CURRENT_BRANCH".to_string(), step.branch.clone());
            env.insert("SD_PARENT_BRANCH".to_string(), step.parent.clone());

            if !shell::run(&state.run_template, &env)? {
                save_pause(self.git_dir, &state)?;
                tracing::debug!(branch = %step.branch, "run paused");
                return Ok(Outcome::Paused {
                    branch: step.branch,
                    operation: state.operation,
                });
            }
            state.remaining.remove(0);
        }

        if let Some(post) = &state.post_flight {
            let env = flight_env(trunk, &state.start_branch, &state.env);
            if !shell::run(post, &env)? {
                eprintln!("Warning: post-flight command failed; run itself completed.");
            }
        }

        match self.vcs.current_branch() {
            Ok(current) if current == state.start_branch => {}
            _ => {
                if let Err(e) = self.vcs.checkout(&state.start_branch) {
                    eprintln!(
                        "Warning: could not return to '{}': {e}",
                        state.start_branch
                    );
                }
            }
        }

        clear_pause(self.git_dir)?;
        Ok(Outcome::Completed)
    }
}

/// Environment for pre/post-flight commands: run-wide variables only.
///
/// The `SD_*` variables are inserted last so alias env defaults can never
/// mask them.
fn flight_env(
    trunk: &str,
    start_branch: &str,
    extra: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut env = extra.clone();
    env.insert("SD_TRUNK_BRANCH".to_string(), trunk.to_string());
    env.insert("SD_START_BRANCH".to_string(), start_branch.to_string());
    env
}
