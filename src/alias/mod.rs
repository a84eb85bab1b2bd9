//! Alias Registry - named, reusable command-template workflows
//!
//! An alias bundles the primitives of `run`: the command template, optional
//! pre/post-flight steps, the traversal mode, remediation commands for
//! continue/abort, and default environment variables. Resolution layers user
//! definitions over built-ins, and invocation-time `KEY=VALUE` overrides over
//! the spec's declared defaults - an immutable value merge, never dynamic
//! lookup.

mod builtin;
mod storage;

pub use builtin::{BUILTINS, is_builtin};
pub use storage::{alias_path, load_user_aliases, save_user_aliases};

use crate::engine::TraversalMode;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A named workflow: command templates plus traversal mode and env defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasSpec {
    /// Human-readable summary for listings
    #[serde(default)]
    pub description: String,
    /// The per-branch command template (required, non-empty)
    #[serde(default)]
    pub run: String,
    /// Command run once before any branch is touched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_flight: Option<String>,
    /// Command run once after every branch succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_flight: Option<String>,
    /// Skip the starting branch, visiting only its descendants
    #[serde(default)]
    pub descendants_only: bool,
    /// Start from the root of the current stack instead of the checkout
    #[serde(default)]
    pub start_from_root: bool,
    /// Default remediation for `--continue`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_cmd: Option<String>,
    /// Default remediation for `--abort`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_cmd: Option<String>,
    /// Default environment variables, overridable per invocation
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl AliasSpec {
    /// Check structural validity: a spec must declare a non-empty `run`.
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.run.trim().is_empty() {
            return Err(Error::AliasInvalid {
                name: name.to_string(),
                reason: "missing a 'run' command".to_string(),
            });
        }
        Ok(())
    }

    /// The traversal mode this spec requests
    pub const fn mode(&self) -> TraversalMode {
        TraversalMode {
            descendants_only: self.descendants_only,
            start_from_root: self.start_from_root,
        }
    }

    /// Declared env defaults with invocation overrides merged on top
    pub fn resolved_env(&self, overrides: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut env = self.env.clone();
        env.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        env
    }
}

/// Where a resolved alias came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasSource {
    /// Shipped with the tool
    Builtin,
    /// Defined in the project alias file
    User,
}

/// Merged view of built-in and user-defined aliases
#[derive(Debug, Clone, Default)]
pub struct Registry {
    user: BTreeMap<String, AliasSpec>,
}

impl Registry {
    /// Load user aliases from the project alias file under `repo_root`.
    pub fn load(repo_root: &Path) -> Result<Self> {
        Ok(Self {
            user: load_user_aliases(repo_root)?,
        })
    }

    /// Build a registry from an in-memory user alias map.
    pub fn from_user_aliases(user: BTreeMap<String, AliasSpec>) -> Self {
        Self { user }
    }

    /// Resolve `name`, user definitions first, then built-ins.
    pub fn resolve(&self, name: &str) -> Result<(&AliasSpec, AliasSource)> {
        if let Some(spec) = self.user.get(name) {
            spec.validate(name)?;
            return Ok((spec, AliasSource::User));
        }
        if let Some(spec) = BUILTINS.get(name) {
            return Ok((spec, AliasSource::Builtin));
        }
        Err(Error::AliasNotFound(name.to_string()))
    }

    /// User-defined aliases, for listings.
    pub const fn user_aliases(&self) -> &BTreeMap<String, AliasSpec> {
        &self.user
    }

    /// Define or replace a user alias.
    ///
    /// Redefining a built-in name is refused unless `force` is set; the CLI
    /// turns that refusal into an explicit confirmation prompt.
    pub fn set(&mut self, name: &str, spec: AliasSpec, force: bool) -> Result<()> {
        spec.validate(name)?;
        if is_builtin(name) && !force {
            return Err(Error::AliasShadowsBuiltin(name.to_string()));
        }
        self.user.insert(name.to_string(), spec);
        Ok(())
    }

    /// Remove a user alias. Built-ins cannot be removed.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        self.user
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::AliasNotFound(name.to_string()))
    }

    /// Persist the user aliases to the project alias file.
    pub fn save(&self, repo_root: &Path) -> Result<()> {
        save_user_aliases(repo_root, &self.user)
    }
}

/// Parse invocation `KEY=VALUE` tokens into an override map.
///
/// Keys must be non-empty and alphanumeric (underscores and hyphens allowed);
/// values must be non-empty.
pub fn parse_env_overrides(tokens: &[String]) -> Result<BTreeMap<String, String>> {
    let mut overrides = BTreeMap::new();
    for token in tokens {
        let Some((key, value)) = token.split_once('=') else {
            return Err(Error::InvalidEnvVar(
                token.clone(),
                "expected KEY=VALUE".to_string(),
            ));
        };
        if key.trim().is_empty() {
            return Err(Error::InvalidEnvVar(token.clone(), "key cannot be empty".to_string()));
        }
        if value.trim().is_empty() {
            return Err(Error::InvalidEnvVar(token.clone(), "value cannot be empty".to_string()));
        }
        if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(Error::InvalidEnvVar(
                token.clone(),
                "key must be alphanumeric with underscores or hyphens".to_string(),
            ));
        }
        overrides.insert(key.to_string(), value.to_string());
    }
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_spec(run: &str) -> AliasSpec {
        AliasSpec {
            run: run.to_string(),
            ..AliasSpec::default()
        }
    }

    #[test]
    fn test_resolve_prefers_user_over_builtin() {
        let mut registry = Registry::default();
        registry.set("update", user_spec("echo custom"), true).unwrap();

        let (spec, source) = registry.resolve("update").unwrap();
        assert_eq!(source, AliasSource::User);
        assert_eq!(spec.run, "echo custom");
    }

    #[test]
    fn test_resolve_falls_back_to_builtin() {
        let registry = Registry::default();
        let (spec, source) = registry.resolve("sync").unwrap();
        assert_eq!(source, AliasSource::Builtin);
        assert!(spec.start_from_root);
    }

    #[test]
    fn test_resolve_unknown_name() {
        let registry = Registry::default();
        assert!(matches!(
            registry.resolve("nope"),
            Err(Error::AliasNotFound(n)) if n == "nope"
        ));
    }

    #[test]
    fn test_set_builtin_name_requires_force() {
        let mut registry = Registry::default();
        let err = registry.set("sync", user_spec("echo hi"), false).unwrap_err();
        assert!(matches!(err, Error::AliasShadowsBuiltin(n) if n == "sync"));
        assert!(registry.user_aliases().is_empty());

        registry.set("sync", user_spec("echo hi"), true).unwrap();
        assert_eq!(registry.resolve("sync").unwrap().1, AliasSource::User);
    }

    #[test]
    fn test_set_rejects_empty_run() {
        let mut registry = Registry::default();
        let err = registry.set("blank", user_spec("  "), false).unwrap_err();
        assert!(matches!(err, Error::AliasInvalid { .. }));
    }

    #[test]
    fn test_remove_builtin_not_allowed() {
        let mut registry = Registry::default();
        assert!(matches!(registry.remove("update"), Err(Error::AliasNotFound(_))));
    }

    #[test]
    fn test_resolved_env_layering() {
        let mut spec = user_spec("echo");
        spec.env.insert("REMOTE".to_string(), "upstream".to_string());
        spec.env.insert("KEEP".to_string(), "yes".to_string());

        let overrides = BTreeMap::from([("REMOTE".to_string(), "origin".to_string())]);
        let env = spec.resolved_env(&overrides);
        assert_eq!(env["REMOTE"], "origin");
        assert_eq!(env["KEEP"], "yes");
    }

    #[test]
    fn test_parse_env_overrides() {
        let tokens = vec!["REMOTE=origin".to_string(), "MY_VAR-2=x".to_string()];
        let parsed = parse_env_overrides(&tokens).unwrap();
        assert_eq!(parsed["REMOTE"], "origin");

        assert!(parse_env_overrides(&["noequals".to_string()]).is_err());
        assert!(parse_env_overrides(&["=value".to_string()]).is_err());
        assert!(parse_env_overrides(&["KEY=".to_string()]).is_err());
        assert!(parse_env_overrides(&["bad key=v".to_string()]).is_err());
    }
}
