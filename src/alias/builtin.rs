//! Built-in aliases
//!
//! Immutable process-wide workflows shipped with the tool. User aliases may
//! only redefine these names with explicit consent (see the registry).

use super::AliasSpec;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Built-in aliases keyed by name.
pub static BUILTINS: LazyLock<BTreeMap<&'static str, AliasSpec>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();

    map.insert(
        "update",
        AliasSpec {
            description: "After amending a commit, rebase all descendant branches.".to_string(),
            run: "git rebase $SD_PARENT_BRANCH".to_string(),
            descendants_only: true,
            continue_cmd: Some("git rebase --continue".to_string()),
            abort_cmd: Some("git rebase --abort".to_string()),
            ..AliasSpec::default()
        },
    );

    map.insert(
        "sync",
        AliasSpec {
            description: "Update trunk and rebase the entire current stack on top.".to_string(),
            run: "git rebase $SD_TRUNK_BRANCH".to_string(),
            pre_flight: Some(
                "git stash push -u -m sd-sync-autostash || true ; \
                 git fetch $REMOTE ; \
                 git checkout $SD_TRUNK_BRANCH ; \
                 git reset --hard $REMOTE/$SD_TRUNK_BRANCH"
                    .to_string(),
            ),
            post_flight: Some("git checkout $SD_START_BRANCH ; git stash pop || true".to_string()),
            start_from_root: true,
            continue_cmd: Some("git rebase --continue".to_string()),
            abort_cmd: Some("git rebase --abort".to_string()),
            env: BTreeMap::from([("REMOTE".to_string(), "upstream".to_string())]),
            ..AliasSpec::default()
        },
    );

    map
});

/// Whether `name` is a built-in alias.
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains_key(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_valid() {
        for (name, spec) in BUILTINS.iter() {
            spec.validate(name).unwrap();
        }
    }

    #[test]
    fn test_update_is_descendants_only() {
        let spec = &BUILTINS["update"];
        assert!(spec.descendants_only);
        assert!(!spec.start_from_root);
        assert_eq!(spec.continue_cmd.as_deref(), Some("git rebase --continue"));
    }

    #[test]
    fn test_sync_starts_from_root_with_remote_default() {
        let spec = &BUILTINS["sync"];
        assert!(spec.start_from_root);
        assert_eq!(spec.env.get("REMOTE").map(String::as_str), Some("upstream"));
        assert!(spec.pre_flight.is_some());
        assert!(spec.post_flight.is_some());
    }
}
