use std::ffi::OsString;

/// The pre-commit configuration file expected at the project root.
pub(crate) const CONFIG_FILE: &str = ".pre-commit-config.yaml";

/// The hook definitions directory expected at the project root.
pub(crate) const HOOKS_DIR: &str = ".pre-commit";

/// An optional secondary hook-source directory, copied only when present.
pub(crate) const EXTRA_HOOKS_DIR: &str = "hooks";

/// The directory holding the fixture archive, relative to the project root.
pub(crate) const FIXTURE_DIR: &str = "test";

/// The fixture archive file stem, probed with each supported archive suffix.
pub(crate) const FIXTURE_STEM: &str = "example_files";

/// The nesting directory inside the fixture archive that is flattened away
/// after extraction.
pub(crate) const FIXTURE_NESTING_DIR: &str = "test_files";

/// The name of the throwaway repository directory inside the temp directory.
pub(crate) const WORKSPACE_DIR: &str = "test_workspace";

pub(crate) struct EnvVars;

impl EnvVars {
    /// Overrides hook-runner discovery with an explicit invocation,
    /// split into words with shell quoting rules.
    pub(crate) const HOOKDRILL_PRE_COMMIT: &'static str = "HOOKDRILL_PRE_COMMIT";

    pub(crate) const GIT_TERMINAL_PROMPT: &'static str = "GIT_TERMINAL_PROMPT";

    /// Repo-targeting variables scrubbed from every git invocation so the
    /// child only ever operates on the workspace repository.
    pub(crate) const GIT_REPO_VARS: &'static [&'static str] = &[
        "GIT_DIR",
        "GIT_WORK_TREE",
        "GIT_INDEX_FILE",
        "GIT_OBJECT_DIRECTORY",
    ];

    pub(crate) fn var_os(name: &str) -> Option<OsString> {
        std::env::var_os(name)
    }
}
