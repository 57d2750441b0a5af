use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::Output;

use tracing::debug;

use crate::constants::EnvVars;
use crate::process::{self, Cmd};

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("Invalid `HOOKDRILL_PRE_COMMIT` value `{value}`")]
    InvalidOverride { value: String },

    #[error("Neither `pre-commit` nor `uvx` is available on PATH. Install pre-commit or uv.")]
    LauncherNotFound,

    #[error(transparent)]
    Command(#[from] process::Error),
}

/// How to invoke the hook runner on the current system.
///
/// Resolved once and reused for the install and run steps.
#[derive(Debug, Clone)]
pub(crate) enum Launcher {
    /// A `pre-commit` executable found on `PATH`.
    PreCommit(PathBuf),
    /// `pre-commit` run through the `uvx` package runner.
    Uvx(PathBuf),
    /// An explicit invocation from the environment, split into shell words.
    Override(Vec<String>),
}

impl Display for Launcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PreCommit(_) => write!(f, "pre-commit"),
            Self::Uvx(_) => write!(f, "uvx pre-commit"),
            Self::Override(words) => write!(f, "{}", words.join(" ")),
        }
    }
}

impl Launcher {
    /// Resolve the launcher: the environment override wins, then a
    /// `pre-commit` on `PATH`, then `uvx` as a fallback.
    pub(crate) fn find() -> Result<Self, Error> {
        if let Some(value) = EnvVars::var_os(EnvVars::HOOKDRILL_PRE_COMMIT) {
            return Self::from_override(&value.to_string_lossy());
        }
        if let Ok(path) = which::which("pre-commit") {
            debug!("Found pre-commit at `{}`", path.display());
            return Ok(Self::PreCommit(path));
        }
        if let Ok(path) = which::which("uvx") {
            debug!("Found uvx at `{}`", path.display());
            return Ok(Self::Uvx(path));
        }
        Err(Error::LauncherNotFound)
    }

    fn from_override(value: &str) -> Result<Self, Error> {
        let words = shlex::split(value)
            .filter(|words| !words.is_empty())
            .ok_or_else(|| Error::InvalidOverride {
                value: value.to_string(),
            })?;
        Ok(Self::Override(words))
    }

    fn cmd(&self, summary: &str) -> Cmd {
        match self {
            Self::PreCommit(path) => Cmd::new(path, summary),
            Self::Uvx(path) => {
                let mut cmd = Cmd::new(path, summary);
                cmd.arg("pre-commit");
                cmd
            }
            Self::Override(words) => {
                let mut cmd = Cmd::new(&words[0], summary);
                cmd.args(&words[1..]);
                cmd
            }
        }
    }

    /// Install the configured hooks into the repository. Strict: a non-zero
    /// exit aborts the run.
    pub(crate) async fn install(&self, workdir: &Path) -> Result<(), Error> {
        self.cmd("pre-commit install")
            .arg("install")
            .current_dir(workdir)
            .check(true)
            .output()
            .await?;
        Ok(())
    }

    /// Run the hooks across all staged files. Permissive: hooks may
    /// legitimately rewrite files and exit non-zero, so the output is
    /// returned regardless of status.
    pub(crate) async fn run_all_files(&self, workdir: &Path) -> Result<Output, Error> {
        let output = self
            .cmd("pre-commit run --all-files")
            .args(["run", "--all-files"])
            .current_dir(workdir)
            .check(false)
            .output()
            .await?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_splits_shell_words() {
        let launcher = Launcher::from_override("uvx --from pre-commit 'pre-commit'").unwrap();
        let Launcher::Override(words) = &launcher else {
            panic!("expected an override launcher");
        };
        assert_eq!(words, &["uvx", "--from", "pre-commit", "pre-commit"]);
        assert_eq!(launcher.to_string(), "uvx --from pre-commit pre-commit");
    }

    #[test]
    fn empty_override_is_rejected() {
        assert!(matches!(
            Launcher::from_override(""),
            Err(Error::InvalidOverride { .. })
        ));
        assert!(matches!(
            Launcher::from_override("   "),
            Err(Error::InvalidOverride { .. })
        ));
    }

    #[test]
    fn unbalanced_quotes_are_rejected() {
        assert!(matches!(
            Launcher::from_override("pre-commit '"),
            Err(Error::InvalidOverride { .. })
        ));
    }
}
