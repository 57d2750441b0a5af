use std::io::IsTerminal;
use std::path::Path;

use crate::constants::EnvVars;
use crate::process::{self, Cmd};

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("Failed to find git: {0}")]
    GitNotFound(#[from] which::Error),

    #[error(transparent)]
    Command(#[from] process::Error),
}

/// Build a git invocation with a scrubbed environment.
///
/// Repo-targeting variables are removed so the child only ever operates on
/// the repository given via `current_dir`, and terminal prompts are disabled.
pub(crate) fn git_cmd(summary: &str) -> Result<Cmd, Error> {
    let git = which::which("git")?;
    let mut cmd = Cmd::new(git, summary);
    cmd.env(EnvVars::GIT_TERMINAL_PROMPT, "0");
    for var in EnvVars::GIT_REPO_VARS {
        cmd.env_remove(var);
    }
    Ok(cmd)
}

/// Initialize a fresh repository with a throwaway committer identity.
pub(crate) async fn init_repo(path: &Path) -> Result<(), Error> {
    git_cmd("git init")?
        .arg("init")
        .current_dir(path)
        .check(true)
        .output()
        .await?;
    git_cmd("git config user.email")?
        .args(["config", "user.email", "test@example.com"])
        .current_dir(path)
        .check(true)
        .output()
        .await?;
    git_cmd("git config user.name")?
        .args(["config", "user.name", "Test User"])
        .current_dir(path)
        .check(true)
        .output()
        .await?;
    Ok(())
}

/// Stage every file in the repository.
pub(crate) async fn add_all(path: &Path) -> Result<(), Error> {
    git_cmd("git add")?
        .args(["add", "."])
        .current_dir(path)
        .check(true)
        .output()
        .await?;
    Ok(())
}

/// Capture the staged (`--cached`) or unstaged diff of the repository.
pub(crate) async fn diff(path: &Path, staged: bool) -> Result<String, Error> {
    let mut cmd = git_cmd(if staged { "git diff --cached" } else { "git diff" })?;
    cmd.arg("diff");
    if staged {
        cmd.arg("--cached");
    }
    let output = cmd
        .arg(color_arg())
        .current_dir(path)
        .check(false)
        .output()
        .await?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Ask git for the color mode matching our own effective color choice,
/// so diff coloring survives the capture-then-reprint round trip.
fn color_arg() -> &'static str {
    match anstream::AutoStream::choice(&std::io::stdout()) {
        anstream::ColorChoice::Always | anstream::ColorChoice::AlwaysAnsi => "--color=always",
        anstream::ColorChoice::Never => "--color=never",
        anstream::ColorChoice::Auto => {
            if std::io::stdout().is_terminal() {
                "--color=always"
            } else {
                "--color=never"
            }
        }
    }
}
