use std::ffi::OsStr;
use std::path::Path;
use std::process::{ExitStatus, Output, Stdio};

use tokio::process::Command;
use tracing::trace;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("Failed to run `{summary}`: {source}")]
    Spawn {
        summary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{summary}` failed with {}", render_failure(.status, .stdout, .stderr))]
    Status {
        summary: String,
        status: ExitStatus,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },
}

fn render_failure(status: &ExitStatus, stdout: &[u8], stderr: &[u8]) -> String {
    let mut message = status.to_string();
    let stdout = String::from_utf8_lossy(stdout);
    if !stdout.trim().is_empty() {
        message.push_str("\n\n--- stdout:\n");
        message.push_str(stdout.trim_end());
    }
    let stderr = String::from_utf8_lossy(stderr);
    if !stderr.trim().is_empty() {
        message.push_str("\n\n--- stderr:\n");
        message.push_str(stderr.trim_end());
    }
    message
}

/// A child process invocation with captured output.
///
/// Carries a short human-readable summary used in error messages and trace
/// logging. With `check(true)`, a non-zero exit converts into
/// [`Error::Status`] with both captured streams; otherwise the [`Output`] is
/// returned regardless of status for the caller to interpret.
pub(crate) struct Cmd {
    inner: Command,
    summary: String,
    check: bool,
}

impl Cmd {
    pub(crate) fn new(program: impl AsRef<OsStr>, summary: impl Into<String>) -> Self {
        let mut inner = Command::new(program.as_ref());
        inner.stdin(Stdio::null());
        Self {
            inner,
            summary: summary.into(),
            check: false,
        }
    }

    pub(crate) fn arg(&mut self, arg: impl AsRef<OsStr>) -> &mut Self {
        self.inner.arg(arg.as_ref());
        self
    }

    pub(crate) fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.inner.args(args);
        self
    }

    pub(crate) fn current_dir(&mut self, dir: impl AsRef<Path>) -> &mut Self {
        self.inner.current_dir(dir.as_ref());
        self
    }

    pub(crate) fn env(&mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> &mut Self {
        self.inner.env(key.as_ref(), value.as_ref());
        self
    }

    pub(crate) fn env_remove(&mut self, key: impl AsRef<OsStr>) -> &mut Self {
        self.inner.env_remove(key.as_ref());
        self
    }

    pub(crate) fn check(&mut self, check: bool) -> &mut Self {
        self.check = check;
        self
    }

    /// Spawn the child, capture both streams, and wait for it to exit.
    pub(crate) async fn output(&mut self) -> Result<Output, Error> {
        trace!("Running {}: {:?}", self.summary, self.inner.as_std());

        let output = self.inner.output().await.map_err(|source| Error::Spawn {
            summary: self.summary.clone(),
            source,
        })?;

        if self.check && !output.status.success() {
            return Err(Error::Status {
                summary: self.summary.clone(),
                status: output.status,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        Ok(output)
    }
}
