use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::cleanup;
use crate::constants::{CONFIG_FILE, EXTRA_HOOKS_DIR, HOOKS_DIR, WORKSPACE_DIR};
use crate::fs::copy_dir_all;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("Failed to create workspace directory")]
    Create(#[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The ephemeral directory where the test repository and fixtures are
/// assembled.
///
/// Exclusively owned by the run and never reused: the backing temp directory
/// is removed on drop, and additionally registered for removal on Ctrl-C.
pub(crate) struct Workspace {
    root: PathBuf,
    _temp_dir: TempDir,
}

impl Workspace {
    pub(crate) async fn create() -> Result<Self, Error> {
        let temp_dir = tempfile::Builder::new()
            .prefix("hookdrill-")
            .tempdir()
            .map_err(Error::Create)?;
        let root = temp_dir.path().join(WORKSPACE_DIR);
        fs_err::tokio::create_dir(&root).await?;

        cleanup::add_cleanup_path(temp_dir.path().to_path_buf());
        debug!("Created workspace at `{}`", root.display());

        Ok(Self {
            root,
            _temp_dir: temp_dir,
        })
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    /// Copy the hook configuration and hook definitions from the project
    /// into the workspace. The secondary hook-source directory is copied
    /// only when present.
    pub(crate) async fn copy_project_files(&self, project_root: &Path) -> Result<(), Error> {
        fs_err::tokio::copy(
            project_root.join(CONFIG_FILE),
            self.root.join(CONFIG_FILE),
        )
        .await?;
        copy_dir_all(project_root.join(HOOKS_DIR), self.root.join(HOOKS_DIR))?;

        let extra = project_root.join(EXTRA_HOOKS_DIR);
        if extra.is_dir() {
            copy_dir_all(extra, self.root.join(EXTRA_HOOKS_DIR))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn workspace_is_removed_on_drop() -> anyhow::Result<()> {
        let workspace = Workspace::create().await?;
        let root = workspace.root().to_path_buf();
        assert!(root.is_dir());

        drop(workspace);
        assert!(!root.exists());
        Ok(())
    }

    #[tokio::test]
    async fn copies_config_hooks_and_optional_extras() -> anyhow::Result<()> {
        let project = tempfile::tempdir()?;
        fs_err::write(project.path().join(CONFIG_FILE), "repos: []\n")?;
        fs_err::create_dir(project.path().join(HOOKS_DIR))?;
        fs_err::write(project.path().join(HOOKS_DIR).join("lint.sh"), "#!/bin/sh\n")?;

        let workspace = Workspace::create().await?;
        workspace.copy_project_files(project.path()).await?;

        assert!(workspace.root().join(CONFIG_FILE).is_file());
        assert!(workspace.root().join(HOOKS_DIR).join("lint.sh").is_file());
        // No `hooks/` directory in the project, none in the workspace.
        assert!(!workspace.root().join(EXTRA_HOOKS_DIR).exists());

        fs_err::create_dir(project.path().join(EXTRA_HOOKS_DIR))?;
        fs_err::write(project.path().join(EXTRA_HOOKS_DIR).join("x"), "x")?;
        workspace.copy_project_files(project.path()).await?;
        assert!(workspace.root().join(EXTRA_HOOKS_DIR).join("x").is_file());
        Ok(())
    }
}
