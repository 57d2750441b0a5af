use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

static CLEANUP_PATHS: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

/// Register a directory to remove when the process is interrupted.
pub(crate) fn add_cleanup_path(path: PathBuf) {
    let mut paths = match CLEANUP_PATHS.lock() {
        Ok(paths) => paths,
        Err(err) => err.into_inner(),
    };
    paths.push(path);
}

/// Remove all registered directories. Called from the Ctrl-C handler, where
/// scoped drops never get a chance to run.
pub(crate) fn cleanup() {
    let mut paths = match CLEANUP_PATHS.lock() {
        Ok(paths) => paths,
        Err(err) => err.into_inner(),
    };
    remove_paths(paths.drain(..));
}

fn remove_paths(paths: impl IntoIterator<Item = PathBuf>) {
    for path in paths {
        if !path.exists() {
            continue;
        }
        debug!("Removing `{}`", path.display());
        if let Err(err) = fs_err::remove_dir_all(&path) {
            debug!("Failed to remove `{}`: {}", path.display(), err);
        }
    }
}
