// MIT License
//
// Copyright (c) 2023 Astral Software Inc.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use tracing::trace;

pub(crate) static CWD: LazyLock<PathBuf> =
    LazyLock::new(|| std::env::current_dir().expect("The current working directory must exist"));

pub(crate) trait Simplified {
    /// Strip the `\\?\` prefix from Windows paths.
    fn simplified(&self) -> &Path;

    /// Render the path with the `\\?\` prefix stripped.
    fn simplified_display(&self) -> std::path::Display<'_>;

    /// Render the path relative to the current working directory when possible.
    fn user_display(&self) -> std::path::Display<'_>;
}

impl<T: AsRef<Path>> Simplified for T {
    fn simplified(&self) -> &Path {
        dunce::simplified(self.as_ref())
    }

    fn simplified_display(&self) -> std::path::Display<'_> {
        self.simplified().display()
    }

    fn user_display(&self) -> std::path::Display<'_> {
        let path = self.simplified();
        path.strip_prefix(CWD.as_path()).unwrap_or(path).display()
    }
}

/// Recursively copy a directory and its contents.
pub(crate) fn copy_dir_all(
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
) -> std::io::Result<()> {
    let source = source.as_ref();
    let target = target.as_ref();
    trace!("Copying `{}` to `{}`", source.display(), target.display());

    fs_err::create_dir_all(target)?;
    for entry in fs_err::read_dir(source)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            copy_dir_all(entry.path(), target.join(entry.file_name()))?;
        } else {
            fs_err::copy(entry.path(), target.join(entry.file_name()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_dir_all_copies_nested_trees() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("source");
        fs_err::create_dir_all(source.join("nested"))?;
        fs_err::write(source.join("a.txt"), "a")?;
        fs_err::write(source.join("nested/b.txt"), "b")?;

        let target = dir.path().join("target");
        copy_dir_all(&source, &target)?;

        assert_eq!(fs_err::read_to_string(target.join("a.txt"))?, "a");
        assert_eq!(fs_err::read_to_string(target.join("nested/b.txt"))?, "b");
        Ok(())
    }
}
