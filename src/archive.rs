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

use std::path::{Component, Path, PathBuf};

use tokio_util::compat::{FuturesAsyncReadCompatExt, TokioAsyncReadCompatExt};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] async_zip::error::ZipError),

    #[error("Unsupported archive format: `{0}`")]
    UnsupportedFormat(String),

    #[error("Archive entry escapes the extraction directory: `{0}`")]
    UnsafeEntryPath(String),
}

/// The supported fixture archive formats, detected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArchiveExtension {
    Zip,
    TarGz,
    TarXz,
}

impl ArchiveExtension {
    pub(crate) const ALL: [Self; 3] = [Self::Zip, Self::TarGz, Self::TarXz];

    pub(crate) fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return Err(Error::UnsupportedFormat(path.display().to_string()));
        };
        if name.ends_with(".zip") {
            Ok(Self::Zip)
        } else if name.ends_with(".tar.gz") {
            Ok(Self::TarGz)
        } else if name.ends_with(".tar.xz") {
            Ok(Self::TarXz)
        } else {
            Err(Error::UnsupportedFormat(path.display().to_string()))
        }
    }

    pub(crate) fn suffix(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
            Self::TarXz => "tar.xz",
        }
    }
}

/// Locate the fixture archive in `dir`, probing `{stem}.zip`, `{stem}.tar.gz`
/// and `{stem}.tar.xz` in order.
pub(crate) fn find_fixture(dir: &Path, stem: &str) -> Option<PathBuf> {
    ArchiveExtension::ALL
        .into_iter()
        .map(|ext| dir.join(format!("{stem}.{}", ext.suffix())))
        .find(|candidate| candidate.is_file())
}

/// Unpack the archive at `path` into `target`.
pub(crate) async fn extract(path: &Path, target: &Path) -> Result<(), Error> {
    debug!("Extracting `{}` to `{}`", path.display(), target.display());

    let ext = ArchiveExtension::from_path(path)?;
    let file = fs_err::tokio::File::open(path).await?;
    match ext {
        ArchiveExtension::Zip => unzip(file, target).await,
        ArchiveExtension::TarGz => {
            let reader = tokio::io::BufReader::new(file);
            let decompressed = async_compression::tokio::bufread::GzipDecoder::new(reader);
            untar(decompressed, target).await
        }
        ArchiveExtension::TarXz => {
            let reader = tokio::io::BufReader::new(file);
            let decompressed = async_compression::tokio::bufread::XzDecoder::new(reader);
            untar(decompressed, target).await
        }
    }
}

/// Unzip an archive into the target directory.
async fn unzip<R: tokio::io::AsyncRead + Unpin>(reader: R, target: &Path) -> Result<(), Error> {
    let reader = futures::io::BufReader::with_capacity(128 * 1024, reader.compat());
    let mut zip = async_zip::base::read::stream::ZipFileReader::new(reader);

    while let Some(mut entry) = zip.next_with_entry().await? {
        let path = entry.reader().entry().filename().as_str()?.to_string();
        let is_dir = entry.reader().entry().dir()?;
        #[cfg(unix)]
        let mode = entry.reader().entry().unix_permissions();

        let Some(relpath) = enclosed_name(&path) else {
            return Err(Error::UnsafeEntryPath(path));
        };
        let absolute = target.join(relpath);

        if is_dir {
            fs_err::tokio::create_dir_all(&absolute).await?;
        } else {
            if let Some(parent) = absolute.parent() {
                fs_err::tokio::create_dir_all(parent).await?;
            }
            let file = fs_err::tokio::File::create(&absolute).await?;
            let mut writer = tokio::io::BufWriter::new(file);
            let mut entry_reader = entry.reader_mut().compat();
            tokio::io::copy(&mut entry_reader, &mut writer).await?;

            // Preserve the executable bit.
            #[cfg(unix)]
            {
                use std::fs::Permissions;
                use std::os::unix::fs::PermissionsExt;

                if let Some(mode) = mode {
                    if mode & 0o111 != 0 {
                        fs_err::tokio::set_permissions(
                            &absolute,
                            Permissions::from_mode(u32::from(mode)),
                        )
                        .await?;
                    }
                }
            }
        }

        zip = entry.skip().await?.1;
    }

    Ok(())
}

/// Unpack a decompressed tarball into the target directory.
async fn untar<R: tokio::io::AsyncRead + Unpin>(reader: R, target: &Path) -> Result<(), Error> {
    let mut archive = tokio_tar::ArchiveBuilder::new(reader)
        .set_preserve_mtime(false)
        .build();
    archive.unpack(target).await?;
    Ok(())
}

/// Flatten one known nesting level by moving the children of
/// `target/{nested}` up to `target` and removing the then-empty directory.
///
/// A no-op when the nesting directory is absent.
pub(crate) async fn flatten(target: &Path, nested: &str) -> Result<(), Error> {
    let nested_dir = target.join(nested);
    if !nested_dir.is_dir() {
        return Ok(());
    }

    let mut entries = fs_err::tokio::read_dir(&nested_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        fs_err::tokio::rename(entry.path(), target.join(entry.file_name())).await?;
    }
    fs_err::tokio::remove_dir(&nested_dir).await?;
    Ok(())
}

/// Sanitize an archive entry path, mirroring `ZipFile::enclosed_name`.
///
/// Rejects absolute paths and any `..` component that would traverse out of
/// the extraction directory.
fn enclosed_name(file_name: &str) -> Option<PathBuf> {
    if file_name.contains('\0') {
        return None;
    }
    let path = PathBuf::from(file_name);
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return None,
            Component::ParentDir => depth = depth.checked_sub(1)?,
            Component::Normal(_) => depth += 1,
            Component::CurDir => (),
        }
    }
    Some(path)
}
