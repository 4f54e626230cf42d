//! File-backed cache store.
//!
//! Entries live flat in one directory as `<digest>.<ext>`. Presence of the
//! file is validity: there is no TTL, index or eviction. Writes land in a
//! sibling temporary file and are renamed into place, so concurrent writers
//! of the same key resolve as last-writer-wins and readers never observe a
//! partially written entry.

use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::hash::CacheKey;
use crate::Error;

/// Directory name appended to the platform cache directory.
pub const CACHE_DIR_NAME: &str = "link-previews";

/// Handle to the on-disk cache directory.
#[derive(Clone, Debug)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Open a cache rooted at `dir`, creating it (and its parents) if absent.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| Error::DirectoryCreation { path: dir.clone(), source })?;

        Ok(Self { dir })
    }

    /// The cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `key`.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Whether an entry exists at `path`.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    /// Read the entry at `path`.
    ///
    /// A missing file is [`Error::CacheMiss`]; any other read failure is also
    /// reported as a miss since callers treat both the same way.
    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, Error> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    tracing::debug!(path = %path.display(), "cache read failed: {e}");
                }
                Err(Error::CacheMiss(path.to_path_buf()))
            }
        }
    }

    /// Write `bytes` to `path`, replacing any existing entry.
    ///
    /// The bytes go to a uniquely named temporary file next to `path`, which
    /// is then renamed over it. The temporary file is removed on failure.
    pub async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), Error> {
        let target = path.to_path_buf();
        let contents = bytes.to_vec();

        let result = tokio::task::spawn_blocking(move || persist(&target, &contents))
            .await
            .unwrap_or_else(|e| Err(io::Error::other(e)));

        if let Err(source) = result {
            return Err(Error::CacheWrite { path: path.to_path_buf(), source });
        }

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "cache entry written");
        Ok(())
    }
}

fn persist(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new().prefix(".").suffix(".tmp").tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path)?;
    Ok(())
}
