use crate::error::{Result, ScaffoldError};
use log::{debug, warn};
use modlink_protocol::{EntryKind, FileSystem};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Created {
    File(PathBuf),
    Directory(PathBuf),
}

/// No-clobber creation primitives for one scaffold attempt.
///
/// Every path the writer creates is journaled so a failed attempt can be unwound with
/// [`ScaffoldWriter::rollback`]. Paths that existed beforehand are never touched.
pub struct ScaffoldWriter {
    fs: Arc<dyn FileSystem>,
    journal: Vec<Created>,
}

impl ScaffoldWriter {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            journal: Vec::new(),
        }
    }

    /// Three-way existence probe.
    pub async fn probe(&self, path: &Path) -> Result<Option<EntryKind>> {
        self.fs
            .probe(path)
            .await
            .map_err(|e| ScaffoldError::io(path, e))
    }

    /// Fail with a conflict if anything exists at `path`.
    pub async fn ensure_absent(&self, path: &Path) -> Result<()> {
        match self.probe(path).await? {
            None => Ok(()),
            Some(found) => Err(ScaffoldError::Conflict {
                path: path.to_path_buf(),
                found,
            }),
        }
    }

    /// Succeed unchanged on an existing directory, create a missing one, and fail
    /// when something other than a directory is in the way.
    pub async fn ensure_directory(&mut self, path: &Path) -> Result<PathBuf> {
        match self.probe(path).await? {
            Some(EntryKind::Directory) => Ok(path.to_path_buf()),
            Some(_) => Err(ScaffoldError::NotADirectory(path.to_path_buf())),
            None => {
                self.fs
                    .create_dir(path)
                    .await
                    .map_err(|e| ScaffoldError::io(path, e))?;
                debug!("Created directory {}", path.display());
                self.journal.push(Created::Directory(path.to_path_buf()));
                Ok(path.to_path_buf())
            }
        }
    }

    /// Write a new file; anything already at `path` is a conflict.
    pub async fn create_file(&mut self, path: &Path, contents: &[u8]) -> Result<PathBuf> {
        self.ensure_absent(path).await?;
        match self.fs.write_new(path, contents).await {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                // Appeared between the probe and the write.
                let found = self.probe(path).await?.unwrap_or(EntryKind::File);
                return Err(ScaffoldError::Conflict {
                    path: path.to_path_buf(),
                    found,
                });
            }
            Err(err) => return Err(ScaffoldError::io(path, err)),
        }
        debug!("Created file {}", path.display());
        self.journal.push(Created::File(path.to_path_buf()));
        Ok(path.to_path_buf())
    }

    /// Files created so far, in creation order.
    pub fn created_files(&self) -> Vec<PathBuf> {
        self.journal
            .iter()
            .filter_map(|entry| match entry {
                Created::File(path) => Some(path.clone()),
                Created::Directory(_) => None,
            })
            .collect()
    }

    /// Remove everything this writer created, newest first. Failures are logged and
    /// skipped.
    pub async fn rollback(mut self) {
        while let Some(entry) = self.journal.pop() {
            let (path, result) = match &entry {
                Created::File(path) => (path, self.fs.remove_file(path).await),
                Created::Directory(path) => (path, self.fs.remove_dir(path).await),
            };
            match result {
                Ok(()) => debug!("Rolled back {}", path.display()),
                Err(err) => warn!("Failed to roll back {}: {err}", path.display()),
            }
        }
    }
}
