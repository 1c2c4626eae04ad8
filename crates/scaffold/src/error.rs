use modlink_protocol::EntryKind;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScaffoldError>;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("{path} already exists ({found})")]
    Conflict { path: PathBuf, found: EntryKind },

    #[error("Not a directory at: {0}")]
    NotADirectory(PathBuf),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid module name: {0:?}")]
    InvalidName(String),

    #[error("Invalid package manifest: {0}")]
    InvalidManifest(String),
}

impl ScaffoldError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Something already exists where the attempt needed to create or traverse.
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::NotADirectory(_))
    }
}
