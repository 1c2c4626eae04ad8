use crate::settings::Strategy;
use async_trait::async_trait;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// A module-reference literal found by a [`Scanner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedReference {
    /// Byte offset of the first character inside the quotes
    pub start: usize,
    /// Literal text between the quotes
    pub name: String,
}

impl ScannedReference {
    pub fn new(start: usize, name: impl Into<String>) -> Self {
        Self {
            start,
            name: name.into(),
        }
    }
}

/// Extracts module references from a document's full text.
///
/// Implementations must return references ordered by `start` with disjoint spans.
pub trait Scanner: Send + Sync {
    fn find_all(&self, text: &str) -> anyhow::Result<Vec<ScannedReference>>;
}

/// Outcome of resolving one module name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Absolute path of the file the name loads
    Resolved(PathBuf),
    /// Core module provided by the runtime; there is no file to link to
    Builtin,
    /// Nothing on disk answers to the name
    NotFound,
}

/// Resolves module names against the file system.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolve `name` as written inside `from_file`.
    async fn resolve(&self, name: &str, from_file: &Path) -> Resolution;
}

/// What an existence probe found at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "directory"),
            EntryKind::Other => write!(f, "special file"),
        }
    }
}

/// POSIX-like file-system access.
///
/// Errors keep their [`io::ErrorKind`] so callers can tell "not found" apart from
/// everything else.
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn stat(&self, path: &Path) -> io::Result<EntryKind>;

    /// Create a single directory; the parent must exist.
    async fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Write `contents` to a file that must not exist yet.
    async fn write_new(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    async fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory.
    async fn remove_dir(&self, path: &Path) -> io::Result<()>;

    /// Three-way existence probe: `None` when nothing exists at `path`.
    async fn probe(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        match self.stat(path).await {
            Ok(kind) => Ok(Some(kind)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Prompts and views offered by the editor hosting the engine.
#[async_trait]
pub trait EditorHost: Send + Sync {
    /// Ask for a module name; `None` when the user cancels.
    async fn input_module_name(&self) -> Option<String>;

    /// Ask how a dependency package should be created; `None` when the user cancels.
    async fn pick_strategy(&self, module_name: &str) -> Option<Strategy>;

    /// Show a failure to the user.
    fn show_error(&self, message: &str);

    /// Open `path` in a new editor view.
    async fn open_document(&self, path: &Path) -> io::Result<()>;
}

/// Requests a fresh rescan and resolve of a tracked document.
#[async_trait]
pub trait DocumentRefresher: Send + Sync {
    async fn refresh(&self, document: &Path);
}
