use std::path::Path;
use std::path::PathBuf;

/// Resolution state of a [`ModuleReference`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// No resolution pass has completed for this reference yet
    Pending,
    /// Absolute path of the module file
    Resolved(PathBuf),
    /// Known to be missing
    Unresolvable,
}

impl Target {
    pub fn resolved_path(&self) -> Option<&Path> {
        match self {
            Target::Resolved(path) => Some(path),
            _ => None,
        }
    }

    pub const fn is_unresolvable(&self) -> bool {
        matches!(self, Target::Unresolvable)
    }
}

/// One module reference found in a document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReference {
    /// Byte offset of the literal in the document
    pub start: usize,
    /// The reference text as written
    pub name: String,
    pub target: Target,
}

impl ModuleReference {
    pub fn pending(start: usize, name: impl Into<String>) -> Self {
        Self {
            start,
            name: name.into(),
            target: Target::Pending,
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.name.len()
    }

    /// Whether `offset` falls on the literal; the end is inclusive so a cursor
    /// placed right after the last character still hits it.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end()
    }
}
