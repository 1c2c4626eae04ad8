//! Where a requested module ends up on disk.

use crate::error::{Result, ScaffoldError};
use modlink_protocol::{
    has_known_extension, is_local_module_name, normalize_lexically, with_default_extension,
};
use std::path::{Path, PathBuf};

/// Conventional third-party module directory.
pub const NODE_MODULES: &str = "node_modules";

/// Layout decision for one requested module name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// A single file relative to the requesting document
    LocalFile(PathBuf),
    /// Something under the `node_modules` next to the requesting document
    Dependency(DependencyTarget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyTarget {
    pub node_modules: PathBuf,
    pub name: String,
    /// The name already carries an extension, so only a bare file makes sense
    pub forced_file: bool,
}

impl DependencyTarget {
    /// Path used by the bare-file strategy.
    pub fn file_path(&self) -> PathBuf {
        self.node_modules.join(with_default_extension(&self.name).as_ref())
    }

    pub fn package_dir(&self) -> PathBuf {
        self.node_modules.join(&self.name)
    }

    /// Directories between `node_modules` and the target, e.g. `@scope` for `@scope/pkg`.
    pub fn intermediate_dirs(&self) -> Vec<PathBuf> {
        let segments: Vec<&str> = self.name.split('/').collect();
        let mut current = self.node_modules.clone();
        segments[..segments.len() - 1]
            .iter()
            .map(|segment| {
                current = current.join(segment);
                current.clone()
            })
            .collect()
    }
}

/// Decide the placement of `name` requested from a document in `base_dir`.
pub fn classify(name: &str, base_dir: &Path) -> Result<Placement> {
    if name.is_empty() {
        return Err(ScaffoldError::InvalidName(name.to_string()));
    }
    if is_local_module_name(name) {
        let path = base_dir.join(with_default_extension(name).as_ref());
        return Ok(Placement::LocalFile(normalize_lexically(&path)));
    }

    let valid = name
        .split('/')
        .all(|segment| !matches!(segment, "" | "." | "..") && !segment.contains('\\'));
    if !valid {
        return Err(ScaffoldError::InvalidName(name.to_string()));
    }
    Ok(Placement::Dependency(DependencyTarget {
        node_modules: base_dir.join(NODE_MODULES),
        name: name.to_string(),
        forced_file: has_known_extension(name),
    }))
}
