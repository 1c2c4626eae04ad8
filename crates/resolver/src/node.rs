use crate::builtins::is_builtin;
use crate::path::is_relative_specifier;
use async_trait::async_trait;
use modlink_protocol::{
    normalize_lexically, EntryKind, FileSystem, Resolution, Resolver, TokioFileSystem,
    KNOWN_EXTENSIONS,
};
use std::path::{Path, PathBuf};

const NODE_MODULES: &str = "node_modules";
const PACKAGE_MANIFEST: &str = "package.json";

/// Resolves module names the way the Node.js `require` loader does.
#[derive(Debug, Clone, Default)]
pub struct NodeResolver<F = TokioFileSystem> {
    fs: F,
}

impl<F: FileSystem> NodeResolver<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    pub async fn resolve_path(&self, name: &str, from_file: &Path) -> Resolution {
        if name.is_empty() {
            return Resolution::NotFound;
        }
        if is_builtin(name) {
            return Resolution::Builtin;
        }

        let base_dir = from_file.parent().unwrap_or_else(|| Path::new("/"));
        let found = if is_relative_specifier(name) || Path::new(name).is_absolute() {
            self.load_file_or_directory(&normalize_lexically(&base_dir.join(name)))
                .await
        } else {
            self.load_node_modules(name, base_dir).await
        };

        match found {
            Some(path) => Resolution::Resolved(path),
            None => {
                log::debug!("Unresolved module '{name}' from {}", from_file.display());
                Resolution::NotFound
            }
        }
    }

    async fn load_node_modules(&self, name: &str, start_dir: &Path) -> Option<PathBuf> {
        for dir in start_dir.ancestors() {
            if dir.file_name().is_some_and(|n| n == NODE_MODULES) {
                continue;
            }
            let candidate = dir.join(NODE_MODULES).join(name);
            if let Some(found) = self
                .load_file_or_directory(&normalize_lexically(&candidate))
                .await
            {
                return Some(found);
            }
        }
        None
    }

    async fn load_file_or_directory(&self, path: &Path) -> Option<PathBuf> {
        if let Some(found) = self.load_as_file(path).await {
            return Some(found);
        }
        self.load_as_directory(path).await
    }

    async fn load_as_file(&self, path: &Path) -> Option<PathBuf> {
        if self.is_file(path).await {
            return Some(path.to_path_buf());
        }
        for ext in KNOWN_EXTENSIONS {
            let mut candidate = path.as_os_str().to_owned();
            candidate.push(ext);
            let candidate = PathBuf::from(candidate);
            if self.is_file(&candidate).await {
                return Some(candidate);
            }
        }
        None
    }

    async fn load_as_directory(&self, path: &Path) -> Option<PathBuf> {
        if !matches!(self.fs.probe(path).await, Ok(Some(EntryKind::Directory))) {
            return None;
        }

        if let Some(main) = self.manifest_main(path).await {
            let main_path = normalize_lexically(&path.join(main));
            if let Some(found) = self.load_as_file(&main_path).await {
                return Some(found);
            }
            if let Some(found) = self.load_index(&main_path).await {
                return Some(found);
            }
        }
        self.load_index(path).await
    }

    async fn load_index(&self, dir: &Path) -> Option<PathBuf> {
        for ext in KNOWN_EXTENSIONS {
            let candidate = dir.join(format!("index{ext}"));
            if self.is_file(&candidate).await {
                return Some(candidate);
            }
        }
        None
    }

    async fn manifest_main(&self, dir: &Path) -> Option<String> {
        let manifest = dir.join(PACKAGE_MANIFEST);
        let raw = self.fs.read_to_string(&manifest).await.ok()?;
        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Ignoring malformed {}: {err}", manifest.display());
                return None;
            }
        };
        value
            .get("main")
            .and_then(|main| main.as_str())
            .filter(|main| !main.is_empty())
            .map(str::to_string)
    }

    async fn is_file(&self, path: &Path) -> bool {
        matches!(self.fs.probe(path).await, Ok(Some(EntryKind::File)))
    }
}

#[async_trait]
impl<F: FileSystem> Resolver for NodeResolver<F> {
    async fn resolve(&self, name: &str, from_file: &Path) -> Resolution {
        self.resolve_path(name, from_file).await
    }
}
