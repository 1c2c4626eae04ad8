use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Extensions a module name may already carry.
pub const KNOWN_EXTENSIONS: [&str; 3] = [".js", ".json", ".node"];

/// Names starting with `./`, `../` or an absolute path denote a local file rather
/// than a dependency package.
pub fn is_local_module_name(name: &str) -> bool {
    name.starts_with("./") || name.starts_with("../") || Path::new(name).is_absolute()
}

pub fn has_known_extension(name: &str) -> bool {
    KNOWN_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Append `.js` unless the name already ends in a known extension.
pub fn with_default_extension(name: &str) -> Cow<'_, str> {
    if has_known_extension(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{name}.js"))
    }
}

/// Fold `.` and `..` components without touching the file system.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}
