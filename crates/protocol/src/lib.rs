//! # Modlink Protocol
//!
//! Vocabulary shared by every modlink crate: the capabilities the engine consumes
//! (reference scanning, module resolution, file-system access, editor prompts) and
//! the user-facing scaffold settings.
//!
//! ```text
//! Scanner ──> indexer ──> Resolver
//!                │
//!                └──> DocumentRefresher <── scaffold ──> FileSystem, EditorHost
//! ```

mod capability;
mod document;
mod fs;
mod naming;
pub mod settings;

pub use capability::{
    DocumentRefresher, EditorHost, EntryKind, FileSystem, Resolution, Resolver,
    ScannedReference, Scanner,
};
pub use document::{EditorDocument, JAVASCRIPT_LANGUAGE_ID};
pub use fs::TokioFileSystem;
pub use naming::{
    has_known_extension, is_local_module_name, normalize_lexically, with_default_extension,
    KNOWN_EXTENSIONS,
};
pub use settings::{PackageType, ScaffoldSettings, SettingsError, Strategy, StrategyChoice};

/// Command identifier carried by remediation actions.
pub const CREATE_MODULE_COMMAND: &str = "modlink.createModule";
