//! Scaffolding of missing modules.
//!
//! [`policy`] decides where a requested module goes, [`ScaffoldWriter`] creates files
//! and directories without ever overwriting, and [`ScaffoldOrchestrator`] runs a whole
//! creation attempt against the editor host.

pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod policy;
pub mod writer;

pub use error::{Result, ScaffoldError};
pub use manifest::{MainEntry, Manifest, DEFAULT_MAIN, MANIFEST_FILE_NAME};
pub use orchestrator::{CreationOutcome, ScaffoldOrchestrator};
pub use policy::{classify, DependencyTarget, Placement, NODE_MODULES};
pub use writer::ScaffoldWriter;
