//! # Modlink Resolver
//!
//! Node-style module resolution over the [`FileSystem`](modlink_protocol::FileSystem)
//! capability.
//!
//! ```text
//! name ──┬─ core module ───────────────> Builtin
//!        ├─ ./x ../x /x ──> file, dir ─> Resolved | NotFound
//!        └─ x ──> <ancestor>/node_modules/x (nearest first)
//! ```

mod builtins;
mod node;
mod path;

pub use builtins::is_builtin;
pub use node::NodeResolver;
pub use path::is_relative_specifier;
