//! # Modlink Indexer
//!
//! Live index of the module references in open documents.
//!
//! ## Pipeline
//!
//! ```text
//! Editor events
//!     │
//!     ├──> Lifecycle Coordinator (debounced)
//!     │      └─> rescan: Scanner → references (new generation)
//!     │
//!     ├──> resolve_all: Resolver, all references concurrently
//!     │      └─> commit only if the generation is still current
//!     │
//!     └──> Consumers: links, go-to-definition lookup, remediation actions
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use modlink_indexer::ReferenceIndex;
//! # async fn run(
//! #     scanner: std::sync::Arc<dyn modlink_protocol::Scanner>,
//! #     resolver: std::sync::Arc<dyn modlink_protocol::Resolver>,
//! # ) -> modlink_indexer::Result<()> {
//! let index = ReferenceIndex::with_store(scanner, resolver);
//! let doc = std::path::Path::new("/proj/a.js");
//! index.refresh(doc, "require('./foo')").await?;
//! println!("{:?}", index.lookup(doc, 10));
//! # Ok(())
//! # }
//! ```

mod coordinator;
mod document;
mod error;
mod events;
mod index;
mod line_index;
mod links;
mod reference;
mod store;

pub use coordinator::{CoordinatorConfig, EditorEvent, LifecycleCoordinator};
pub use document::{DocumentIndex, RemediationState};
pub use error::{IndexerError, Result};
pub use events::IndexEvent;
pub use index::{DocumentSnapshot, ReferenceIndex, ResolveOutcome, SharedStore};
pub use line_index::{LineCol, LineIndex};
pub use links::{remediation_title, DocumentLink, RemediationAction, LINK_TOOLTIP};
pub use reference::{ModuleReference, Target};
pub use store::DocumentStore;
