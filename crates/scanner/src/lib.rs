//! # Modlink Scanner
//!
//! Finds module references in JavaScript source text.
//!
//! ```text
//! Source Text
//!     │
//!     ├──> Tree-sitter Parsing → AST
//!     │
//!     └──> Reference Extraction
//!          ├─> require('x')
//!          ├─> import ... from 'x' / import 'x'
//!          ├─> export ... from 'x'
//!          └─> import('x')
//! ```
//!
//! ## Example
//!
//! ```rust
//! use modlink_protocol::Scanner;
//! use modlink_scanner::RequireScanner;
//!
//! let refs = RequireScanner::new().find_all("const fs = require('./foo');").unwrap();
//! assert_eq!(refs[0].name, "./foo");
//! assert_eq!(refs[0].start, 20);
//! ```

mod error;
mod language;
mod scanner;

pub use error::{Result, ScanError};
pub use language::Language;
pub use scanner::RequireScanner;
