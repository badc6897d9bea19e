//! readmekit core - block catalog, composition store, and document assembly
//!
//! This crate contains the logic for building a README out of prewritten
//! blocks, independent of terminal UI concerns:
//! - Block catalog (builtin and user-supplied templates)
//! - Composition store with change notifications
//! - Deterministic Markdown assembly and heading outline
//! - Export sinks (file, writer, clipboard)
//! - Configuration management

pub mod assemble;
pub mod catalog;
pub mod composition;
pub mod config;
pub mod error;
pub mod export;
pub mod outline;

// Re-export commonly used types
pub use assemble::assemble;
pub use catalog::{BlockKind, BlockTemplate, Catalog, Category};
pub use composition::{BlockId, BlockInstance, Change, Composition, CompositionEvent, Snapshot};
pub use config::Config;
pub use error::{CompositionError, SinkError};
pub use export::{ExportSink, FileSink, DEFAULT_FILENAME};

#[cfg(feature = "clipboard")]
pub use export::ClipboardSink;
