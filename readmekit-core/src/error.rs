//! Error types for composition and export

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::composition::BlockId;

/// Errors raised by composition operations.
///
/// These are local correctness violations: the caller referenced a block or a
/// position that does not exist. The composition is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("block {0} is not part of the composition")]
    NotFound(BlockId),

    #[error("index {index} is out of range for a composition of {len} blocks")]
    OutOfRange { index: usize, len: usize },
}

/// Errors raised when an export destination rejects the document.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("export destination unavailable: {0}")]
    Unavailable(String),

    #[error("export destination rejected the write: {0}")]
    Rejected(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type CompositionResult<T> = Result<T, CompositionError>;
