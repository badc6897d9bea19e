//! Export sinks for the assembled README
//!
//! Exporting only reads the composition: a sink that fails never changes the
//! document.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::assemble::assemble;
use crate::composition::Snapshot;
use crate::error::SinkError;

/// File name used when saving the document
pub const DEFAULT_FILENAME: &str = "README.md";

/// Destination for an assembled document
pub trait ExportSink {
    /// Short human-readable name of the destination
    fn describe(&self) -> String;

    /// Deliver the document
    fn export(&mut self, markdown: &str) -> Result<(), SinkError>;
}

/// Outcome of a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub destination: String,
    pub bytes: usize,
    pub rev: u64,
}

/// Assemble `snapshot` and hand it to `sink`
pub fn export(snapshot: &Snapshot, sink: &mut dyn ExportSink) -> Result<ExportReport, SinkError> {
    let markdown = assemble(snapshot);
    let destination = sink.describe();

    match sink.export(&markdown) {
        Ok(()) => {
            log::debug!("exported {} bytes (rev {}) to {}", markdown.len(), snapshot.rev(), destination);
            Ok(ExportReport {
                destination,
                bytes: markdown.len(),
                rev: snapshot.rev(),
            })
        }
        Err(e) => {
            log::warn!("export to {} failed: {}", destination, e);
            Err(e)
        }
    }
}

/// Writes the document to a file, replacing any previous content
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `README.md` inside `dir`
    pub fn readme(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExportSink for FileSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn export(&mut self, markdown: &str) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(SinkError::Rejected(format!(
                    "directory {} does not exist",
                    parent.display()
                )));
            }
        }

        fs::write(&self.path, markdown).map_err(|source| SinkError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Writes the document to any `io::Write`, e.g. stdout
pub struct WriterSink<W: Write> {
    name: String,
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ExportSink for WriterSink<W> {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn export(&mut self, markdown: &str) -> Result<(), SinkError> {
        let io_err = |source| SinkError::Io {
            path: PathBuf::from(&self.name),
            source,
        };
        self.writer.write_all(markdown.as_bytes()).map_err(io_err)?;
        self.writer.flush().map_err(io_err)
    }
}

/// System clipboard
#[cfg(feature = "clipboard")]
#[derive(Default)]
pub struct ClipboardSink {
    clipboard: Option<arboard::Clipboard>,
}

#[cfg(feature = "clipboard")]
impl ClipboardSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "clipboard")]
impl ExportSink for ClipboardSink {
    fn describe(&self) -> String {
        "clipboard".to_string()
    }

    fn export(&mut self, markdown: &str) -> Result<(), SinkError> {
        // Opened lazily: headless sessions have no clipboard until asked
        if self.clipboard.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| SinkError::Unavailable(e.to_string()))?;
            self.clipboard = Some(clipboard);
        }

        match self.clipboard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(markdown.to_string())
                .map_err(|e| SinkError::Rejected(e.to_string())),
            None => Err(SinkError::Unavailable("clipboard not initialised".to_string())),
        }
    }
}
