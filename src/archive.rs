//! Output archive assembly
//!
//! Stages (name, bytes) pairs for one batch and writes them out as a
//! single in-memory ZIP. Entries are staged rather than streamed so a
//! duplicate derived name replaces the earlier bytes and the final
//! archive holds a single surviving entry per name (last-processed
//! wins).

use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Error type for archive assembly
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("ZIP write error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// In-memory archive under construction for one batch
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of staged entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stage one entry with the original bytes unmodified.
    ///
    /// A duplicate name replaces the earlier staged bytes in place.
    pub fn add_entry(&mut self, name: String, bytes: Vec<u8>) {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            tracing::warn!(
                entry = %name,
                "Duplicate archive entry name, replacing earlier file"
            );
            *existing = bytes;
        } else {
            self.entries.push((name, bytes));
        }
    }

    /// Write all staged entries into a ZIP and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>, ArchiveError> {
        let mut buffer = Vec::new();
        {
            let cursor = Cursor::new(&mut buffer);
            let mut zip = ZipWriter::new(cursor);
            let options = SimpleFileOptions::default();

            for (name, bytes) in self.entries {
                zip.start_file(name, options)?;
                zip.write_all(&bytes)?;
            }

            zip.finish()?;
        }
        Ok(buffer)
    }
}
