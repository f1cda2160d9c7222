// src/io.rs
//
// File I/O: zero-copy input sources and atomic output writes.

use crate::error::{GraymillError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Input bytes - either owned in memory or memory-mapped from a file.
#[derive(Clone, Debug)]
pub enum Source {
    /// In-memory data
    Memory(Arc<Vec<u8>>),
    /// Memory-mapped file (zero-copy access)
    Mapped(Arc<Mmap>),
}

impl Source {
    pub fn from_vec(data: Vec<u8>) -> Self {
        Source::Memory(Arc::new(data))
    }

    /// Memory-map a file for zero-copy reads.
    pub fn open(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GraymillError::file_not_found(display.clone())
            } else {
                GraymillError::file_read_failed(display.clone(), e)
            }
        })?;

        // Safety: we assume the file won't be modified externally while it is
        // mapped. The mapping is read-only; graymill never writes through it.
        let mmap =
            unsafe { Mmap::map(&file).map_err(|e| GraymillError::mmap_failed(display, e))? };
        Ok(Source::Mapped(Arc::new(mmap)))
    }

    /// Get the bytes directly - zero-copy for both variants.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Source::Memory(data) => data.as_slice(),
            Source::Mapped(mmap) => mmap.as_ref(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Write `data` to `path` atomically: temp file in the destination directory,
/// flushed to disk, then renamed over the target. A failed run never leaves a
/// half-written output file behind. Returns the number of bytes written.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<u64> {
    // Temp file must live in the target directory; cross-filesystem rename fails.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(dir)
        .map_err(|e| GraymillError::file_write_failed(dir.display().to_string(), e))?;

    let temp_path = temp_file.path().to_path_buf();
    temp_file
        .write_all(data)
        .map_err(|e| GraymillError::file_write_failed(temp_path.display().to_string(), e))?;

    // Ensure data is flushed to disk before the rename
    temp_file
        .as_file_mut()
        .sync_all()
        .map_err(|e| GraymillError::file_write_failed(temp_path.display().to_string(), e))?;

    // Atomic rename: tempfile cleans up automatically if this fails
    temp_file
        .persist(path)
        .map_err(|e| GraymillError::file_write_failed(path.display().to_string(), e.error))?;

    Ok(data.len() as u64)
}
