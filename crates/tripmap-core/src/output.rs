//! Filesystem artifact sink

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{Result, TripmapError};
use crate::ports::ArtifactSink;

/// Writes artifacts to disk atomically
///
/// The document goes to a temporary file in the destination directory, which is then renamed
/// over the target. A failed write leaves the target untouched and removes the temporary file.
/// Missing parent directories are created.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsArtifactSink;

impl ArtifactSink for FsArtifactSink {
    fn write(&self, target: &Path, document: &str) -> Result<()> {
        write_atomic(target, document.as_bytes()).map_err(|e| TripmapError::ArtifactWrite {
            path: target.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

fn write_atomic(target: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(target).map_err(|e| e.error)?;
    Ok(())
}
