//! File writer trait
//!
//! Defines the interface for persisting recovered file contents.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when writing recovered files
#[derive(Error, Debug)]
pub enum FileWriterError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("File already exists: {0}")]
    FileExists(String),

    #[error("Refusing to write outside the output directory: {0}")]
    UnsafePath(String),

    #[error("Empty file name")]
    EmptyName,

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Options for writing recovered files
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to overwrite existing files
    pub overwrite: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { overwrite: true }
    }
}

/// Result of writing a single file
#[derive(Debug, Clone, Serialize)]
pub struct WriteResult {
    /// Path where the file was saved
    pub saved_path: PathBuf,
    /// Size in bytes of the saved file
    pub saved_size: u64,
    /// Hex-encoded SHA-256 of the saved bytes
    pub sha256: String,
}

/// Trait for writing recovered files to storage
///
/// Names are relative to the writer's output directory and may contain
/// subdirectories, which the writer creates as needed.
///
/// # Example
///
/// ```ignore
/// let writer = LocalFileWriter::new(Path::new("./extracted"))?;
/// let result = writer.write("www/index.html", payload, &WriteOptions::default())?;
/// println!("Saved to: {}", result.saved_path.display());
/// ```
pub trait RecoveredFileWriter: Send + Sync {
    /// Creates a new writer for the specified output directory
    fn new(output_dir: &Path) -> Result<Self, FileWriterError>
    where
        Self: Sized;

    /// Writes `data` under `name`
    fn write(
        &self,
        name: &str,
        data: &[u8],
        options: &WriteOptions,
    ) -> Result<WriteResult, FileWriterError>;

    /// Returns the output directory
    fn output_dir(&self) -> &Path;

    /// Returns the number of files written so far
    fn files_written(&self) -> usize;

    /// Returns the total bytes written so far
    fn bytes_written(&self) -> u64;
}
