//! Local file writer implementation
//!
//! Writes recovered payloads to the local filesystem, preserving any
//! relative directory structure encoded in the object name.

use crate::domain::repositories::{
    FileWriterError, RecoveredFileWriter, WriteOptions, WriteResult,
};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Local file system writer
pub struct LocalFileWriter {
    output_dir: PathBuf,
    files_written: AtomicUsize,
    bytes_written: AtomicU64,
}

impl LocalFileWriter {
    /// Maps a recovered name to a path under the output directory
    ///
    /// Leading separators are stripped. Anything that would climb out of
    /// the output directory is rejected.
    pub fn output_path(&self, name: &str) -> Result<PathBuf, FileWriterError> {
        let relative = name.trim_start_matches(['/', '\\']);
        let mut path = self.output_dir.clone();
        let mut pushed = false;

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => {
                    path.push(part);
                    pushed = true;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(FileWriterError::UnsafePath(name.to_string()));
                }
            }
        }

        if !pushed {
            return Err(FileWriterError::EmptyName);
        }

        Ok(path)
    }
}

impl RecoveredFileWriter for LocalFileWriter {
    fn new(output_dir: &Path) -> Result<Self, FileWriterError> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir).map_err(|e| {
                if e.kind() == std::io::ErrorKind::PermissionDenied {
                    FileWriterError::PermissionDenied(output_dir.display().to_string())
                } else {
                    FileWriterError::IoError(e)
                }
            })?;
        }

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            files_written: AtomicUsize::new(0),
            bytes_written: AtomicU64::new(0),
        })
    }

    fn write(
        &self,
        name: &str,
        data: &[u8],
        options: &WriteOptions,
    ) -> Result<WriteResult, FileWriterError> {
        let output_path = self.output_path(name)?;

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if output_path.exists() && !options.overwrite {
            return Err(FileWriterError::FileExists(
                output_path.display().to_string(),
            ));
        }

        let mut output_file = File::create(&output_path)?;
        output_file.write_all(data)?;
        output_file.sync_all()?;

        let saved_size = data.len() as u64;
        self.files_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(saved_size, Ordering::Relaxed);

        tracing::debug!("Wrote {} ({} bytes)", output_path.display(), saved_size);

        Ok(WriteResult {
            saved_path: output_path,
            saved_size,
            sha256: hex::encode(Sha256::digest(data)),
        })
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn files_written(&self) -> usize {
        self.files_written.load(Ordering::Relaxed)
    }

    fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }
}
