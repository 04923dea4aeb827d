//! Inspect options DTO

use crate::domain::repositories::WriteOptions;
use crate::domain::services::ScannerConfig;
use std::path::{Path, PathBuf};

/// Leading bytes shown in the diagnostic hex dump
pub const DIAGNOSTIC_DUMP_LEN: usize = 512;

/// Options for inspecting a filesystem image
#[derive(Debug, Clone)]
pub struct InspectOptions {
    /// Where to write extracted files (None = report only)
    pub extract_dir: Option<PathBuf>,
    /// Stride list, magic and blank-image probe length
    pub scanner: ScannerConfig,
    /// How extracted files are written
    pub write_options: WriteOptions,
    /// Bytes included in the diagnostic dump when nothing is recovered
    pub dump_len: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            extract_dir: None,
            scanner: ScannerConfig::default(),
            write_options: WriteOptions::default(),
            dump_len: DIAGNOSTIC_DUMP_LEN,
        }
    }
}

impl InspectOptions {
    /// Sets the extraction directory
    pub fn with_extract_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.extract_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Overrides the strides tried by the scanner
    pub fn with_strides(mut self, strides: Vec<usize>) -> Self {
        self.scanner = self.scanner.with_strides(strides);
        self
    }

    /// Keeps existing files instead of overwriting them
    pub fn no_overwrite(mut self) -> Self {
        self.write_options.overwrite = false;
        self
    }
}
