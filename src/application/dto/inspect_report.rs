//! Inspect report DTO

use crate::domain::entities::{ContentKind, ExtractedContentBlock, FilesystemObjectHeader};
use crate::domain::repositories::WriteResult;
use crate::domain::services::ScanOutcome;
use serde::{Serialize, Serializer};
use std::path::PathBuf;

/// What the signature fallback found
#[derive(Debug, Clone, Serialize)]
pub struct FallbackReport {
    /// Name of the strategy that ran
    pub strategy: String,
    /// Content kinds that appear anywhere in the image
    pub hints: Vec<ContentKind>,
    /// Bounded blocks, at most one per kind
    pub blocks: Vec<ExtractedContentBlock>,
}

/// A file that was written to the extraction directory
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedFile {
    /// Recovered name (object name or fallback file name)
    pub name: String,
    /// Offset of the first payload byte in the image
    pub source_offset: usize,
    #[serde(flatten)]
    pub write: WriteResult,
}

/// A recovered entry that could not be extracted
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionFailure {
    pub name: String,
    pub reason: String,
}

/// Result of inspecting one filesystem image
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    /// Path or label of the inspected image
    pub source: String,
    /// Image length in bytes
    pub image_size: usize,
    /// Structured scan outcome
    pub scan: ScanOutcome,
    /// Present when the structured scan found nothing
    pub fallback: Option<FallbackReport>,
    /// Extraction directory, if extraction was requested
    pub extract_dir: Option<PathBuf>,
    pub extracted: Vec<ExtractedFile>,
    pub failures: Vec<ExtractionFailure>,
    /// Leading bytes, kept only when nothing was recovered
    #[serde(serialize_with = "serialize_hex")]
    pub leading_bytes: Option<Vec<u8>>,
    /// Overall verdict used for the exit status
    pub success: bool,
}

impl InspectReport {
    /// Creates an empty report for a scan outcome
    pub fn new(source: String, image_size: usize, scan: ScanOutcome) -> Self {
        Self {
            source,
            image_size,
            scan,
            fallback: None,
            extract_dir: None,
            extracted: Vec::new(),
            failures: Vec::new(),
            leading_bytes: None,
            success: false,
        }
    }

    /// Structured headers, empty when the fallback ran
    pub fn headers(&self) -> &[FilesystemObjectHeader] {
        self.scan.headers()
    }

    /// Fallback blocks, empty when the structured scan succeeded
    pub fn blocks(&self) -> &[ExtractedContentBlock] {
        self.fallback.as_ref().map(|f| f.blocks.as_slice()).unwrap_or(&[])
    }

    pub fn add_extracted(&mut self, name: &str, source_offset: usize, write: WriteResult) {
        self.extracted.push(ExtractedFile {
            name: name.to_string(),
            source_offset,
            write,
        });
    }

    pub fn add_failure(&mut self, name: &str, reason: impl Into<String>) {
        self.failures.push(ExtractionFailure {
            name: name.to_string(),
            reason: reason.into(),
        });
    }

    /// True when neither strategy recovered anything
    pub fn nothing_recovered(&self) -> bool {
        self.headers().is_empty() && self.blocks().is_empty()
    }

    /// Computes and stores the overall verdict
    ///
    /// Structured headers always count as success. Fallback blocks count
    /// only if, when extraction was requested, at least one was written.
    pub fn finalize(&mut self) {
        self.success = if !self.headers().is_empty() {
            true
        } else if self.blocks().is_empty() {
            false
        } else {
            self.extract_dir.is_none() || !self.extracted.is_empty()
        };
    }
}

fn serialize_hex<S: Serializer>(
    bytes: &Option<Vec<u8>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match bytes {
        Some(bytes) => serializer.serialize_some(&hex::encode(bytes)),
        None => serializer.serialize_none(),
    }
}
