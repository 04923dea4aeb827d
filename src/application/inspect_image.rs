//! Inspect image use case
//!
//! Scans a SPIFFS image for object headers, falls back to signature
//! recovery when none are found, and optionally writes what it recovers.

use crate::application::dto::{FallbackReport, InspectOptions, InspectReport};
use crate::core::ByteImage;
use crate::domain::entities::{ExtractedContentBlock, FilesystemObjectHeader};
use crate::domain::repositories::{RecoveredFileWriter, WriteOptions};
use crate::domain::services::{ContentHints, ObjectScanner, RecoveryStrategy, SignatureExtractor};
use crate::infrastructure::persistence::LocalFileWriter;
use anyhow::{Context, Result};
use std::path::Path;

/// Inspect image use case
///
/// The structured scan always takes precedence. The fallback strategy
/// only runs when the scan produced no header at any stride, and on a
/// blank image only when extraction was requested.
pub struct InspectImageUseCase {
    fallback: Box<dyn RecoveryStrategy>,
    hints: ContentHints,
}

impl InspectImageUseCase {
    /// Creates the use case with a custom fallback strategy
    pub fn new(fallback: Box<dyn RecoveryStrategy>) -> Self {
        Self {
            fallback,
            hints: ContentHints::new(),
        }
    }

    /// Creates the use case with the web asset signatures
    pub fn with_default_signatures() -> Self {
        Self::new(Box::new(SignatureExtractor::web_assets()))
    }

    /// Loads the image at `path` and inspects it
    pub fn execute(&self, path: &Path, options: &InspectOptions) -> Result<InspectReport> {
        let image = ByteImage::open(path)
            .with_context(|| format!("Failed to read filesystem image {}", path.display()))?;
        self.inspect(&image, path.display().to_string(), options)
    }

    /// Inspects an already loaded image
    ///
    /// Only a failure to create the extraction directory is returned as an
    /// error; per-file problems are recorded in the report.
    pub fn inspect(
        &self,
        image: &ByteImage,
        source: String,
        options: &InspectOptions,
    ) -> Result<InspectReport> {
        let writer = match &options.extract_dir {
            Some(dir) => Some(LocalFileWriter::new(dir).with_context(|| {
                format!("Failed to create extraction directory {}", dir.display())
            })?),
            None => None,
        };

        Ok(self.inspect_with_writer(
            image,
            source,
            options,
            writer.as_ref().map(|w| w as &dyn RecoveredFileWriter),
        ))
    }

    /// Inspects an image, writing through `writer` when one is given
    pub fn inspect_with_writer(
        &self,
        image: &ByteImage,
        source: String,
        options: &InspectOptions,
        writer: Option<&dyn RecoveredFileWriter>,
    ) -> InspectReport {
        let data = image.as_slice();
        tracing::info!("Inspecting {} ({} bytes)", source, data.len());

        let scanner = ObjectScanner::new(options.scanner.clone());
        let outcome = scanner.scan(data);

        let mut report = InspectReport::new(source, data.len(), outcome);
        report.extract_dir = writer.map(|w| w.output_dir().to_path_buf());

        if !report.headers().is_empty() {
            tracing::info!(
                "Found {} objects at stride {}",
                report.headers().len(),
                report.headers()[0].stride
            );

            if let Some(writer) = writer {
                let headers = report.headers().to_vec();
                for header in &headers {
                    extract_object(writer, data, header, &options.write_options, &mut report);
                }
            }
        } else if report.scan.is_corrupted() && writer.is_none() {
            tracing::info!("Image is blank, skipping recovery without an extraction directory");
        } else {
            tracing::info!("No objects found, trying {} recovery", self.fallback.name());

            let fallback = FallbackReport {
                strategy: self.fallback.name().to_string(),
                hints: self.hints.detect(data),
                blocks: self.fallback.recover(data),
            };

            if let Some(writer) = writer {
                for block in &fallback.blocks {
                    extract_block(writer, data, block, &options.write_options, &mut report);
                }
            }

            report.fallback = Some(fallback);

            if report.nothing_recovered() {
                report.leading_bytes = Some(image.head(options.dump_len).to_vec());
            }
        }

        report.finalize();
        report
    }
}

impl Default for InspectImageUseCase {
    fn default() -> Self {
        Self::with_default_signatures()
    }
}

fn extract_object(
    writer: &dyn RecoveredFileWriter,
    data: &[u8],
    header: &FilesystemObjectHeader,
    options: &WriteOptions,
    report: &mut InspectReport,
) {
    let Some(range) = header.payload_range(data.len()) else {
        tracing::warn!(
            "Error extracting {}: data extends beyond image ({} + {} > {})",
            header.name,
            header.payload_offset,
            header.payload_size,
            data.len()
        );
        report.add_failure(&header.name, "data extends beyond image");
        return;
    };

    let start = range.start;
    match writer.write(header.relative_name(), &data[range], options) {
        Ok(result) => {
            tracing::info!("Extracted {} ({} bytes)", header.name, result.saved_size);
            report.add_extracted(&header.name, start, result);
        }
        Err(e) => {
            tracing::warn!("Failed to write {}: {}", header.name, e);
            report.add_failure(&header.name, e.to_string());
        }
    }
}

fn extract_block(
    writer: &dyn RecoveredFileWriter,
    data: &[u8],
    block: &ExtractedContentBlock,
    options: &WriteOptions,
    report: &mut InspectReport,
) {
    let name = block.content_kind.file_name();
    let Some(content) = data.get(block.range()) else {
        report.add_failure(name, "block extends beyond image");
        return;
    };

    match writer.write(name, content, options) {
        Ok(result) => {
            tracing::info!(
                "Extracted {} ({} bytes) at offset 0x{:08x}",
                name,
                result.saved_size,
                block.start_offset
            );
            report.add_extracted(name, block.start_offset, result);
        }
        Err(e) => {
            tracing::warn!("Failed to write {}: {}", name, e);
            report.add_failure(name, e.to_string());
        }
    }
}
