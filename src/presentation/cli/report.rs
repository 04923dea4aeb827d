//! Text rendering of lookup and inspect results

use crate::application::dto::InspectReport;
use crate::application::PartitionLookup;
use crate::domain::services::ScanOutcome;
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;
const DUMP_ROW_LEN: usize = 16;

/// Renders `data` as offset, hex and printable-ASCII columns, 16 bytes per row
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();

    for (row, chunk) in data.chunks(DUMP_ROW_LEN).enumerate() {
        let hex_str = chunk
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ");
        let ascii_str: String = chunk
            .iter()
            .map(|&b| if (32..127).contains(&b) { b as char } else { '.' })
            .collect();

        out.push_str(&format!(
            "{:04x}: {:<48} {}\n",
            row * DUMP_ROW_LEN,
            hex_str,
            ascii_str
        ));
    }

    out
}

/// Human readable size, e.g. `1.5 MB`
pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let b = bytes as f64;
    if b >= MB {
        format!("{:.2} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Lists every parsed partition, or says the table is empty
pub fn write_partition_listing<W: Write>(out: &mut W, lookup: &PartitionLookup) -> io::Result<()> {
    if lookup.entries.is_empty() {
        writeln!(out, "No partitions found in table")?;
        return Ok(());
    }

    if lookup.filesystem.is_none() {
        writeln!(out, "No SPIFFS partition found. Available partitions:")?;
    } else {
        writeln!(out, "Partitions:")?;
    }

    for entry in &lookup.entries {
        writeln!(out, "  {}", entry)?;
    }
    Ok(())
}

/// Writes the full inspect report
pub fn write_inspect_report<W: Write>(out: &mut W, report: &InspectReport) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out, "Reading SPIFFS image: {}", report.source)?;
    writeln!(
        out,
        "Image size: {} bytes ({})",
        report.image_size,
        format_bytes(report.image_size as u64)
    )?;
    writeln!(out)?;

    match &report.scan {
        ScanOutcome::Corrupted => {
            writeln!(out, "WARNING: File appears to be empty (all zeros)")?;
            writeln!(
                out,
                "   This indicates the SPIFFS image is corrupted or was never written."
            )?;
        }
        ScanOutcome::NoObjects => {
            writeln!(out, "Scanning for SPIFFS files...")?;
            writeln!(out, "{}", rule)?;
            writeln!(out, "No SPIFFS files found in image.")?;
            writeln!(out)?;
            writeln!(out, "This could mean:")?;
            writeln!(out, "  1. The SPIFFS image is empty")?;
            writeln!(out, "  2. The image uses different page/block sizes")?;
            writeln!(out, "  3. The image format is different (LittleFS, etc.)")?;
        }
        ScanOutcome::Found { headers, .. } => {
            writeln!(out, "Scanning for SPIFFS files...")?;
            writeln!(out, "{}", rule)?;
            for header in headers {
                writeln!(out, "Found: {} (page_size={})", header.name, header.stride)?;
                writeln!(out, "  Type: {}", header.object_type)?;
                writeln!(out, "  Size: {} bytes", header.payload_size)?;
                writeln!(out, "  Offset: 0x{:08x}", header.header_offset)?;
                writeln!(out)?;
            }
            writeln!(out, "Total files found: {}", headers.len())?;
            writeln!(out, "{}", rule)?;
        }
    }

    if let Some(fallback) = &report.fallback {
        writeln!(out)?;
        writeln!(out, "Checking for common file signatures...")?;
        for kind in &fallback.hints {
            writeln!(out, "  Found {} content (likely {})", kind, kind.file_name())?;
        }
        for block in &fallback.blocks {
            writeln!(
                out,
                "  {} block: {} bytes at offset 0x{:08x} (marker {:?})",
                block.content_kind,
                block.len(),
                block.start_offset,
                block.marker
            )?;
        }
    }

    if let Some(leading) = &report.leading_bytes {
        writeln!(out)?;
        writeln!(out, "First {} bytes (hex dump):", leading.len())?;
        write!(out, "{}", hex_dump(leading))?;
    }

    if let Some(dir) = &report.extract_dir {
        writeln!(out)?;
        writeln!(out, "Extracting files to: {}", dir.display())?;
        for file in &report.extracted {
            writeln!(
                out,
                "  Extracted: {} ({} bytes) sha256={}",
                file.name, file.write.saved_size, file.write.sha256
            )?;
        }
        for failure in &report.failures {
            writeln!(out, "  Error extracting {}: {}", failure.name, failure.reason)?;
        }
        if report.extracted.is_empty() && report.failures.is_empty() {
            writeln!(out, "  Could not extract files (nothing recovered)")?;
        } else {
            writeln!(out)?;
            writeln!(out, "Extraction complete!")?;
        }
    }

    Ok(())
}
