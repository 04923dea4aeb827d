//! Partition table parser
//!
//! Decodes the fixed 32-byte records of a flash partition table:
//!
//! ```text
//! 0x00  name      16 bytes, NUL padded
//! 0x10  type      u16 LE
//! 0x12  subtype   u8
//! 0x13  reserved  u8
//! 0x14  offset    u32 LE
//! 0x18  size      u32 LE
//! 0x1C  flags     u32 LE
//! ```

use crate::domain::entities::PartitionEntry;
use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

pub const PARTITION_RECORD_LEN: usize = 32;
const PARTITION_NAME_LEN: usize = 16;
/// Upper bound on entries parsed from one table
pub const MAX_PARTITION_ENTRIES: usize = 100;

/// Why no filesystem partition could be returned
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartitionLookupError {
    #[error("No partitions found in table")]
    EmptyTable,

    #[error("No SPIFFS partition found among {available} partitions")]
    NotFound { available: usize },
}

/// Parses every used record in `data`, in table order
///
/// Unused slots (name starting with 0x00 or 0xFF) are skipped without
/// stopping the walk. Trailing bytes shorter than a record are ignored.
pub fn parse_partition_table(data: &[u8]) -> Vec<PartitionEntry> {
    let mut entries = Vec::new();

    for record in data.chunks_exact(PARTITION_RECORD_LEN) {
        if let Some(entry) = decode_record(record) {
            entries.push(entry);

            if entries.len() >= MAX_PARTITION_ENTRIES {
                tracing::warn!(
                    "Partition table capped at {} entries",
                    MAX_PARTITION_ENTRIES
                );
                break;
            }
        }
    }

    tracing::debug!("Parsed {} partition entries", entries.len());
    entries
}

/// Returns the first SPIFFS partition, matched by subtype 0x82 or by name
pub fn find_filesystem_partition(
    entries: &[PartitionEntry],
) -> Result<&PartitionEntry, PartitionLookupError> {
    if entries.is_empty() {
        return Err(PartitionLookupError::EmptyTable);
    }

    entries
        .iter()
        .find(|entry| entry.is_filesystem_data())
        .ok_or(PartitionLookupError::NotFound {
            available: entries.len(),
        })
}

fn decode_record(record: &[u8]) -> Option<PartitionEntry> {
    let name_field = &record[..PARTITION_NAME_LEN];
    if matches!(name_field[0], 0x00 | 0xFF) {
        return None;
    }

    let name_end = name_field
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(PARTITION_NAME_LEN);
    let name = String::from_utf8_lossy(&name_field[..name_end])
        .trim()
        .to_string();
    if name.is_empty() {
        return None;
    }

    Some(PartitionEntry {
        name,
        partition_type: LittleEndian::read_u16(&record[16..18]),
        subtype: record[18],
        offset: LittleEndian::read_u32(&record[20..24]),
        size: LittleEndian::read_u32(&record[24..28]),
        flags: LittleEndian::read_u32(&record[28..32]),
    })
}
