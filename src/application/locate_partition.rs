//! Locate partition use case
//!
//! Reads a partition table dump and finds the SPIFFS data partition.

use crate::core::ByteImage;
use crate::domain::entities::PartitionEntry;
use crate::domain::services::{
    find_filesystem_partition, parse_partition_table, PartitionLookupError,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Parsed table plus the located filesystem partition
#[derive(Debug, Clone, Serialize)]
pub struct PartitionLookup {
    /// Path or label of the table
    pub source: String,
    /// Every used entry, in table order
    pub entries: Vec<PartitionEntry>,
    /// First SPIFFS partition, if any
    pub filesystem: Option<PartitionEntry>,
}

impl PartitionLookup {
    /// Returns the filesystem partition or the reason there is none
    pub fn result(&self) -> Result<&PartitionEntry, PartitionLookupError> {
        find_filesystem_partition(&self.entries)
    }
}

/// Locate partition use case
#[derive(Debug, Default)]
pub struct LocatePartitionUseCase;

impl LocatePartitionUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Loads the table at `path` and looks up the filesystem partition
    pub fn execute(&self, path: &Path) -> Result<PartitionLookup> {
        let image = ByteImage::open(path)
            .with_context(|| format!("Failed to read partition table {}", path.display()))?;
        Ok(self.locate(&image, path.display().to_string()))
    }

    /// Looks up the filesystem partition in an already loaded table
    pub fn locate(&self, table: &[u8], source: String) -> PartitionLookup {
        let entries = parse_partition_table(table);
        let filesystem = find_filesystem_partition(&entries).ok().cloned();

        match &filesystem {
            Some(entry) => tracing::info!(
                "Found filesystem partition '{}' at {}",
                entry.name,
                entry.offset_hex()
            ),
            None => tracing::info!(
                "No filesystem partition among {} entries in {}",
                entries.len(),
                source
            ),
        }

        PartitionLookup {
            source,
            entries,
            filesystem,
        }
    }
}
