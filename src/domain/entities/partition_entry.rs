//! Partition table entry entity
//!
//! One 32-byte record of a flash partition table.

use serde::Serialize;
use std::fmt;

/// Partition type used for application images
pub const PARTITION_TYPE_APP: u16 = 0x00;
/// Partition type used for data regions
pub const PARTITION_TYPE_DATA: u16 = 0x01;
/// Data subtype reserved for SPIFFS filesystems
pub const SUBTYPE_FILESYSTEM_DATA: u8 = 0x82;

/// A decoded partition descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionEntry {
    /// Partition label, decoded up to the first NUL
    pub name: String,
    /// Numeric category (app or data)
    pub partition_type: u16,
    /// Role discriminator within the category
    pub subtype: u8,
    /// Start address in flash
    pub offset: u32,
    /// Length in bytes
    pub size: u32,
    /// Opaque flag bits
    pub flags: u32,
}

impl PartitionEntry {
    /// Whether this entry describes a SPIFFS data region, by subtype or by name
    pub fn is_filesystem_data(&self) -> bool {
        self.subtype == SUBTYPE_FILESYSTEM_DATA || self.name.to_lowercase().contains("spiffs")
    }

    /// Offset formatted the way flashing tools expect it
    pub fn offset_hex(&self) -> String {
        format!("0x{:X}", self.offset)
    }
}

impl fmt::Display for PartitionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: type=0x{:02X}, subtype=0x{:02X}, offset=0x{:X}, size=0x{:X}",
            self.name, self.partition_type, self.subtype, self.offset, self.size
        )
    }
}
