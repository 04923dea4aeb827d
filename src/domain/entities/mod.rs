//! Domain entities
//!
//! Core business objects that represent the fundamental concepts
//! of flash image analysis.

mod content_block;
mod content_signature;
mod object_header;
mod partition_entry;

pub use content_block::{ContentKind, ExtractedContentBlock};
pub use content_signature::ContentSignature;
pub use object_header::{FilesystemObjectHeader, OBJECT_HEADER_LEN, SPIFFS_MAGIC};
pub use partition_entry::{
    PartitionEntry, PARTITION_TYPE_APP, PARTITION_TYPE_DATA, SUBTYPE_FILESYSTEM_DATA,
};
