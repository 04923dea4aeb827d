//! Domain services
//!
//! Parsing and recovery logic that operates on raw image bytes.

mod object_scanner;
mod partition_table;
mod signature_extractor;

pub use object_scanner::{
    is_blank, ObjectScanner, ScanOutcome, ScannerConfig, CORRUPTION_PROBE_LEN, DEFAULT_STRIDES,
};
pub use partition_table::{
    find_filesystem_partition, parse_partition_table, PartitionLookupError,
    MAX_PARTITION_ENTRIES, PARTITION_RECORD_LEN,
};
pub use signature_extractor::{
    content_end, ContentHints, RecoveryStrategy, SignatureExtractor, MIN_BLOCK_LEN,
    PADDING_RUN_LIMIT,
};
