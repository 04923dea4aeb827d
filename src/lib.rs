pub mod application;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use crate::core::{ByteImage, FlashError};
pub use application::dto::{InspectOptions, InspectReport};
pub use application::{InspectImageUseCase, LocatePartitionUseCase, PartitionLookup};
pub use domain::entities::{
    ContentKind, ExtractedContentBlock, FilesystemObjectHeader, PartitionEntry,
};
pub use domain::services::{
    find_filesystem_partition, parse_partition_table, ObjectScanner, PartitionLookupError,
    RecoveryStrategy, ScanOutcome, SignatureExtractor,
};
