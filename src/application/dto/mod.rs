//! Data Transfer Objects

mod inspect_options;
mod inspect_report;

pub use inspect_options::{InspectOptions, DIAGNOSTIC_DUMP_LEN};
pub use inspect_report::{ExtractedFile, ExtractionFailure, FallbackReport, InspectReport};
