//! CLI module

mod commands;
mod report;

pub use commands::{inspect_options, Cli, Commands};
pub use report::{format_bytes, hex_dump, write_inspect_report, write_partition_listing};
