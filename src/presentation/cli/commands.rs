//! CLI commands using clap

use crate::application::dto::InspectOptions;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// flashprobe - flash dump inspector
///
/// Finds the SPIFFS partition in an ESP-style partition table and
/// recovers files from SPIFFS image dumps.
#[derive(Parser)]
#[command(name = "flashprobe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect flash partition tables and SPIFFS images", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the offset of the SPIFFS partition in a partition table
    Partitions {
        /// Path to the partition table binary (e.g., partitions.bin)
        table: PathBuf,

        /// Also list every partition on stderr
        #[arg(short, long)]
        list: bool,

        /// Print the parsed table as JSON
        #[arg(long)]
        json: bool,
    },

    /// List and optionally extract the files in a SPIFFS image
    Inspect {
        /// Path to the SPIFFS image (e.g., spiffs.bin)
        image: PathBuf,

        /// Extract files to this directory
        #[arg(short, long, value_name = "DIR")]
        extract: Option<PathBuf>,

        /// Page strides to try, in order
        #[arg(long, value_delimiter = ',')]
        stride: Option<Vec<usize>>,

        /// Keep existing files in the extraction directory
        #[arg(long)]
        no_overwrite: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Builds inspect options from command-line values
pub fn inspect_options(
    extract: Option<PathBuf>,
    stride: Option<Vec<usize>>,
    no_overwrite: bool,
) -> InspectOptions {
    let mut options = InspectOptions::default();

    if let Some(dir) = extract {
        options = options.with_extract_dir(dir);
    }

    if let Some(strides) = stride {
        let strides: Vec<usize> = strides.into_iter().filter(|&s| s > 0).collect();
        if strides.is_empty() {
            tracing::warn!("No usable strides given, using defaults");
        } else {
            options = options.with_strides(strides);
        }
    }

    if no_overwrite {
        options = options.no_overwrite();
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::DEFAULT_STRIDES;

    #[test]
    fn test_parse_inspect_command() {
        let cli = Cli::parse_from([
            "flashprobe",
            "inspect",
            "spiffs.bin",
            "-e",
            "out",
            "--stride",
            "512,4096",
        ]);

        match cli.command {
            Commands::Inspect {
                image,
                extract,
                stride,
                ..
            } => {
                assert_eq!(image, PathBuf::from("spiffs.bin"));
                assert_eq!(extract, Some(PathBuf::from("out")));
                assert_eq!(stride, Some(vec![512, 4096]));
            }
            _ => panic!("expected inspect"),
        }
    }

    #[test]
    fn test_parse_partitions_command() {
        let cli = Cli::parse_from(["flashprobe", "-v", "partitions", "partitions.bin", "--list"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Partitions { list: true, json: false, .. }));
    }

    #[test]
    fn test_inspect_options_ignores_zero_strides() {
        let options = inspect_options(None, Some(vec![0]), false);
        assert_eq!(options.scanner.strides, DEFAULT_STRIDES.to_vec());
        assert_eq!(options.extract_dir, None);

        let options = inspect_options(Some(PathBuf::from("x")), Some(vec![0, 1024]), true);
        assert_eq!(options.scanner.strides, vec![1024]);
        assert_eq!(options.extract_dir, Some(PathBuf::from("x")));
        assert!(!options.write_options.overwrite);
    }
}
