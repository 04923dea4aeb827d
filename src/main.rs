use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use flashprobe::application::dto::InspectOptions;
use flashprobe::application::{InspectImageUseCase, LocatePartitionUseCase};
use flashprobe::presentation::cli::{
    inspect_options, write_inspect_report, write_partition_listing, Cli, Commands,
};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Partitions { table, list, json } => run_partitions(table, list, json),
        Commands::Inspect {
            image,
            extract,
            stride,
            no_overwrite,
            json,
        } => {
            let options = inspect_options(extract, stride, no_overwrite);
            run_inspect(image, &options, json)
        }
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let default_level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_partitions(table: PathBuf, list: bool, json: bool) -> Result<ExitCode> {
    let lookup = LocatePartitionUseCase::new().execute(&table)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&lookup)?);
    }

    match lookup.result() {
        Ok(entry) => {
            if list {
                write_partition_listing(&mut io::stderr().lock(), &lookup)?;
            }
            if !json {
                println!("{}", entry.offset_hex());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::debug!("{}", e);
            write_partition_listing(&mut io::stderr().lock(), &lookup)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_inspect(image: PathBuf, options: &InspectOptions, json: bool) -> Result<ExitCode> {
    let report = InspectImageUseCase::with_default_signatures().execute(&image, options)?;

    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &report).context("Failed to encode report")?;
        writeln!(stdout)?;
    } else {
        write_inspect_report(&mut stdout, &report)?;
    }

    Ok(if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
