//! Command-line driver for the compiler.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use zoneinfo_compile::{compile, Config};

/// Compile IANA/Olson time-zone source files into resolved transition
/// tables, one JSON document per zone.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory containing the Olson region files.
    #[arg(long, value_name = "DIR")]
    olsen_dir: PathBuf,

    /// Directory to write one file per resolved zone into.
    #[arg(long, value_name = "DIR")]
    dest_dir: Option<PathBuf>,

    /// Trace each period and rule application.
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = Config {
        olsen_dir: args.olsen_dir,
        dest_dir: args.dest_dir,
        debug: args.debug,
    };
    match compile(&config) {
        Ok(zones) => {
            println!("compiled {} zones", zones.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "compilation failed");
            ExitCode::FAILURE
        }
    }
}
