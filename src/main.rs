//! tigger - per-site evolutionary rates from an alignment
//!
//! ## Usage
//!
//! ```bash
//! tigger <alignment_file>
//! tigger --debug -o rates.txt <alignment_file>
//! ```
//!
//! ## Supported Formats
//!
//! - PHYLIP (.phy, .phylip), sequential and interleaved
//! - FASTA (.fas, .fasta, .fa)
//!
//! Rates are written one per line, in site order, to the alignment path with
//! a `.tigger` extension unless `-o` is given.

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, LevelFilter};

use tigger::{read, AlignmentError, RateEstimator, Tiger};

/// tigger - TIGER rates for every site of a Phylip or FASTA alignment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Alignment file (PHYLIP or FASTA, detected from the extension)
    alignment_file: PathBuf,

    /// Output file for the rates (default: the alignment path with a .tigger extension)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Log debug messages, including the module they come from
    #[arg(long)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::new();
    if debug {
        builder.filter_level(LevelFilter::Debug).format(|buf, record| {
            writeln!(
                buf,
                "{:<8} | {} | {:<20} | {}",
                record.level(),
                buf.timestamp_seconds(),
                record.target(),
                record.args()
            )
        });
    } else {
        builder
            .parse_env(env_logger::Env::default().default_filter_or("info"))
            .format(|buf, record| {
                writeln!(
                    buf,
                    "{:<8} | {} | {}",
                    record.level(),
                    buf.timestamp_seconds(),
                    record.args()
                )
            });
    }
    builder.init();
}

/// Writes one rate per line with six decimals.
fn write_rates(path: &Path, rates: &[f64]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for rate in rates {
        writeln!(writer, "{:.6}", rate)?;
    }
    writer.flush()?;
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let alignment = read(&args.alignment_file)?;

    info!("Species count {}", alignment.species_count());
    info!("Alignment size {}", alignment.sequence_length());

    info!("Beginning analysis");
    let mut tiger = Tiger::new();
    tiger.build_bitsets(&alignment);
    let rates = tiger.calc_rates();
    info!("Finished analysis");

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.alignment_file.with_extension("tigger"));

    info!("Saving file {}", output_path.display());
    write_rates(&output_path, &rates)
        .with_context(|| format!("Failed to write rates to '{}'", output_path.display()))?;

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // the reader has already logged why the alignment was rejected
            if err.downcast_ref::<AlignmentError>().is_none() {
                error!("{}", err);
                err.chain()
                    .skip(1)
                    .for_each(|cause| error!("  because: {}", cause));
            }
            ExitCode::FAILURE
        }
    }
}
