//! dump2vcd CLI Application
//!
//! Command-line front end of the dump2vcd library. It adds:
//! - Argument parsing and logging setup
//! - Layout config loading with command-line overrides
//! - Writing the trace to stdout or a file

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

mod config;

/// dump2vcd - Convert logic-analyzer memory dumps to VCD traces
#[derive(Parser, Debug)]
#[command(name = "dump2vcd")]
#[command(about = "Convert a logic-analyzer hex dump into a VCD waveform", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the hex dump (`addr: word\tword...` lines)
    #[arg(value_name = "DUMP")]
    dump: PathBuf,

    /// Path to the layout configuration (TOML with a [signals] section)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file for the trace (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Samples per word group (overrides the config)
    #[arg(long, value_name = "COUNT")]
    sample_count: Option<usize>,

    /// Clock period in timescale units (overrides the config)
    #[arg(long, value_name = "UNITS")]
    clock_period: Option<u64>,

    /// Print the computed signal layout as JSON to stderr
    #[arg(long)]
    print_layout: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("dump2vcd CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using converter library v{}", dump2vcd::VERSION);

    let overrides = config::Overrides {
        sample_count: args.sample_count,
        clock_period: args.clock_period,
    };
    let config = config::load_config(args.config.as_deref(), overrides)?;

    let words = dump2vcd::HexDumpParser::parse(&args.dump)
        .with_context(|| format!("Failed to read dump: {:?}", args.dump))?;

    let converter = dump2vcd::Converter::from_config(&config, words)
        .context("Invalid signal layout")?;

    if args.print_layout {
        let json = serde_json::to_string_pretty(converter.layout())?;
        eprintln!("{}", json);
    }

    // Fail before the output file is created
    converter.validate().context("Dump does not match the signal layout")?;

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create output: {:?}", path))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    let stats = converter
        .write_trace(BufWriter::new(writer), &dump2vcd::vcd::header_date())
        .context("Failed to write trace")?;

    log::info!(
        "Converted {} samples, {} signals",
        stats.samples,
        stats.signals
    );

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
