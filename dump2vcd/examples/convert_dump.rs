//! Standalone dump inspection tool
//!
//! Parses a dump, builds the layout and prints where every signal lives,
//! followed by the decoded values of the first few samples.
//!
//! Usage:
//!   convert_dump <capture.dump> [--layout <layout.toml>] [--limit <count>]
//!
//! Example:
//!   convert_dump capture.dump --layout layout.toml --limit 4

use dump2vcd::{BitExtractor, ConvertConfig, Converter, HexDumpParser};
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <capture.dump> [--layout <layout.toml>] [--limit <count>]", args[0]);
        std::process::exit(1);
    }

    let dump_path = PathBuf::from(&args[1]);
    let mut layout_path: Option<PathBuf> = None;
    let mut limit = 8usize;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--layout" if i + 1 < args.len() => {
                layout_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--limit" if i + 1 < args.len() => {
                limit = args[i + 1].parse()?;
                i += 2;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
    }

    let config = match &layout_path {
        Some(path) => ConvertConfig::load(path)?,
        None => ConvertConfig::default(),
    };
    let words = HexDumpParser::parse(&dump_path)?;
    let converter = Converter::from_config(&config, words)?;
    converter.validate()?;

    let layout = converter.layout();
    println!("=== LAYOUT ===");
    println!("{:<16} {:>6} {:>6} {:>6}  id", "name", "offset", "width", "words");
    for signal in layout.signals() {
        println!(
            "{:<16} {:>6} {:>6} {:>3}-{:<2}  {}",
            signal.name,
            signal.bit_offset,
            signal.bit_width,
            signal.first_word(),
            signal.last_word(),
            signal.vcd_id.as_deref().unwrap_or("-")
        );
    }
    println!(
        "\n{} bits in {} of {} word groups, {} samples",
        layout.total_bits(),
        layout.word_groups_required(),
        converter.words().word_groups(),
        converter.sample_count()
    );

    println!("\n=== SAMPLES ===");
    for index in 0..limit.min(converter.sample_count()) {
        println!("sample {}:", index);
        for (signal, bits) in BitExtractor::extract_sample(index, layout, converter.words())? {
            println!("  {:<16} {}", signal.name, bits);
        }
    }

    Ok(())
}
