//! Logic-analyzer dump to VCD converter library
//!
//! Turns a word-addressed hex capture into a Value Change Dump that standard
//! waveform viewers can open.
//!
//! # Architecture
//!
//! - `formats`: parses the `addr: word\tword...` dump into a `WordStore`
//! - `config`: reads the ordered `[signals]` layout from TOML
//! - `layout`: packs the declared signals into bit offsets and hands out
//!   VCD identifier codes
//! - `extractor`: slices each signal's bits out of a sample, including
//!   signals that straddle two words
//! - `vcd`: renders the prologue and the per-sample clock edges
//! - `converter`: validates everything up front, then streams the trace
//!
//! # Example Usage
//!
//! ```no_run
//! use dump2vcd::{ConvertConfig, Converter, HexDumpParser};
//! use std::path::Path;
//!
//! let config = ConvertConfig::load(Path::new("layout.toml")).unwrap();
//! let words = HexDumpParser::parse(Path::new("capture.dump")).unwrap();
//!
//! let converter = Converter::from_config(&config, words).unwrap();
//! let stdout = std::io::stdout();
//! converter
//!     .write_trace(stdout.lock(), &dump2vcd::vcd::header_date())
//!     .unwrap();
//! ```

// Public modules
pub mod config;
pub mod converter;
pub mod extractor;
pub mod formats;
pub mod layout;
pub mod types;
pub mod vcd;

// Re-export main types for convenience
pub use config::{CaptureConfig, ConvertConfig, SignalDeclaration, SignalDeclarations, VcdConfig};
pub use converter::{ConversionStats, Converter};
pub use extractor::BitExtractor;
pub use formats::{HexDumpParser, WordStore};
pub use layout::{Signal, SignalLayout};
pub use types::{ConvertError, Result};
pub use vcd::VcdEmitter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
