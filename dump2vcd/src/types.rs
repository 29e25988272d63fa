//! Core types for the dump-to-VCD converter
//!
//! This module defines the error taxonomy and the constants shared by the
//! layout engine, the bit extractor and the VCD emitter.

/// Result type for converter operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Width of one captured word in bits
pub const WORD_BITS: usize = 32;

/// Number of samples per word group in the reference capture
pub const DEFAULT_SAMPLE_COUNT: usize = 1024;

/// Clock period in timescale units
pub const DEFAULT_CLOCK_PERIOD: u64 = 20;

/// Errors that can occur while converting a dump
///
/// Every variant is fatal for a run. The converter checks for all of them
/// before the first VCD line is written.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse dump at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Out of range: {0}")]
    Range(String),

    #[error("Identifier space exhausted: {signals} signals need more than {max_len} identifier characters")]
    IdentifierExhaustion { signals: usize, max_len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        ConvertError::Parse {
            line,
            message: message.into(),
        }
    }
}
