//! Capture file format parsers
//!
//! This module contains the parser for the logic-analyzer text dump.
//! The parser produces a `WordStore` that the extractor reads from.

pub mod hexdump;

// Re-export parser types
pub use hexdump::{HexDumpParser, WordStore};
