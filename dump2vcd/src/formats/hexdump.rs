//! Logic-analyzer hex dump parser
//!
//! A dump is a text file where each line looks like
//!
//! ```text
//! 00000000:	deadbeef	00000001	...
//! ```
//!
//! The address before `:` is discarded. All words from all lines are
//! concatenated in line order and then viewed as a 2D array
//! `[word_group][sample_index]`, where each word group holds exactly
//! `sample_count` consecutive words.

use crate::types::{ConvertError, Result, WORD_BITS};
use std::path::Path;

/// Parsed capture words, addressable by `(word_group, sample_index)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordStore {
    words: Vec<u32>,
    sample_count: usize,
}

impl WordStore {
    /// Wrap a flat word sequence captured with `sample_count` samples per group
    ///
    /// Words past the last complete group are kept in the buffer but are
    /// never addressable.
    pub fn new(words: Vec<u32>, sample_count: usize) -> Result<Self> {
        if sample_count == 0 {
            return Err(ConvertError::Config(
                "sample count must be greater than zero".to_string(),
            ));
        }

        let trailing = words.len() % sample_count;
        if trailing != 0 {
            log::warn!(
                "Dropping {} trailing word(s): {} words do not divide into groups of {} samples",
                trailing,
                words.len(),
                sample_count
            );
        }

        Ok(Self {
            words,
            sample_count,
        })
    }

    /// Parse a dump file from disk
    pub fn from_file(path: &Path, sample_count: usize) -> Result<Self> {
        let words = HexDumpParser::parse(path)?;
        Self::new(words, sample_count)
    }

    /// Number of samples in every word group
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Number of complete word groups
    pub fn word_groups(&self) -> usize {
        self.words.len() / self.sample_count
    }

    /// Number of bits available per sample
    pub fn bits_per_sample(&self) -> usize {
        self.word_groups() * WORD_BITS
    }

    /// Total number of parsed words, including any incomplete trailing group
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Fetch the word of `word_group` at `sample_index`
    pub fn get(&self, word_group: usize, sample_index: usize) -> Result<u32> {
        if sample_index >= self.sample_count {
            return Err(ConvertError::Range(format!(
                "sample index {} is outside 0..{}",
                sample_index, self.sample_count
            )));
        }
        if word_group >= self.word_groups() {
            return Err(ConvertError::Range(format!(
                "word group {} is outside 0..{}",
                word_group,
                self.word_groups()
            )));
        }

        Ok(self.words[word_group * self.sample_count + sample_index])
    }
}

/// Parser for the `addr: word\tword...` dump text format
pub struct HexDumpParser;

impl HexDumpParser {
    /// Read and parse a dump file into a flat word sequence
    pub fn parse(path: &Path) -> Result<Vec<u32>> {
        log::info!("Parsing dump file: {:?}", path);

        let text = std::fs::read_to_string(path)?;
        let words = Self::parse_str(&text)?;

        log::info!("Parsed {} words from {:?}", words.len(), path);
        Ok(words)
    }

    /// Parse dump text into a flat word sequence
    ///
    /// Blank lines are skipped. Any other line must carry a `:` separator
    /// followed by tab-separated hex words.
    pub fn parse_str(text: &str) -> Result<Vec<u32>> {
        let mut words = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let (_addr, data) = line
                .split_once(':')
                .ok_or_else(|| ConvertError::parse(line_no, "missing ':' separator"))?;

            for token in data.trim().split('\t') {
                words.push(Self::parse_word(token.trim(), line_no)?);
            }
        }

        Ok(words)
    }

    /// Parse a single hex word, with or without a `0x` prefix
    fn parse_word(token: &str, line_no: usize) -> Result<u32> {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);

        if digits.is_empty() {
            return Err(ConvertError::parse(line_no, "empty hex word"));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConvertError::parse(
                line_no,
                format!("'{}' is not a hexadecimal word", token),
            ));
        }

        u32::from_str_radix(digits, 16).map_err(|_| {
            ConvertError::parse(line_no, format!("'{}' does not fit in 32 bits", token))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines_in_order() {
        let text = "00000000:\tdeadbeef\t00000001\n00000008:\t0x10\tFFFFFFFF\n";
        let words = HexDumpParser::parse_str(text).unwrap();
        assert_eq!(words, vec![0xDEADBEEF, 0x1, 0x10, 0xFFFF_FFFF]);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let text = "0: 1\n\n   \n4: 2\n";
        let words = HexDumpParser::parse_str(text).unwrap();
        assert_eq!(words, vec![1, 2]);
    }

    #[test]
    fn test_missing_separator() {
        let err = HexDumpParser::parse_str("0: 1\ndeadbeef\n").unwrap_err();
        match err {
            ConvertError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_hex_token() {
        let err = HexDumpParser::parse_str("0:\t12\tzz\n").unwrap_err();
        assert!(matches!(err, ConvertError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_empty_token() {
        // Two tabs in a row leave an empty word between them
        let err = HexDumpParser::parse_str("0:\t12\t\t34\n").unwrap_err();
        assert!(matches!(err, ConvertError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_word_wider_than_32_bits() {
        let err = HexDumpParser::parse_str("0:\t100000000\n").unwrap_err();
        assert!(err.to_string().contains("32 bits"));
    }

    #[test]
    fn test_store_indexing() {
        // 2 groups x 3 samples
        let store = WordStore::new(vec![10, 11, 12, 20, 21, 22], 3).unwrap();
        assert_eq!(store.word_groups(), 2);
        assert_eq!(store.bits_per_sample(), 64);
        assert_eq!(store.get(0, 2).unwrap(), 12);
        assert_eq!(store.get(1, 0).unwrap(), 20);
        assert!(matches!(store.get(2, 0), Err(ConvertError::Range(_))));
        assert!(matches!(store.get(0, 3), Err(ConvertError::Range(_))));
    }

    #[test]
    fn test_trailing_words_are_not_addressable() {
        let store = WordStore::new(vec![1, 2, 3, 4, 5], 2).unwrap();
        assert_eq!(store.len(), 5);
        assert_eq!(store.word_groups(), 2);
        assert!(store.get(2, 0).is_err());
    }

    #[test]
    fn test_zero_sample_count() {
        assert!(matches!(
            WordStore::new(vec![1], 0),
            Err(ConvertError::Config(_))
        ));
    }
}
