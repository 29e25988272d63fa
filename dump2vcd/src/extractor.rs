//! Bit extraction engine
//!
//! Slices a signal's bits out of one sample. Each word of the sample is
//! rendered as a 32-character MSB-first binary string, the words covering
//! the signal are concatenated in ascending word-group order, and the
//! signal's bits are cut from that string. A signal that straddles a word
//! boundary therefore needs no special handling.

use crate::formats::WordStore;
use crate::layout::{Signal, SignalLayout};
use crate::types::{ConvertError, Result, WORD_BITS};

/// Extracts signal values from the captured words
pub struct BitExtractor;

impl BitExtractor {
    /// Extract the bits of `signal` at `sample_index`
    ///
    /// # Returns
    /// * A string of exactly `signal.bit_width` `'0'`/`'1'` characters
    /// * `ConvertError::Range` if a word the signal needs is not captured
    pub fn extract(sample_index: usize, signal: &Signal, words: &WordStore) -> Result<String> {
        if signal.bit_width == 0 {
            return Err(ConvertError::Range(format!(
                "signal '{}' has no bits to extract",
                signal.name
            )));
        }

        let end_bit = signal.bit_offset.checked_add(signal.bit_width).ok_or_else(|| {
            ConvertError::Range(format!("signal '{}' ends past the addressable bits", signal.name))
        })?;

        let first_word = signal.first_word();
        let last_word = (end_bit - 1) / WORD_BITS;
        if last_word >= words.word_groups() {
            return Err(ConvertError::Range(format!(
                "signal '{}' needs word group {} but the dump holds {}",
                signal.name,
                last_word,
                words.word_groups()
            )));
        }
        let bit_offset_in_concat = signal.bit_offset - first_word * WORD_BITS;

        let mut concat = String::with_capacity((last_word - first_word + 1) * WORD_BITS);
        for word_group in first_word..=last_word {
            let word = words.get(word_group, sample_index).map_err(|e| {
                ConvertError::Range(format!(
                    "signal '{}' at sample {}: {}",
                    signal.name, sample_index, e
                ))
            })?;
            concat.push_str(&Self::word_bits(word));
        }

        Ok(concat[bit_offset_in_concat..bit_offset_in_concat + signal.bit_width].to_string())
    }

    /// Extract every active signal of one sample, in declaration order
    pub fn extract_sample<'a>(
        sample_index: usize,
        layout: &'a SignalLayout,
        words: &WordStore,
    ) -> Result<Vec<(&'a Signal, String)>> {
        layout
            .active_signals()
            .map(|signal| Ok((signal, Self::extract(sample_index, signal, words)?)))
            .collect()
    }

    /// Render a word as 32 binary digits, most significant bit first
    pub fn word_bits(word: u32) -> String {
        format!("{:032b}", word)
    }
}
