//! Main converter API
//!
//! The `Converter` ties a signal layout, the captured words and the VCD
//! settings together. All checks that could fail during extraction are run
//! by `validate()` before the first line is produced, so a trace is either
//! written completely or not at all.

use crate::config::ConvertConfig;
use crate::extractor::BitExtractor;
use crate::formats::WordStore;
use crate::layout::SignalLayout;
use crate::types::{ConvertError, Result, WORD_BITS};
use crate::vcd::VcdEmitter;
use std::io::Write;

/// The main converter struct - entry point for producing a trace
#[derive(Debug, Clone)]
pub struct Converter {
    layout: SignalLayout,
    words: WordStore,
    emitter: VcdEmitter,
}

/// Summary of a written trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionStats {
    /// Number of samples written
    pub samples: usize,
    /// Number of signals in the trace, clock excluded
    pub signals: usize,
    /// Number of lines written
    pub lines: usize,
}

impl Converter {
    pub fn new(layout: SignalLayout, words: WordStore, emitter: VcdEmitter) -> Self {
        Self {
            layout,
            words,
            emitter,
        }
    }

    /// Build layout, word store and emitter from a configuration
    ///
    /// # Arguments
    /// * `config` - Layout and trace settings
    /// * `words` - Flat word sequence from the dump parser
    pub fn from_config(config: &ConvertConfig, words: Vec<u32>) -> Result<Self> {
        let layout = SignalLayout::build(&config.signals, config.vcd.max_id_len)?;
        let words = WordStore::new(words, config.capture.sample_count)?;
        Ok(Self::new(layout, words, VcdEmitter::new(&config.vcd)))
    }

    pub fn layout(&self) -> &SignalLayout {
        &self.layout
    }

    pub fn words(&self) -> &WordStore {
        &self.words
    }

    pub fn sample_count(&self) -> usize {
        self.words.sample_count()
    }

    /// Check that every sample can be extracted
    pub fn validate(&self) -> Result<()> {
        if self.emitter.clock_period() == 0 {
            return Err(ConvertError::Config(
                "clock period must be greater than zero".to_string(),
            ));
        }

        let available = self.words.word_groups();
        if available == 0 {
            return Err(ConvertError::Range(format!(
                "dump holds {} words, fewer than one group of {} samples",
                self.words.len(),
                self.words.sample_count()
            )));
        }

        let required = self.layout.word_groups_required();
        if required > available {
            return Err(ConvertError::Range(format!(
                "layout declares {} bits but the dump only holds {} word groups ({} bits)",
                self.layout.total_bits(),
                available,
                available * WORD_BITS
            )));
        }

        log::debug!(
            "Layout uses {} of {} word groups, {} samples",
            required,
            available,
            self.sample_count()
        );
        Ok(())
    }

    /// Iterate over the lines of each sample
    ///
    /// The iterator does not validate; call `validate()` first or use
    /// `write_trace()`/`render()`.
    pub fn samples(&self) -> SampleLines<'_> {
        SampleLines {
            converter: self,
            index: 0,
        }
    }

    /// Produce the whole trace in memory
    pub fn render(&self, date: &str) -> Result<Vec<String>> {
        self.validate()?;

        let mut lines = self.emitter.prologue(&self.layout, date);
        for sample in self.samples() {
            lines.extend(sample?);
        }
        Ok(lines)
    }

    /// Validate, then write the whole trace to `writer`
    pub fn write_trace<W: Write>(&self, mut writer: W, date: &str) -> Result<ConversionStats> {
        self.validate()?;

        let mut stats = ConversionStats {
            samples: 0,
            signals: self.layout.active_signals().count(),
            lines: 0,
        };

        for line in self.emitter.prologue(&self.layout, date) {
            writeln!(writer, "{}", line)?;
            stats.lines += 1;
        }

        for sample in self.samples() {
            for line in sample? {
                writeln!(writer, "{}", line)?;
                stats.lines += 1;
            }
            stats.samples += 1;
        }

        writer.flush()?;

        log::info!(
            "Wrote {} samples of {} signals ({} lines)",
            stats.samples,
            stats.signals,
            stats.lines
        );
        Ok(stats)
    }
}

/// Iterator over the VCD lines of each sample, in sample order
pub struct SampleLines<'a> {
    converter: &'a Converter,
    index: usize,
}

impl<'a> Iterator for SampleLines<'a> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        let converter = self.converter;
        if self.index >= converter.sample_count() {
            return None;
        }

        let index = self.index;
        self.index += 1;

        let lines = BitExtractor::extract_sample(index, &converter.layout, &converter.words)
            .map(|values| {
                converter
                    .emitter
                    .sample(index, converter.layout.clock_id(), &values)
            });
        Some(lines)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.converter.sample_count().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SampleLines<'_> {}
