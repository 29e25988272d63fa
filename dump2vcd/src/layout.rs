//! Signal layout engine
//!
//! Turns the ordered `name = width` declarations into a table of signals
//! with bit offsets and VCD identifier codes. Signals are packed back to
//! back in declaration order, starting at bit 0 of the first word group.
//!
//! Declarations whose name starts with `empty` are placeholders: they take
//! up bits but are never written to the trace and get no identifier.

use crate::config::{SignalDeclaration, SignalDeclarations};
use crate::types::{ConvertError, Result, WORD_BITS};
use serde::Serialize;
use std::collections::HashSet;

/// Name prefix that marks a placeholder declaration (case-sensitive)
pub const PLACEHOLDER_PREFIX: &str = "empty";

/// First printable character usable in an identifier code
const ID_FIRST_CHAR: u8 = b'!';

/// Number of printable characters `'!'..='~'`
const ID_RADIX: usize = 94;

/// Identifier index reserved for the clock
const CLOCK_ID_INDEX: usize = 0;

/// Encode an identifier index as a VCD identifier code
///
/// Indices below 94 map to the single character `chr(33 + index)`. Larger
/// indices use little-endian base-94 digits over the same characters.
pub fn id_code(index: usize) -> String {
    let mut idx = index;
    let mut code = String::new();
    loop {
        code.push((ID_FIRST_CHAR + (idx % ID_RADIX) as u8) as char);
        idx /= ID_RADIX;
        if idx == 0 {
            break;
        }
    }
    code
}

/// Check whether a declaration name is a placeholder
pub fn is_placeholder_name(name: &str) -> bool {
    name.starts_with(PLACEHOLDER_PREFIX)
}

/// A signal with its position inside a sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signal {
    /// Declared name
    pub name: String,
    /// First bit of the signal in the concatenated sample
    pub bit_offset: usize,
    /// Number of bits
    pub bit_width: usize,
    /// Identifier code (None for placeholders)
    pub vcd_id: Option<String>,
}

impl Signal {
    pub fn is_placeholder(&self) -> bool {
        self.vcd_id.is_none()
    }

    /// One past the last bit of the signal
    ///
    /// Saturates for hand-built signals; `SignalLayout::build` rejects
    /// layouts whose total does not fit in `usize`.
    pub fn end_bit(&self) -> usize {
        self.bit_offset.saturating_add(self.bit_width)
    }

    /// Word group holding the first bit
    pub fn first_word(&self) -> usize {
        self.bit_offset / WORD_BITS
    }

    /// Word group holding the last bit
    pub fn last_word(&self) -> usize {
        (self.end_bit() - 1) / WORD_BITS
    }
}

/// Immutable signal table for one conversion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalLayout {
    clock_id: String,
    signals: Vec<Signal>,
}

impl SignalLayout {
    /// Build the layout from ordered declarations
    ///
    /// `max_id_len` caps the length of the identifier codes; once the codes
    /// of that length run out, the build fails with
    /// `ConvertError::IdentifierExhaustion`.
    pub fn build(declarations: &SignalDeclarations, max_id_len: usize) -> Result<Self> {
        if max_id_len == 0 {
            return Err(ConvertError::Config(
                "max_id_len must be at least 1".to_string(),
            ));
        }

        let mut signals = Vec::with_capacity(declarations.len());
        let mut seen = HashSet::new();
        let mut offset = 0usize;
        let mut next_id_index = 0usize;

        for decl in declarations {
            let bit_width = Self::validate(decl)?;
            let vcd_id = if is_placeholder_name(&decl.name) {
                None
            } else {
                if !seen.insert(decl.name.as_str()) {
                    return Err(ConvertError::Config(format!(
                        "signal '{}' is declared more than once",
                        decl.name
                    )));
                }
                let id = id_code(CLOCK_ID_INDEX + 1 + next_id_index);
                next_id_index += 1;
                Some(id)
            };

            log::debug!(
                "Signal '{}': offset {} width {} id {:?}",
                decl.name,
                offset,
                bit_width,
                vcd_id
            );

            signals.push(Signal {
                name: decl.name.clone(),
                bit_offset: offset,
                bit_width,
                vcd_id,
            });
            offset = offset.checked_add(bit_width).ok_or_else(|| {
                ConvertError::Range(format!(
                    "signal '{}' pushes the layout past {} bits",
                    decl.name,
                    usize::MAX
                ))
            })?;
        }

        // Clock plus every active signal must fit in the identifier space
        let capacity = ID_RADIX.checked_pow(max_id_len as u32).unwrap_or(usize::MAX);
        if next_id_index + 1 > capacity {
            return Err(ConvertError::IdentifierExhaustion {
                signals: next_id_index,
                max_len: max_id_len,
            });
        }

        log::info!(
            "Built layout: {} signals ({} active), {} bits",
            signals.len(),
            next_id_index,
            offset
        );

        Ok(Self {
            clock_id: id_code(CLOCK_ID_INDEX),
            signals,
        })
    }

    fn validate(decl: &SignalDeclaration) -> Result<usize> {
        if decl.bit_width <= 0 {
            return Err(ConvertError::Config(format!(
                "signal '{}' has non-positive bit width {}",
                decl.name, decl.bit_width
            )));
        }
        if !is_placeholder_name(&decl.name)
            && (decl.name.is_empty() || decl.name.chars().any(char::is_whitespace))
        {
            return Err(ConvertError::Config(format!(
                "signal name '{}' cannot be used as a VCD reference",
                decl.name
            )));
        }

        usize::try_from(decl.bit_width).map_err(|_| {
            ConvertError::Config(format!(
                "signal '{}' bit width {} is too large",
                decl.name, decl.bit_width
            ))
        })
    }

    /// Identifier code of the synthesized clock
    pub fn clock_id(&self) -> &str {
        &self.clock_id
    }

    /// All signals in declaration order, placeholders included
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Signals that appear in the trace
    pub fn active_signals(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(|s| !s.is_placeholder())
    }

    /// Look up an active signal by name
    pub fn signal(&self, name: &str) -> Option<&Signal> {
        self.active_signals().find(|s| s.name == name)
    }

    /// Declared bits per sample, placeholders included
    pub fn total_bits(&self) -> usize {
        self.signals.last().map_or(0, Signal::end_bit)
    }

    /// Number of word groups a sample must have to hold every signal
    pub fn word_groups_required(&self) -> usize {
        self.total_bits().div_ceil(WORD_BITS)
    }
}
