//! Converter configuration types
//!
//! The layout configuration is a TOML document. The `[signals]` section maps
//! signal names to bit widths; its key order is the packing order of the
//! signals inside a sample, so it is read into an ordered list rather than a
//! hash map.
//!
//! ```toml
//! [capture]
//! sample_count = 1024
//!
//! [vcd]
//! clock_period = 20
//!
//! [signals]
//! valid = 1
//! empty = 3
//! opcode = 4
//! ```

use crate::types::{ConvertError, Result, DEFAULT_CLOCK_PERIOD, DEFAULT_SAMPLE_COUNT};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// Full converter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertConfig {
    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub vcd: VcdConfig,

    pub signals: SignalDeclarations,
}

/// Shape of the captured dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Samples per word group
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
}

/// Settings of the generated trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcdConfig {
    /// Clock period in timescale units
    #[serde(default = "default_clock_period")]
    pub clock_period: u64,

    /// Value of the `$timescale` block
    #[serde(default = "default_timescale")]
    pub timescale: String,

    /// Name of the enclosing `$scope module`
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Name of the synthesized clock wire
    #[serde(default = "default_clock_name")]
    pub clock_name: String,

    /// Longest identifier code the layout may hand out
    #[serde(default = "default_max_id_len")]
    pub max_id_len: usize,
}

fn default_sample_count() -> usize {
    DEFAULT_SAMPLE_COUNT
}

fn default_clock_period() -> u64 {
    DEFAULT_CLOCK_PERIOD
}

fn default_timescale() -> String {
    "1ns".to_string()
}

fn default_scope() -> String {
    "trace_logger".to_string()
}

fn default_clock_name() -> String {
    "clk".to_string()
}

fn default_max_id_len() -> usize {
    4
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_count: default_sample_count(),
        }
    }
}

impl Default for VcdConfig {
    fn default() -> Self {
        Self {
            clock_period: default_clock_period(),
            timescale: default_timescale(),
            scope: default_scope(),
            clock_name: default_clock_name(),
            max_id_len: default_max_id_len(),
        }
    }
}

/// One `name = width` entry of the `[signals]` section
///
/// The width is kept signed so that a negative value in the file reaches
/// layout validation instead of failing as a type mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalDeclaration {
    pub name: String,
    pub bit_width: i64,
}

impl SignalDeclaration {
    pub fn new(name: impl Into<String>, bit_width: i64) -> Self {
        Self {
            name: name.into(),
            bit_width,
        }
    }
}

/// Signal declarations in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalDeclarations(pub Vec<SignalDeclaration>);

impl SignalDeclarations {
    pub fn iter(&self) -> std::slice::Iter<'_, SignalDeclaration> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a SignalDeclarations {
    type Item = &'a SignalDeclaration;
    type IntoIter = std::slice::Iter<'a, SignalDeclaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<SignalDeclaration> for SignalDeclarations {
    fn from_iter<T: IntoIterator<Item = SignalDeclaration>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

struct DeclarationVisitor;

impl<'de> Visitor<'de> for DeclarationVisitor {
    type Value = SignalDeclarations;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a table of signal names to integer bit widths")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut declarations = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, bit_width)) = map.next_entry::<String, i64>()? {
            declarations.push(SignalDeclaration { name, bit_width });
        }
        Ok(SignalDeclarations(declarations))
    }
}

impl<'de> Deserialize<'de> for SignalDeclarations {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DeclarationVisitor)
    }
}

impl Serialize for SignalDeclarations {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for decl in &self.0 {
            map.serialize_entry(&decl.name, &decl.bit_width)?;
        }
        map.end()
    }
}

impl Default for ConvertConfig {
    /// Layout of the original fixed-format capture: one trigger word and
    /// three data words per sample
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            vcd: VcdConfig::default(),
            signals: ["trig0", "data0", "data1", "data2"]
                .into_iter()
                .map(|name| SignalDeclaration::new(name, 32))
                .collect(),
        }
    }
}

impl ConvertConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConvertError::Config(e.to_string()))
    }

    /// Load a configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading layout configuration: {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| {
            ConvertError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Builder method: set samples per word group
    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.capture.sample_count = sample_count;
        self
    }

    /// Builder method: set the clock period
    pub fn with_clock_period(mut self, clock_period: u64) -> Self {
        self.vcd.clock_period = clock_period;
        self
    }

    /// Builder method: replace the signal declarations
    pub fn with_signals(mut self, signals: SignalDeclarations) -> Self {
        self.signals = signals;
        self
    }

    /// Builder method: append a signal declaration
    pub fn add_signal(mut self, name: impl Into<String>, bit_width: i64) -> Self {
        self.signals.0.push(SignalDeclaration::new(name, bit_width));
        self
    }
}
