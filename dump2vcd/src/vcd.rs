//! VCD text generation
//!
//! Produces the trace as a sequence of lines. The prologue declares the
//! clock and every active signal and sets their initial values; each sample
//! then becomes a rising clock edge carrying the signal values, followed by
//! a falling clock edge half a period later.

use crate::config::VcdConfig;
use crate::layout::{Signal, SignalLayout};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

/// Tool name written into the `$version` block
pub const TOOL_NAME: &str = "dump2vcd";

/// Format a time the way C `ctime` does, e.g. `Sun Oct 18 09:05:02 2026`
pub fn ctime<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format("%a %b %e %H:%M:%S %Y").to_string()
}

/// Current local time in `ctime` layout, for the `$date` block
pub fn header_date() -> String {
    ctime(&Local::now())
}

/// Render one value change
///
/// 1-bit signals use the scalar form `<bit><id>`, wider signals the vector
/// form `b<bits> <id>`.
pub fn value_change(bits: &str, id: &str) -> String {
    if bits.len() == 1 {
        format!("{}{}", bits, id)
    } else {
        format!("b{} {}", bits, id)
    }
}

/// Serializes a layout and its sample values as VCD lines
#[derive(Debug, Clone)]
pub struct VcdEmitter {
    clock_period: u64,
    timescale: String,
    scope: String,
    clock_name: String,
}

impl VcdEmitter {
    pub fn new(config: &VcdConfig) -> Self {
        Self {
            clock_period: config.clock_period,
            timescale: config.timescale.clone(),
            scope: config.scope.clone(),
            clock_name: config.clock_name.clone(),
        }
    }

    pub fn clock_period(&self) -> u64 {
        self.clock_period
    }

    /// Time of the rising edge of sample `index`
    pub fn rising_edge(&self, index: usize) -> u64 {
        index as u64 * self.clock_period
    }

    /// Time of the falling edge of sample `index`
    pub fn falling_edge(&self, index: usize) -> u64 {
        self.rising_edge(index) + self.clock_period / 2
    }

    /// Header, declarations and the initial `$dumpvars` block
    pub fn prologue(&self, layout: &SignalLayout, date: &str) -> Vec<String> {
        let clk = layout.clock_id();
        let mut lines = vec![
            "$date".to_string(),
            format!("    {}", date),
            "$end".to_string(),
            "$version".to_string(),
            format!("    {} {}", TOOL_NAME, crate::VERSION),
            "$end".to_string(),
            "$timescale".to_string(),
            format!("    {}", self.timescale),
            "$end".to_string(),
            format!("$scope module {} $end", self.scope),
            format!("$var wire 1 {} {} $end", clk, self.clock_name),
        ];

        for (signal, id) in Self::declared(layout) {
            lines.push(format!(
                "$var wire {} {} {} $end",
                signal.bit_width, id, signal.name
            ));
        }

        lines.push("$upscope $end".to_string());
        lines.push("$enddefinitions $end".to_string());
        lines.push("$dumpvars".to_string());
        lines.push(format!("1{}", clk));
        for (signal, id) in Self::declared(layout) {
            lines.push(value_change(&"0".repeat(signal.bit_width), id));
        }
        lines.push("$end".to_string());

        lines
    }

    /// Both clock edges of one sample with the sample's signal values
    ///
    /// `values` holds the active signals of the layout in declaration order
    /// together with their extracted bits.
    pub fn sample(&self, index: usize, clock_id: &str, values: &[(&Signal, String)]) -> Vec<String> {
        let mut lines = Vec::with_capacity(values.len() + 4);

        lines.push(format!("#{}", self.rising_edge(index)));
        lines.push(format!("1{}", clock_id));
        for (signal, bits) in values {
            if let Some(id) = signal.vcd_id.as_deref() {
                lines.push(value_change(bits, id));
            }
        }
        lines.push(format!("#{}", self.falling_edge(index)));
        lines.push(format!("0{}", clock_id));

        lines
    }

    fn declared(layout: &SignalLayout) -> impl Iterator<Item = (&Signal, &str)> {
        layout
            .active_signals()
            .filter_map(|s| s.vcd_id.as_deref().map(|id| (s, id)))
    }
}

impl Default for VcdEmitter {
    fn default() -> Self {
        Self::new(&VcdConfig::default())
    }
}
