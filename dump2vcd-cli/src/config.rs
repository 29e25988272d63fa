//! Configuration loading and command-line overrides

use anyhow::{Context, Result};
use dump2vcd::ConvertConfig;
use std::path::Path;

/// Values given on the command line that take precedence over the file
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub sample_count: Option<usize>,
    pub clock_period: Option<u64>,
}

/// Load the layout configuration, or fall back to the built-in layout
pub fn load_config(path: Option<&Path>, overrides: Overrides) -> Result<ConvertConfig> {
    let config = match path {
        Some(path) => ConvertConfig::load(path)
            .with_context(|| format!("Failed to load layout config: {:?}", path))?,
        None => {
            log::info!("No layout config given, using built-in trig0/data0/data1/data2 layout");
            ConvertConfig::default()
        }
    };

    Ok(apply_overrides(config, overrides))
}

fn apply_overrides(mut config: ConvertConfig, overrides: Overrides) -> ConvertConfig {
    if let Some(sample_count) = overrides.sample_count {
        log::debug!("Overriding sample count: {}", sample_count);
        config = config.with_sample_count(sample_count);
    }
    if let Some(clock_period) = overrides.clock_period {
        log::debug!("Overriding clock period: {}", clock_period);
        config = config.with_clock_period(clock_period);
    }
    config
}
