//! Configuration loading
//!
//! The configuration is compiled in from plasma.toml (validated by
//! build.rs) and parsed once at boot. Edit plasma.toml and rebuild to
//! customize.

use defmt::*;
use thc_core::config::{parse_config, ThcConfig};

/// Embedded configuration
const EMBEDDED_CONFIG: &str = include_str!("../../plasma.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load() -> ThcConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            // build.rs checks the file, so this only trips on a parser mismatch
            error!("Failed to parse embedded config: {}", Display2Format(&e));
            error!("Using default configuration");
            ThcConfig::default()
        }
    }
}
