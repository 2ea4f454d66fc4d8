//! Minimal TOML parser for the height control configuration
//!
//! Handles only the subset needed for `plasma.toml` and does not allocate,
//! so it runs on the controller at boot as well as on the host.
//!
//! Supported features:
//! - `[section]` headers: `plasma`, `timer`, `jog`, `arc_ok`, `control`
//! - `key = value` pairs (integer, float, boolean)
//! - Integer prefixes `0x` and `0b` (handy for `dir_invert_mask`)
//! - `_` digit separators between digits (`tick_hz = 8_000`)
//! - Comments (`# ...`), whole-line or trailing
//!
//! NOT supported:
//! - Strings, arrays, inline tables, dotted keys

use core::fmt;
use core::str::FromStr;

use super::types::{ConfigError, ThcConfig};

/// Parse error, with the 1-based line it occurred on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection { line: u32 },
    /// Line is neither a header nor `key = value`
    Malformed { line: u32 },
    /// Key not recognized in the current section
    UnknownKey { line: u32 },
    /// Value does not parse as the key's type
    InvalidValue { line: u32 },
    /// Parsed configuration failed validation
    Invalid(ConfigError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidSection { line } => write!(f, "line {line}: invalid section"),
            ParseError::Malformed { line } => write!(f, "line {line}: expected key = value"),
            ParseError::UnknownKey { line } => write!(f, "line {line}: unknown key"),
            ParseError::InvalidValue { line } => write!(f, "line {line}: invalid value"),
            ParseError::Invalid(e) => write!(f, "invalid configuration: {e}"),
        }
    }
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Invalid(e)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Plasma,
    Timer,
    Jog,
    ArcOk,
    Control,
}

/// Parse TOML text into a validated `ThcConfig`
///
/// Keys that are absent keep their default values.
pub fn parse_config(input: &str) -> Result<ThcConfig, ParseError> {
    let mut config = ThcConfig::default();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line = index as u32 + 1;
        let text = strip_comment(raw).trim();

        if text.is_empty() {
            continue;
        }

        if let Some(header) = text.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or(ParseError::InvalidSection { line })?;
            section = parse_section(name.trim()).ok_or(ParseError::InvalidSection { line })?;
            continue;
        }

        let (key, value) = text.split_once('=').ok_or(ParseError::Malformed { line })?;
        apply_value(&mut config, section, key.trim(), value.trim(), line)?;
    }

    config.validate()?;
    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_section(name: &str) -> Option<Section> {
    match name {
        "plasma" => Some(Section::Plasma),
        "timer" => Some(Section::Timer),
        "jog" => Some(Section::Jog),
        "arc_ok" => Some(Section::ArcOk),
        "control" => Some(Section::Control),
        _ => None,
    }
}

fn apply_value(
    config: &mut ThcConfig,
    section: Section,
    key: &str,
    value: &str,
    line: u32,
) -> Result<(), ParseError> {
    let invalid = ParseError::InvalidValue { line };

    match (section, key) {
        (Section::Plasma, "thc_enabled") => {
            config.plasma.thc_enabled = parse_bool(value).ok_or(invalid)?
        }
        (Section::Plasma, "arc_retries") => {
            config.plasma.arc_retries = parse_int(value).ok_or(invalid)?
        }
        (Section::Plasma, "arc_voltage_setpoint") => {
            config.plasma.arc_voltage_setpoint = parse_int(value).ok_or(invalid)?
        }
        (Section::Plasma, "arc_voltage_hysteresis") => {
            config.plasma.arc_voltage_hysteresis = parse_int(value).ok_or(invalid)?
        }
        (Section::Plasma, "vad_threshold") => {
            config.plasma.vad_threshold = parse_int(value).ok_or(invalid)?
        }
        (Section::Plasma, "arc_fail_timeout") => {
            config.plasma.arc_fail_timeout = parse_float(value).ok_or(invalid)?
        }
        (Section::Plasma, "arc_retry_delay") => {
            config.plasma.arc_retry_delay = parse_float(value).ok_or(invalid)?
        }
        (Section::Plasma, "pause_at_end") => {
            config.plasma.pause_at_end = parse_float(value).ok_or(invalid)?
        }
        (Section::Plasma, "thc_delay") => {
            config.plasma.thc_delay = parse_float(value).ok_or(invalid)?
        }
        (Section::Plasma, "arc_voltage_scale") => {
            config.plasma.arc_voltage_scale = parse_float(value).ok_or(invalid)?
        }
        (Section::Plasma, "arc_voltage_offset") => {
            config.plasma.arc_voltage_offset = parse_float(value).ok_or(invalid)?
        }

        (Section::Timer, "tick_hz") => config.timer.tick_hz = parse_int(value).ok_or(invalid)?,

        (Section::Jog, "axis") => config.jog.axis = parse_int(value).ok_or(invalid)?,
        (Section::Jog, "dir_invert_mask") => {
            config.jog.dir_invert_mask = parse_int(value).ok_or(invalid)?
        }
        (Section::Jog, "dir_setup_us") => {
            config.jog.dir_setup_us = parse_int(value).ok_or(invalid)?
        }
        (Section::Jog, "step_pulse_us") => {
            config.jog.step_pulse_us = parse_int(value).ok_or(invalid)?
        }

        (Section::ArcOk, "active_low") => {
            config.arc_ok.active_low = parse_bool(value).ok_or(invalid)?
        }
        (Section::ArcOk, "pull_up") => config.arc_ok.pull_up = parse_bool(value).ok_or(invalid)?,

        (Section::Control, "update_interval_ms") => {
            config.control.update_interval_ms = parse_int(value).ok_or(invalid)?
        }

        _ => return Err(ParseError::UnknownKey { line }),
    }

    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Integer types accepted by `parse_int`
trait ConfigInt: FromStr {
    fn from_radix(digits: &str, radix: u32) -> Option<Self>;
}

macro_rules! impl_config_int {
    ($($t:ty),*) => {
        $(impl ConfigInt for $t {
            fn from_radix(digits: &str, radix: u32) -> Option<Self> {
                <$t>::from_str_radix(digits, radix).ok()
            }
        })*
    };
}

impl_config_int!(u8, u32);

fn parse_int<T: ConfigInt>(value: &str) -> Option<T> {
    without_separators(value, |value| {
        if let Some(hex) = value.strip_prefix("0x") {
            T::from_radix(hex, 16)
        } else if let Some(bin) = value.strip_prefix("0b") {
            T::from_radix(bin, 2)
        } else {
            value.parse().ok()
        }
    })
}

fn parse_float(value: &str) -> Option<f32> {
    without_separators(value, |value| value.parse().ok())
}

/// Longest value accepted when it contains `_` separators
const MAX_SEPARATED_LEN: usize = 48;

/// Run `parse` on `value` with its `_` digit separators removed
///
/// Every `_` must sit between two digits, as in TOML.
fn without_separators<T>(value: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
    if !value.contains('_') {
        return parse(value);
    }

    let bytes = value.as_bytes();
    let mut buf = [0u8; MAX_SEPARATED_LEN];
    let mut len = 0;

    for (i, &b) in bytes.iter().enumerate() {
        if b == b'_' {
            let before = i.checked_sub(1).and_then(|j| bytes.get(j))?;
            let after = bytes.get(i + 1)?;
            if !before.is_ascii_hexdigit() || !after.is_ascii_hexdigit() {
                return None;
            }
            continue;
        }
        *buf.get_mut(len)? = b;
        len += 1;
    }

    parse(core::str::from_utf8(&buf[..len]).ok()?)
}
