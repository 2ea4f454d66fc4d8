//! Configuration type definitions
//!
//! These types represent the torch height control configuration. They are
//! loaded once from the host settings store before first use and never
//! mutated by the control logic.

use core::fmt;

use crate::state::MAX_DEADLINE_TICKS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed arc-ok polling interval during ignition (ms)
pub const ARC_OK_POLL_INTERVAL_MS: u32 = 100;

/// Highest supported tick rate for the jog timer
pub const MAX_TICK_HZ: u32 = 100_000;

/// Highest axis index addressable in the direction-invert mask
pub const MAX_AXIS: u8 = 7;

/// Plasma torch and height control settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlasmaSettings {
    /// Master enable for height control
    pub thc_enabled: bool,
    /// Ignition attempts before giving up (0 = no arc-ok verification)
    pub arc_retries: u8,
    /// Target arc voltage in clamped units [0, 255]
    pub arc_voltage_setpoint: u8,
    /// Half-width of the no-correction band around the setpoint
    pub arc_voltage_hysteresis: u8,
    /// Percentage of programmed feed below which correction is suppressed
    pub vad_threshold: u8,
    /// Time to wait for arc-ok on each attempt (s)
    pub arc_fail_timeout: f32,
    /// Delay between a failed attempt and the next (s)
    pub arc_retry_delay: f32,
    /// Dwell before switching the torch off at the end of a cut (s)
    pub pause_at_end: f32,
    /// Delay from arc-ok until height control may engage (s)
    pub thc_delay: f32,
    /// Multiplier applied to the normalized voltage sample
    pub arc_voltage_scale: f32,
    /// Offset added after scaling
    pub arc_voltage_offset: f32,
}

impl Default for PlasmaSettings {
    fn default() -> Self {
        Self {
            thc_enabled: true,
            arc_retries: 3,
            arc_voltage_setpoint: 120,
            arc_voltage_hysteresis: 5,
            vad_threshold: 80,
            arc_fail_timeout: 1.0,
            arc_retry_delay: 1.0,
            pause_at_end: 0.0,
            thc_delay: 1.0,
            arc_voltage_scale: 255.0,
            arc_voltage_offset: 0.0,
        }
    }
}

/// Jog timer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimerConfig {
    /// Tick frequency of the periodic jog interrupt (Hz)
    ///
    /// The tick counter advances once per tick, so at 1000 Hz it counts
    /// milliseconds. The jog rate is one step per tick.
    pub tick_hz: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self { tick_hz: 1000 }
    }
}

impl TimerConfig {
    /// Tick period in microseconds
    pub fn period_us(&self) -> u32 {
        1_000_000 / self.tick_hz.max(1)
    }

    /// Convert a duration in seconds to whole ticks, rounding up
    pub fn seconds_to_ticks(&self, seconds: f32) -> u32 {
        ceil_to_u32(seconds * self.tick_hz as f32)
    }

    /// Convert a tick count to milliseconds, rounding down
    pub fn ticks_to_ms(&self, ticks: u32) -> u32 {
        (ticks as u64 * 1000 / self.tick_hz.max(1) as u64) as u32
    }
}

/// Z jog output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JogConfig {
    /// Axis index of the jogged axis in the direction-invert mask (Z = 2)
    pub axis: u8,
    /// Host direction-invert bitmask, one bit per axis
    pub dir_invert_mask: u8,
    /// Settle time after changing the direction line (µs)
    pub dir_setup_us: u32,
    /// Minimum step pulse width (µs)
    pub step_pulse_us: u32,
}

impl Default for JogConfig {
    fn default() -> Self {
        Self {
            axis: 2,
            dir_invert_mask: 0,
            dir_setup_us: 10,
            step_pulse_us: 10,
        }
    }
}

impl JogConfig {
    /// Whether the host inverts the direction line of the jogged axis
    pub fn direction_inverted(&self) -> bool {
        self.axis <= MAX_AXIS && self.dir_invert_mask & (1 << self.axis) != 0
    }
}

/// Arc-ok input configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArcOkConfig {
    /// Arc-ok is signalled by pulling the line low
    pub active_low: bool,
    /// Enable the internal pull-up (disable when an external pull-down is fitted)
    pub pull_up: bool,
}

impl Default for ArcOkConfig {
    fn default() -> Self {
        Self {
            active_low: true,
            pull_up: true,
        }
    }
}

/// Background control loop configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlConfig {
    /// Interval between voltage feedback updates (ms)
    pub update_interval_ms: u32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 5,
        }
    }
}

/// Complete torch height control configuration
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThcConfig {
    /// Torch and height control settings
    pub plasma: PlasmaSettings,
    /// Jog timer
    pub timer: TimerConfig,
    /// Z jog output
    pub jog: JogConfig,
    /// Arc-ok input
    pub arc_ok: ArcOkConfig,
    /// Background control loop
    pub control: ControlConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A duration is negative or not finite
    InvalidDuration(&'static str),
    /// Voltage scale or offset is not finite
    InvalidVoltageMapping,
    /// VAD threshold above 100%
    VadThresholdOutOfRange(u8),
    /// Tick rate is zero or above `MAX_TICK_HZ`
    TickRateOutOfRange(u32),
    /// Enable delay does not fit the tick clock's deadline range
    ThcDelayTooLong,
    /// Jog axis index does not fit the direction mask
    AxisOutOfRange(u8),
    /// Control loop interval is zero
    ZeroUpdateInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDuration(field) => {
                write!(f, "{field} must be a finite, non-negative number of seconds")
            }
            ConfigError::InvalidVoltageMapping => {
                f.write_str("arc voltage scale and offset must be finite")
            }
            ConfigError::VadThresholdOutOfRange(v) => {
                write!(f, "vad_threshold {v} exceeds 100%")
            }
            ConfigError::TickRateOutOfRange(hz) => {
                write!(f, "tick_hz {hz} outside 1..={MAX_TICK_HZ}")
            }
            ConfigError::ThcDelayTooLong => {
                f.write_str("thc_delay is too long for the tick rate")
            }
            ConfigError::AxisOutOfRange(axis) => write!(f, "jog axis {axis} above {MAX_AXIS}"),
            ConfigError::ZeroUpdateInterval => f.write_str("update_interval_ms must be non-zero"),
        }
    }
}

impl ThcConfig {
    /// Check that every field is usable by the controllers
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.plasma;
        for (name, value) in [
            ("arc_fail_timeout", p.arc_fail_timeout),
            ("arc_retry_delay", p.arc_retry_delay),
            ("pause_at_end", p.pause_at_end),
            ("thc_delay", p.thc_delay),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDuration(name));
            }
        }

        if !p.arc_voltage_scale.is_finite() || !p.arc_voltage_offset.is_finite() {
            return Err(ConfigError::InvalidVoltageMapping);
        }

        if p.vad_threshold > 100 {
            return Err(ConfigError::VadThresholdOutOfRange(p.vad_threshold));
        }

        if self.timer.tick_hz == 0 || self.timer.tick_hz > MAX_TICK_HZ {
            return Err(ConfigError::TickRateOutOfRange(self.timer.tick_hz));
        }

        if self.timer.seconds_to_ticks(p.thc_delay) > MAX_DEADLINE_TICKS {
            return Err(ConfigError::ThcDelayTooLong);
        }

        if self.jog.axis > MAX_AXIS {
            return Err(ConfigError::AxisOutOfRange(self.jog.axis));
        }

        if self.control.update_interval_ms == 0 {
            return Err(ConfigError::ZeroUpdateInterval);
        }

        Ok(())
    }
}

/// Convert seconds to whole milliseconds, rounding up
///
/// Negative and NaN inputs map to zero; overflow saturates.
pub fn seconds_to_ms(seconds: f32) -> u32 {
    ceil_to_u32(seconds * 1000.0)
}

fn ceil_to_u32(value: f32) -> u32 {
    // `as` saturates and maps NaN to 0
    libm::ceilf(value) as u32
}
