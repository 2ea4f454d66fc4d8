//! GPIO step/direction output
//!
//! Bit-banged STEP and DIR lines for an external stepper driver
//! (A4988, DRV8825, TMC2209 in standalone mode). Runs in the jog
//! interrupt, so timing uses a blocking microsecond delay.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use thc_core::config::JogConfig;
use thc_core::traits::StepOutput;

/// Step/direction pulse timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepTiming {
    /// Settle time after a direction change (µs)
    pub dir_setup_us: u32,
    /// STEP high time (µs)
    pub step_pulse_us: u32,
}

impl From<&JogConfig> for StepTiming {
    fn from(config: &JogConfig) -> Self {
        Self {
            dir_setup_us: config.dir_setup_us,
            step_pulse_us: config.step_pulse_us,
        }
    }
}

/// GPIO step/direction output
pub struct GpioStepOutput<S, D, W> {
    step: S,
    dir: D,
    delay: W,
    timing: StepTiming,
}

impl<S, D, W> GpioStepOutput<S, D, W>
where
    S: OutputPin,
    D: OutputPin,
    W: DelayNs,
{
    /// Create a new step/dir output with STEP idle low
    pub fn new(step: S, dir: D, delay: W, timing: StepTiming) -> Self {
        let mut output = Self {
            step,
            dir,
            delay,
            timing,
        };
        let _ = output.step.set_low();
        output
    }

    /// Configured pulse timing
    pub fn timing(&self) -> StepTiming {
        self.timing
    }
}

impl<S, D, W> StepOutput for GpioStepOutput<S, D, W>
where
    S: OutputPin,
    D: OutputPin,
    W: DelayNs,
{
    fn set_direction(&mut self, high: bool) {
        let _ = if high {
            self.dir.set_high()
        } else {
            self.dir.set_low()
        };
        self.delay.delay_us(self.timing.dir_setup_us);
    }

    fn step_pulse(&mut self) {
        let _ = self.step.set_high();
        self.delay.delay_us(self.timing.step_pulse_us);
        let _ = self.step.set_low();
    }
}
