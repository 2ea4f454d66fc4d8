//! Interrupt-context Z jog driver
//!
//! On every timer tick the driver looks at the jog flags and emits at most
//! one step pulse on the height axis:
//!
//! - `Up`: direction low (high if the host inverts the axis), step, position +1
//! - `Down`: direction high (low if inverted), step, position -1
//! - `Hold`: nothing
//!
//! The direction line is only re-driven when the resolved level changes,
//! which keeps the direction setup time off the common path. The driver
//! remembers the last level it wrote, so it must be the only writer of the
//! direction line. An integration that shares DIR with another stepper
//! engine needs a [`StepOutput`] that restores the line itself.

use crate::config::JogConfig;
use crate::state::{JogCommand, ThcShared};
use crate::traits::StepOutput;

/// Jog driver for the height axis
///
/// Owns the axis direction line exclusively; the first step always drives
/// it, later steps only on a reversal.
pub struct AxisJogDriver<O> {
    output: O,
    inverted: bool,
    direction_level: Option<bool>,
}

impl<O: StepOutput> AxisJogDriver<O> {
    /// Create a new jog driver
    ///
    /// Direction polarity is resolved once from the host's invert mask.
    pub fn new(output: O, config: &JogConfig) -> Self {
        Self {
            output,
            inverted: config.direction_inverted(),
            direction_level: None,
        }
    }

    /// Get access to the underlying step output
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Service one timer tick
    ///
    /// Returns the direction stepped, or `Hold` if no pulse was emitted.
    pub fn tick(&mut self, shared: &ThcShared) -> JogCommand {
        let command = shared.jog.get();

        match command {
            JogCommand::Up => {
                self.drive_direction(self.inverted);
                self.output.step_pulse();
                shared.position.increment();
            }
            JogCommand::Down => {
                self.drive_direction(!self.inverted);
                self.output.step_pulse();
                shared.position.decrement();
            }
            JogCommand::Hold => {}
        }

        command
    }

    fn drive_direction(&mut self, high: bool) {
        if self.direction_level != Some(high) {
            self.output.set_direction(high);
            self.direction_level = Some(high);
        }
    }
}
