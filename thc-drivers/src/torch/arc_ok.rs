//! GPIO arc-ok input
//!
//! Most plasma cutters report arc transfer through a dry contact that
//! pulls the line low against the controller's pull-up. Machines with an
//! active-high output need an external pull-down and `active_low = false`.

use embedded_hal::digital::InputPin;
use thc_core::config::ArcOkConfig;
use thc_core::traits::ArcOkInput;

/// GPIO arc-ok input with configurable polarity
///
/// A failed pin read counts as "no arc".
pub struct GpioArcOk<P> {
    pin: P,
    active_low: bool,
}

impl<P: InputPin> GpioArcOk<P> {
    /// Create a new arc-ok input
    ///
    /// Pull resistors are the caller's job when the pin is created; use
    /// [`ArcOkConfig::pull_up`] to pick them.
    pub fn new(pin: P, config: &ArcOkConfig) -> Self {
        Self {
            pin,
            active_low: config.active_low,
        }
    }
}

impl<P: InputPin> ArcOkInput for GpioArcOk<P> {
    fn arc_ok(&mut self) -> bool {
        let level = if self.active_low {
            self.pin.is_low()
        } else {
            self.pin.is_high()
        };
        level.unwrap_or(false)
    }
}
