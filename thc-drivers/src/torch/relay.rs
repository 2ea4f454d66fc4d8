//! GPIO torch relay output
//!
//! Drives the plasma pilot relay (or an SSR/optocoupler in front of it)
//! from a single GPIO.

use embedded_hal::digital::OutputPin;
use thc_core::traits::TorchRelay;

/// GPIO torch relay
///
/// The pin can be configured as active-high (default) or active-low.
/// Pin errors are ignored; the logical state always follows the command
/// so the controller never believes a torch is off that it asked to
/// switch on, or the reverse.
pub struct GpioTorchRelay<P> {
    pin: P,
    /// If true, torch ON = pin LOW
    inverted: bool,
    /// Current logical state (true = torch on)
    energized: bool,
}

impl<P: OutputPin> GpioTorchRelay<P> {
    /// Create a new relay output, starting de-energized
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin driving the relay
    /// - `inverted`: If true, the torch fires when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut relay = Self {
            pin,
            inverted,
            energized: false,
        };
        relay.drive(false);
        relay
    }

    /// Create a relay output with an active-high pin
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a relay output with an active-low pin
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    fn drive(&mut self, on: bool) {
        self.energized = on;
        let _ = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }
}

impl<P: OutputPin> TorchRelay for GpioTorchRelay<P> {
    fn energize(&mut self) {
        self.drive(true);
    }

    fn deenergize(&mut self) {
        self.drive(false);
    }

    fn is_energized(&self) -> bool {
        self.energized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }
    }

    #[test]
    fn test_active_high_relay() {
        let mut relay = GpioTorchRelay::new_active_high(MockPin { high: true });

        // Forced off at construction
        assert!(!relay.is_energized());
        assert!(!relay.pin.high);

        relay.energize();
        assert!(relay.is_energized());
        assert!(relay.pin.high);

        relay.deenergize();
        assert!(!relay.is_energized());
        assert!(!relay.pin.high);
    }

    #[test]
    fn test_active_low_relay() {
        let mut relay = GpioTorchRelay::new_active_low(MockPin { high: false });

        assert!(!relay.is_energized());
        assert!(relay.pin.high);

        relay.energize();
        assert!(!relay.pin.high);

        relay.deenergize();
        assert!(relay.pin.high);
    }
}
