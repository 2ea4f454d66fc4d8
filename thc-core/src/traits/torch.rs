//! Torch relay and arc-ok input traits

/// Trait for the torch (plasma pilot) relay output
///
/// Implementations drive a GPIO, SSR, or the host's spindle output.
pub trait TorchRelay {
    /// Energize the relay (torch on)
    fn energize(&mut self);

    /// De-energize the relay (torch off)
    fn deenergize(&mut self);

    /// Check if the relay is currently energized
    fn is_energized(&self) -> bool;
}

/// Trait for the plasma cutter's arc-ok (transfer) signal
///
/// Implementations resolve the electrical polarity, so `true` always
/// means a stable arc has been established.
pub trait ArcOkInput {
    /// Read the arc-ok signal
    ///
    /// Takes `&mut self` because pin reads may require mutable access.
    fn arc_ok(&mut self) -> bool;
}
