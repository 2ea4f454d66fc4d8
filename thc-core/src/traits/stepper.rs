//! Step/direction output trait for the jogged axis

/// Trait for the height axis step and direction lines
///
/// Called from interrupt context, so implementations must not block for
/// longer than the configured pulse timing.
///
/// `set_direction` is only called when the jog driver's remembered level
/// changes. If anything else drives the same direction pin, the
/// implementation must put the level back before `step_pulse`.
pub trait StepOutput {
    /// Drive the direction line to `high`
    ///
    /// Implementations wait out the direction setup time before returning,
    /// so the next step pulse sees a settled line.
    fn set_direction(&mut self, high: bool);

    /// Emit a single step pulse of the configured minimum width
    fn step_pulse(&mut self);
}
