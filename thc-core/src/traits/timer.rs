//! Periodic tick source trait

/// Trait for the hardware timer behind the jog interrupt
pub trait TickSource {
    /// Configure the timer to fire every `period_us` and enable its interrupt
    fn configure(&mut self, period_us: u32);

    /// Reload the countdown so the next firing keeps the configured period
    fn reload(&mut self);

    /// Acknowledge the pending interrupt
    fn clear_pending(&mut self);
}
