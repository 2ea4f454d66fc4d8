//! Fixed-rate tick service
//!
//! Owns the hardware tick source behind the jog interrupt. Each firing runs
//! the jog driver, re-arms the timer and advances the shared tick clock.
//! Once set up the service runs for the lifetime of the firmware; there is
//! no stop operation.

use crate::config::TimerConfig;
use crate::motion::AxisJogDriver;
use crate::state::{JogCommand, ThcShared};
use crate::traits::{StepOutput, TickSource};

/// Periodic tick service
pub struct TimerService<T> {
    source: T,
    config: TimerConfig,
}

impl<T: TickSource> TimerService<T> {
    /// Create a new timer service (the source is not configured yet)
    pub fn new(source: T, config: TimerConfig) -> Self {
        Self { source, config }
    }

    /// One-time setup of the periodic interrupt
    pub fn setup(&mut self) {
        self.source.configure(self.config.period_us());
    }

    /// Timer configuration
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Get mutable access to the underlying tick source
    pub fn source_mut(&mut self) -> &mut T {
        &mut self.source
    }

    /// Service one timer firing
    ///
    /// The jog step goes out before the timer is re-armed, and the clock
    /// advances last.
    pub fn on_interrupt<O: StepOutput>(
        &mut self,
        jog: &mut AxisJogDriver<O>,
        shared: &ThcShared,
    ) -> JogCommand {
        let stepped = jog.tick(shared);
        self.source.reload();
        self.source.clear_pending();
        shared.clock.increment();
        stepped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JogConfig;
    use core::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Configure(u32),
        Reload,
        ClearPending,
        Dir(bool),
        Step,
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct MockSource(Log);

    impl TickSource for MockSource {
        fn configure(&mut self, period_us: u32) {
            self.0.borrow_mut().push(Event::Configure(period_us));
        }

        fn reload(&mut self) {
            self.0.borrow_mut().push(Event::Reload);
        }

        fn clear_pending(&mut self) {
            self.0.borrow_mut().push(Event::ClearPending);
        }
    }

    struct MockOutput(Log);

    impl StepOutput for MockOutput {
        fn set_direction(&mut self, high: bool) {
            self.0.borrow_mut().push(Event::Dir(high));
        }

        fn step_pulse(&mut self) {
            self.0.borrow_mut().push(Event::Step);
        }
    }

    fn fixture(tick_hz: u32) -> (TimerService<MockSource>, AxisJogDriver<MockOutput>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let timer = TimerService::new(MockSource(log.clone()), TimerConfig { tick_hz });
        let jog = AxisJogDriver::new(MockOutput(log.clone()), &JogConfig::default());
        (timer, jog, log)
    }

    #[test]
    fn test_setup_configures_period() {
        let (mut timer, _jog, log) = fixture(8000);
        timer.setup();
        assert_eq!(*log.borrow(), [Event::Configure(125)]);
    }

    #[test]
    fn test_interrupt_sequence() {
        let (mut timer, mut jog, log) = fixture(1000);
        let shared = ThcShared::new();
        shared.jog.set(JogCommand::Down);

        let stepped = timer.on_interrupt(&mut jog, &shared);

        assert_eq!(stepped, JogCommand::Down);
        assert_eq!(
            *log.borrow(),
            [
                Event::Dir(true),
                Event::Step,
                Event::Reload,
                Event::ClearPending
            ]
        );
        assert_eq!(shared.now(), 1);
        assert_eq!(shared.position(), -1);
    }

    #[test]
    fn test_clock_counts_every_firing() {
        let (mut timer, mut jog, log) = fixture(1000);
        let shared = ThcShared::new();

        for _ in 0..250 {
            timer.on_interrupt(&mut jog, &shared);
        }

        assert_eq!(shared.now(), 250);
        assert_eq!(shared.position(), 0);
        assert!(!log.borrow().contains(&Event::Step));
    }
}
