//! Arc ignition sequencing
//!
//! `start()` energizes the torch and waits for the arc-ok signal, retrying
//! up to the configured budget. Every wait is an `.await` on an async
//! delay so the executor keeps servicing the host link and other tasks
//! while the torch is firing.
//!
//! Timeouts are countdowns decremented in fixed 100 ms poll steps, so the
//! time spent waiting is always a whole number of polls.

use core::fmt;

use embedded_hal_async::delay::DelayNs;

use super::PlasmaContext;
use crate::config::{seconds_to_ms, ARC_OK_POLL_INTERVAL_MS};
use crate::traits::{Alarm, AlarmSink, ArcOkInput, FeedbackMessage, FeedbackSink, TorchRelay};

/// Ignition failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IgnitionError {
    /// The arc never established; the torch is off and the alarm is raised
    ArcFailed {
        /// Ignition attempts made
        attempts: u8,
    },
}

impl fmt::Display for IgnitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnitionError::ArcFailed { attempts } => {
                write!(f, "arc failed to establish after {attempts} attempt(s)")
            }
        }
    }
}

/// Torch ignition controller
pub struct ArcIgnition<R, A, D> {
    relay: R,
    arc_ok: A,
    delay: D,
}

impl<R, A, D> ArcIgnition<R, A, D>
where
    R: TorchRelay,
    A: ArcOkInput,
    D: DelayNs,
{
    /// Create a new ignition controller
    pub fn new(relay: R, arc_ok: A, delay: D) -> Self {
        Self {
            relay,
            arc_ok,
            delay,
        }
    }

    /// Get access to the torch relay
    pub fn relay(&self) -> &R {
        &self.relay
    }

    /// Fire the torch and establish the arc
    ///
    /// With `arc_retries == 0` the arc is assumed good after a single
    /// attempt and nothing is polled. Otherwise each attempt polls arc-ok
    /// until `arc_fail_timeout` runs out; failed attempts switch the torch
    /// off, report a retry and wait `arc_retry_delay` before firing again.
    ///
    /// When the budget is exhausted the torch is left off, the failure is
    /// reported and [`Alarm::TorchArcFailed`] is raised. The caller must
    /// not re-ignite until the operator resumes.
    pub async fn start<F, S>(
        &mut self,
        ctx: &mut PlasmaContext<'_>,
        feedback: &mut F,
        alarm: &mut S,
    ) -> Result<(), IgnitionError>
    where
        F: FeedbackSink,
        S: AlarmSink,
    {
        let verify = ctx.settings().arc_retries > 0;
        let fail_timeout_ms = seconds_to_ms(ctx.settings().arc_fail_timeout);
        let retry_delay_ms = seconds_to_ms(ctx.settings().arc_retry_delay);
        let thc_delay_ticks = ctx.timer().seconds_to_ticks(ctx.settings().thc_delay);

        let mut retries = ctx.settings().arc_retries;
        let mut attempts: u8 = 0;

        loop {
            attempts = attempts.saturating_add(1);

            self.relay.energize();
            ctx.state_mut().torch_on = true;
            feedback.feedback(FeedbackMessage::TorchOn);

            let arc_ok = if verify {
                self.wait_for_arc(fail_timeout_ms).await
            } else {
                true
            };
            ctx.state_mut().arc_ok = arc_ok;

            if arc_ok {
                feedback.feedback(FeedbackMessage::ArcOk);
                let deadline = ctx.shared().clock.deadline_after(thc_delay_ticks);
                ctx.state_mut().thc_delay_deadline = deadline;
                return Ok(());
            }

            self.relay.deenergize();
            ctx.state_mut().torch_on = false;

            retries = retries.saturating_sub(1);
            if retries == 0 {
                feedback.feedback(FeedbackMessage::ArcFailed);
                alarm.raise(Alarm::TorchArcFailed);
                return Err(IgnitionError::ArcFailed { attempts });
            }

            feedback.feedback(FeedbackMessage::ArcRetry);
            self.delay.delay_ms(retry_delay_ms).await;
        }
    }

    /// Switch the torch off at the end of a cut
    ///
    /// Does nothing if the torch is not on. Otherwise dwells for
    /// `pause_at_end`, de-energizes the relay and clears the torch, arc,
    /// height control and lock flags. The jog request is dropped so the
    /// axis stops stepping immediately.
    pub async fn stop(&mut self, ctx: &mut PlasmaContext<'_>) {
        if !ctx.state().torch_on {
            return;
        }

        let pause = ctx.settings().pause_at_end;
        if pause > 0.0 {
            self.delay.delay_ms(seconds_to_ms(pause)).await;
        }

        self.relay.deenergize();
        ctx.state_mut().clear_torch();
        ctx.shared().jog.clear();
    }

    /// Poll arc-ok until it asserts or the countdown runs out
    ///
    /// Polls at least once, even with a zero timeout.
    async fn wait_for_arc(&mut self, timeout_ms: u32) -> bool {
        let mut remaining = timeout_ms;
        loop {
            self.delay.delay_ms(ARC_OK_POLL_INTERVAL_MS).await;
            if self.arc_ok.arc_ok() {
                return true;
            }

            remaining = remaining.saturating_sub(ARC_OK_POLL_INTERVAL_MS);
            if remaining == 0 {
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThcConfig;
    use crate::control::VoltageFeedback;
    use crate::state::{JogCommand, ThcShared};
    use crate::traits::{ArcVoltageSampler, MotionPlanner, PlannedBlock};
    use core::cell::RefCell;
    use embassy_futures::block_on;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Energize,
        Deenergize,
        ArcOkRead(bool),
        Delay(u32),
        Message(FeedbackMessage),
        Alarm(Alarm),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct MockRelay {
        log: Log,
        energized: bool,
    }

    impl TorchRelay for MockRelay {
        fn energize(&mut self) {
            self.energized = true;
            self.log.borrow_mut().push(Event::Energize);
        }

        fn deenergize(&mut self) {
            self.energized = false;
            self.log.borrow_mut().push(Event::Deenergize);
        }

        fn is_energized(&self) -> bool {
            self.energized
        }
    }

    /// Arc-ok that asserts from the `ok_from`-th read onwards (1-based)
    struct MockArcOk {
        log: Log,
        reads: usize,
        ok_from: Option<usize>,
    }

    impl ArcOkInput for MockArcOk {
        fn arc_ok(&mut self) -> bool {
            self.reads += 1;
            let ok = self.ok_from.is_some_and(|n| self.reads >= n);
            self.log.borrow_mut().push(Event::ArcOkRead(ok));
            ok
        }
    }

    /// Delay that advances the 1 kHz tick clock instead of sleeping
    struct MockDelay<'a> {
        log: Log,
        shared: &'a ThcShared,
    }

    impl DelayNs for MockDelay<'_> {
        async fn delay_ns(&mut self, ns: u32) {
            self.delay_ms(ns / 1_000_000).await;
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(Event::Delay(ms));
            self.shared.clock.advance(ms);
        }
    }

    struct MockHost(Log);

    impl FeedbackSink for MockHost {
        fn feedback(&mut self, message: FeedbackMessage) {
            self.0.borrow_mut().push(Event::Message(message));
        }
    }

    impl AlarmSink for MockHost {
        fn raise(&mut self, alarm: Alarm) {
            self.0.borrow_mut().push(Event::Alarm(alarm));
        }
    }

    /// Arc voltage pinned above the default setpoint
    struct HighArc;

    impl ArcVoltageSampler for HighArc {
        fn raw_sample(&mut self) -> u16 {
            1000
        }
    }

    struct NoPlanner;

    impl MotionPlanner for NoPlanner {
        fn current_block(&self) -> Option<PlannedBlock> {
            None
        }

        fn realtime_rate(&self) -> f32 {
            0.0
        }
    }

    type TestIgnition<'a> = ArcIgnition<MockRelay, MockArcOk, MockDelay<'a>>;

    fn fixture(shared: &ThcShared, ok_from: Option<usize>) -> (TestIgnition<'_>, MockHost, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let ignition = ArcIgnition::new(
            MockRelay {
                log: log.clone(),
                energized: false,
            },
            MockArcOk {
                log: log.clone(),
                reads: 0,
                ok_from,
            },
            MockDelay {
                log: log.clone(),
                shared,
            },
        );
        (ignition, MockHost(log.clone()), log)
    }

    fn count(log: &Log, event: Event) -> usize {
        log.borrow().iter().filter(|e| **e == event).count()
    }

    #[test]
    fn test_retries_exhausted() {
        let shared = ThcShared::new();
        let config = ThcConfig::default();
        let mut ctx = PlasmaContext::new(&config, &shared);
        let (mut ignition, mut host, log) = fixture(&shared, None);
        let mut alarm = MockHost(log.clone());

        let result = block_on(ignition.start(&mut ctx, &mut host, &mut alarm));

        assert_eq!(result, Err(IgnitionError::ArcFailed { attempts: 3 }));
        assert_eq!(count(&log, Event::Energize), 3);
        assert_eq!(count(&log, Event::Deenergize), 3);
        assert_eq!(count(&log, Event::Message(FeedbackMessage::TorchOn)), 3);
        assert_eq!(count(&log, Event::Message(FeedbackMessage::ArcRetry)), 2);
        assert_eq!(count(&log, Event::Message(FeedbackMessage::ArcFailed)), 1);
        assert_eq!(count(&log, Event::Alarm(Alarm::TorchArcFailed)), 1);
        assert_eq!(count(&log, Event::Message(FeedbackMessage::ArcOk)), 0);

        // 1.0 s timeout at 100 ms per poll
        assert_eq!(count(&log, Event::ArcOkRead(false)), 30);
        assert_eq!(count(&log, Event::Delay(100)), 30);
        assert_eq!(count(&log, Event::Delay(1000)), 2);

        assert!(!ignition.relay().is_energized());
        assert!(!ctx.state().torch_on);
        assert!(!ctx.state().arc_ok);

        // Torch is off before the failure is reported
        let events = log.borrow();
        let tail = &events[events.len() - 3..];
        assert_eq!(
            tail,
            [
                Event::Deenergize,
                Event::Message(FeedbackMessage::ArcFailed),
                Event::Alarm(Alarm::TorchArcFailed)
            ]
        );
    }

    #[test]
    fn test_arc_ok_sets_deadline() {
        let shared = ThcShared::new();
        let config = ThcConfig::default();
        let mut ctx = PlasmaContext::new(&config, &shared);
        let (mut ignition, mut host, log) = fixture(&shared, Some(3));
        let mut alarm = MockHost(log.clone());

        let result = block_on(ignition.start(&mut ctx, &mut host, &mut alarm));

        assert_eq!(result, Ok(()));
        assert!(ignition.relay().is_energized());
        assert!(ctx.state().torch_on);
        assert!(ctx.state().arc_ok);
        assert!(!ctx.state().thc_enabled);

        // Three polls elapsed, then the 1.0 s enable delay
        assert_eq!(shared.now(), 300);
        assert_eq!(ctx.state().thc_delay_deadline, 1300);

        let messages: Vec<_> = log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Message(m) => Some(*m),
                _ => None,
            })
            .collect();
        assert_eq!(messages, [FeedbackMessage::TorchOn, FeedbackMessage::ArcOk]);
    }

    #[test]
    fn test_success_on_second_attempt() {
        let shared = ThcShared::new();
        let config = ThcConfig::default();
        let mut ctx = PlasmaContext::new(&config, &shared);
        let (mut ignition, mut host, log) = fixture(&shared, Some(12));
        let mut alarm = MockHost(log.clone());

        let result = block_on(ignition.start(&mut ctx, &mut host, &mut alarm));

        assert_eq!(result, Ok(()));
        assert_eq!(count(&log, Event::Energize), 2);
        assert_eq!(count(&log, Event::Message(FeedbackMessage::ArcRetry)), 1);
        assert_eq!(count(&log, Event::Message(FeedbackMessage::ArcOk)), 1);
        assert_eq!(count(&log, Event::Alarm(Alarm::TorchArcFailed)), 0);
        assert!(ctx.state().torch_on);
    }

    #[test]
    fn test_zero_retries_assumes_arc() {
        let shared = ThcShared::new();
        let mut config = ThcConfig::default();
        config.plasma.arc_retries = 0;
        let mut ctx = PlasmaContext::new(&config, &shared);
        let (mut ignition, mut host, log) = fixture(&shared, None);
        let mut alarm = MockHost(log.clone());

        let result = block_on(ignition.start(&mut ctx, &mut host, &mut alarm));

        assert_eq!(result, Ok(()));
        assert_eq!(
            *log.borrow(),
            [
                Event::Energize,
                Event::Message(FeedbackMessage::TorchOn),
                Event::Message(FeedbackMessage::ArcOk)
            ]
        );
        assert!(ctx.state().arc_ok);
        assert_eq!(ctx.state().thc_delay_deadline, 1000);
    }

    #[test]
    fn test_single_retry_budget_fails_without_retry() {
        let shared = ThcShared::new();
        let mut config = ThcConfig::default();
        config.plasma.arc_retries = 1;
        config.plasma.arc_fail_timeout = 0.25;
        let mut ctx = PlasmaContext::new(&config, &shared);
        let (mut ignition, mut host, log) = fixture(&shared, None);
        let mut alarm = MockHost(log.clone());

        let result = block_on(ignition.start(&mut ctx, &mut host, &mut alarm));

        assert_eq!(result, Err(IgnitionError::ArcFailed { attempts: 1 }));
        assert_eq!(count(&log, Event::Message(FeedbackMessage::ArcRetry)), 0);
        // 250 ms countdown: 250 -> 150 -> 50 -> 0
        assert_eq!(count(&log, Event::ArcOkRead(false)), 3);
    }

    #[test]
    fn test_deadline_follows_tick_rate() {
        let shared = ThcShared::new();
        let mut config = ThcConfig::default();
        config.plasma.arc_retries = 0;
        config.plasma.thc_delay = 0.5;
        config.timer.tick_hz = 8000;
        let mut ctx = PlasmaContext::new(&config, &shared);
        let (mut ignition, mut host, log) = fixture(&shared, None);
        let mut alarm = MockHost(log.clone());

        block_on(ignition.start(&mut ctx, &mut host, &mut alarm)).unwrap();

        assert_eq!(ctx.state().thc_delay_deadline, 4000);
    }

    #[test]
    fn test_huge_thc_delay_never_enables_early() {
        let shared = ThcShared::new();
        let mut config = ThcConfig::default();
        config.plasma.arc_retries = 0;
        config.plasma.thc_delay = 1.0e7;
        let mut ctx = PlasmaContext::new(&config, &shared);
        let (mut ignition, mut host, log) = fixture(&shared, None);
        let mut alarm = MockHost(log.clone());
        let mut feedback = VoltageFeedback::new(HighArc, NoPlanner);

        block_on(ignition.start(&mut ctx, &mut host, &mut alarm)).unwrap();

        for _ in 0..1000 {
            shared.clock.increment();
            assert_eq!(feedback.update(&mut ctx, &mut host), JogCommand::Hold);
            assert!(!ctx.state().thc_enabled);
        }
        assert_eq!(count(&log, Event::Message(FeedbackMessage::ThcEnabled)), 0);
    }

    #[test]
    fn test_enable_once_per_ignition_cycle() {
        let shared = ThcShared::new();
        let mut config = ThcConfig::default();
        config.plasma.arc_retries = 0;
        config.plasma.thc_delay = 0.05;
        let mut ctx = PlasmaContext::new(&config, &shared);
        let (mut ignition, mut host, log) = fixture(&shared, None);
        let mut alarm = MockHost(log.clone());
        let mut feedback = VoltageFeedback::new(HighArc, NoPlanner);

        for cycle in 1..=2 {
            block_on(ignition.start(&mut ctx, &mut host, &mut alarm)).unwrap();
            let deadline = ctx.state().thc_delay_deadline;

            while shared.now() != deadline {
                feedback.update(&mut ctx, &mut host);
                assert!(!ctx.state().thc_enabled);
                shared.clock.increment();
            }
            for _ in 0..20 {
                feedback.update(&mut ctx, &mut host);
                assert!(ctx.state().thc_enabled);
                shared.clock.increment();
            }
            assert_eq!(shared.jog.get(), JogCommand::Down);
            assert_eq!(
                count(&log, Event::Message(FeedbackMessage::ThcEnabled)),
                cycle
            );

            block_on(ignition.stop(&mut ctx));
            assert!(!ctx.state().thc_enabled);
            assert_eq!(feedback.update(&mut ctx, &mut host), JogCommand::Hold);
            shared.clock.advance(500);
        }
    }

    #[test]
    fn test_stop_when_torch_off_is_noop() {
        let shared = ThcShared::new();
        let mut config = ThcConfig::default();
        config.plasma.pause_at_end = 2.0;
        let mut ctx = PlasmaContext::new(&config, &shared);
        ctx.set_void_lock(true);
        let before = *ctx.state();
        let (mut ignition, _host, log) = fixture(&shared, None);

        block_on(ignition.stop(&mut ctx));

        assert!(log.borrow().is_empty());
        assert_eq!(*ctx.state(), before);
    }

    #[test]
    fn test_stop_pauses_before_torch_off() {
        let shared = ThcShared::new();
        let mut config = ThcConfig::default();
        config.plasma.arc_retries = 0;
        config.plasma.pause_at_end = 2.0;
        let mut ctx = PlasmaContext::new(&config, &shared);
        let (mut ignition, mut host, log) = fixture(&shared, None);
        let mut alarm = MockHost(log.clone());

        block_on(ignition.start(&mut ctx, &mut host, &mut alarm)).unwrap();
        ctx.state_mut().thc_enabled = true;
        ctx.state_mut().vad_lock = true;
        ctx.set_void_lock(true);
        shared.jog.set(JogCommand::Up);
        log.borrow_mut().clear();

        block_on(ignition.stop(&mut ctx));

        assert_eq!(*log.borrow(), [Event::Delay(2000), Event::Deenergize]);
        let state = ctx.state();
        assert!(!state.torch_on);
        assert!(!state.arc_ok);
        assert!(!state.thc_enabled);
        assert!(!state.vad_lock);
        assert!(!state.void_lock);
        assert_eq!(shared.jog.get(), JogCommand::Hold);
        assert!(!ignition.relay().is_energized());
    }

    #[test]
    fn test_stop_without_pause_is_immediate() {
        let shared = ThcShared::new();
        let mut config = ThcConfig::default();
        config.plasma.arc_retries = 0;
        let mut ctx = PlasmaContext::new(&config, &shared);
        let (mut ignition, mut host, log) = fixture(&shared, None);
        let mut alarm = MockHost(log.clone());

        block_on(ignition.start(&mut ctx, &mut host, &mut alarm)).unwrap();
        log.borrow_mut().clear();

        block_on(ignition.stop(&mut ctx));

        assert_eq!(*log.borrow(), [Event::Deenergize]);
        assert!(!ctx.state().torch_on);
    }

    #[test]
    fn test_error_display() {
        let err = IgnitionError::ArcFailed { attempts: 3 };
        assert_eq!(
            format!("{err}"),
            "arc failed to establish after 3 attempt(s)"
        );
    }
}
