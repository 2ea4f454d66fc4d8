//! Jog tick task
//!
//! Runs on the high-priority interrupt executor so stepping preempts the
//! control loop. Each tick services the timer and emits at most one Z
//! step.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Delay, Duration, Ticker};
use thc_core::motion::AxisJogDriver;
use thc_core::state::JogCommand;
use thc_core::timer::TimerService;
use thc_core::traits::TickSource;
use thc_drivers::stepper::GpioStepOutput;

use crate::channels::SHARED;

/// Z step/dir output driven from the tick task
pub type JogOutput = GpioStepOutput<Output<'static>, Output<'static>, Delay>;

/// Tick source backed by an embassy `Ticker`
///
/// The ticker schedules each deadline from the previous one and its alarm
/// interrupt is acknowledged by the time driver, so reload and
/// acknowledge have nothing left to do.
pub struct TickerSource {
    ticker: Option<Ticker>,
}

impl TickerSource {
    /// Create an unconfigured source
    pub const fn new() -> Self {
        Self { ticker: None }
    }

    /// Wait for the next tick
    pub async fn wait(&mut self) {
        match self.ticker.as_mut() {
            Some(ticker) => ticker.next().await,
            None => core::future::pending().await,
        }
    }
}

impl TickSource for TickerSource {
    fn configure(&mut self, period_us: u32) {
        self.ticker = Some(Ticker::every(Duration::from_micros(period_us as u64)));
    }

    fn reload(&mut self) {}

    fn clear_pending(&mut self) {}
}

/// Tick task - services the jog timer forever
#[embassy_executor::task]
pub async fn tick_task(mut timer: TimerService<TickerSource>, mut jog: AxisJogDriver<JogOutput>) {
    let timing = jog.output().timing();
    info!(
        "Tick task started: {} Hz ({} us), dir setup {} us, step pulse {} us",
        timer.config().tick_hz,
        timer.config().period_us(),
        timing.dir_setup_us,
        timing.step_pulse_us
    );

    timer.setup();

    loop {
        timer.source_mut().wait().await;

        if timer.on_interrupt(&mut jog, &SHARED) != JogCommand::Hold {
            trace!("Z step, position {}", SHARED.position());
        }
    }
}
