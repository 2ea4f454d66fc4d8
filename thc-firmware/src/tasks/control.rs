//! Torch control task
//!
//! Owns the plasma context. Every control interval it:
//! - follows the host's cut request (ignite on assert, stop on release)
//! - samples the arc voltage ADC
//! - mirrors the THC lock input into the void lock
//! - runs one voltage feedback cycle
//!
//! After an arc failure the alarm latch blocks re-ignition until the cut
//! request is released.

use defmt::*;
use embassy_rp::adc::{self, Adc, Async};
use embassy_rp::gpio::{Input, Output};
use embassy_time::{Delay, Duration, Ticker};
use thc_core::config::ThcConfig;
use thc_core::control::{ArcIgnition, VoltageFeedback};
use thc_core::PlasmaContext;
use thc_drivers::sensor::LatchedSample;
use thc_drivers::torch::{GpioArcOk, GpioTorchRelay};

use crate::channels::SHARED;
use crate::host::{AlarmLatch, ChannelFeedback, StandalonePlanner};

/// Board I/O owned by the control task
pub struct ControlPins {
    /// Torch relay output (active high)
    pub torch: Output<'static>,
    /// Arc-ok input from the plasma cutter
    pub arc_ok: Input<'static>,
    /// Cut request from the CNC host (active low)
    pub cut_request: Input<'static>,
    /// External THC lock (active low)
    pub thc_lock: Input<'static>,
    /// ADC for the arc voltage divider
    pub adc: Adc<'static, Async>,
    /// Arc voltage ADC channel
    pub arc_voltage: adc::Channel<'static>,
}

/// Control task - ignition, stop and height feedback
#[embassy_executor::task]
pub async fn control_task(config: &'static ThcConfig, pins: ControlPins) {
    info!("Control task started");

    let ControlPins {
        torch,
        arc_ok,
        cut_request,
        thc_lock,
        mut adc,
        mut arc_voltage,
    } = pins;

    let mut ctx = PlasmaContext::new(config, &SHARED);
    let mut ignition = ArcIgnition::new(
        GpioTorchRelay::new_active_high(torch),
        GpioArcOk::new(arc_ok, &config.arc_ok),
        Delay,
    );
    let mut feedback = VoltageFeedback::new(LatchedSample::adc_12bit(), StandalonePlanner);
    let mut host = ChannelFeedback;
    let mut alarm = AlarmLatch::new();

    let mut ticker = Ticker::every(Duration::from_millis(
        config.control.update_interval_ms as u64,
    ));

    loop {
        ticker.next().await;

        let cut_requested = cut_request.is_low();

        if alarm.is_latched() {
            if !cut_requested {
                alarm.resume();
            }
        } else if cut_requested && !ctx.state().torch_on {
            info!("Cut requested, firing torch");
            match ignition.start(&mut ctx, &mut host, &mut alarm).await {
                Ok(()) => info!(
                    "Arc established, THC in {} ms",
                    config
                        .timer
                        .ticks_to_ms(ctx.state().thc_delay_deadline.wrapping_sub(SHARED.now()))
                ),
                Err(e) => error!("Ignition failed: {}", Display2Format(&e)),
            }
            ticker.reset();
        } else if !cut_requested && ctx.state().torch_on {
            ignition.stop(&mut ctx).await;
            info!("Torch off, Z at {} steps", SHARED.position());
            ticker.reset();
        }

        ctx.set_void_lock(thc_lock.is_low());

        match adc.read(&mut arc_voltage).await {
            Ok(raw) => feedback.sampler_mut().latch(raw),
            Err(e) => warn!("Arc voltage read failed: {:?}", Debug2Format(&e)),
        }

        let command = feedback.update(&mut ctx, &mut host);
        trace!(
            "arc={} thc={} lock={} jog={:?}",
            ctx.state().arc_voltage,
            ctx.state().thc_enabled,
            ctx.state().is_locked(),
            command
        );
    }
}
