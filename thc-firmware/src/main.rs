//! Plasma THC - Torch Height Control Firmware
//!
//! Main firmware binary for RP2040-based plasma table controllers.
//! Fires the torch on the host's cut request, verifies the arc, and holds
//! torch standoff by jogging Z against the measured arc voltage.
//!
//! Two priority levels:
//! - jog tick on an interrupt executor (preempts everything else)
//! - control loop and host link on the thread executor

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::adc::{self, Adc, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUartTx, Config as UartConfig};
use embassy_time::{Delay, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use thc_core::config::ThcConfig;
use thc_core::motion::AxisJogDriver;
use thc_core::timer::TimerService;
use thc_drivers::stepper::{GpioStepOutput, StepTiming};

use crate::channels::SHARED;

mod channels;
mod config;
mod host;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

/// High-priority executor for the jog tick
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

// Static cells for data that must live forever
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static CONFIG: StaticCell<ThcConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Plasma THC firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static ThcConfig = CONFIG.init(config::load());
    info!(
        "Config: setpoint={} hysteresis={} retries={} vad={}% tick={}Hz",
        config.plasma.arc_voltage_setpoint,
        config.plasma.arc_voltage_hysteresis,
        config.plasma.arc_retries,
        config.plasma.vad_threshold,
        config.timer.tick_hz
    );

    // Host link, TX only (115200 baud default)
    // Pin assignment is board-specific (SKR Pico TX: GPIO0)
    let tx_buf = TX_BUF.init([0u8; 256]);
    let tx = BufferedUartTx::new(p.UART0, Irqs, p.PIN_0, tx_buf, UartConfig::default());
    info!("UART initialized for host feedback");

    // Z axis step/dir
    // Pin assignments are board-specific (SKR Pico Z: STEP=GPIO19, DIR=GPIO28)
    let step_pin = Output::new(p.PIN_19, Level::Low);
    let dir_pin = Output::new(p.PIN_28, Level::Low);
    let step_output = GpioStepOutput::new(step_pin, dir_pin, Delay, StepTiming::from(&config.jog));
    let jog = AxisJogDriver::new(step_output, &config.jog);
    let timer = TimerService::new(tasks::TickerSource::new(), config.timer);

    // Torch relay, arc-ok, cut request and THC lock
    // Pin assignments are board-specific (SKR Pico HE0=GPIO23, endstops GPIO4/3/25)
    let arc_ok_pull = if config.arc_ok.pull_up {
        Pull::Up
    } else {
        Pull::None
    };
    let pins = tasks::ControlPins {
        torch: Output::new(p.PIN_23, Level::Low),
        arc_ok: Input::new(p.PIN_4, arc_ok_pull),
        cut_request: Input::new(p.PIN_3, Pull::Up),
        thc_lock: Input::new(p.PIN_25, Pull::Up),
        adc: Adc::new(p.ADC, Irqs, adc::Config::default()),
        // Arc voltage divider on TH0 (GPIO27)
        arc_voltage: adc::Channel::new_pin(p.PIN_27, Pull::None),
    };
    info!("Torch I/O and ADC initialized");

    // Jog tick preempts the control loop
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high_spawner.spawn(tasks::tick_task(timer, jog)).unwrap();

    spawner.spawn(tasks::host_tx_task(tx)).unwrap();
    spawner.spawn(tasks::control_task(config, pins)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        Timer::after_secs(10).await;
        debug!(
            "Heartbeat: uptime={} ms z={}",
            config.timer.ticks_to_ms(SHARED.now()),
            SHARED.position()
        );
    }
}
