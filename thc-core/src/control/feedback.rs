//! Arc-voltage height feedback
//!
//! A two-state (bang-bang) controller. Each cycle it samples the arc
//! voltage, decides whether correction is allowed, and publishes a jog
//! request for the interrupt-side driver:
//!
//! 1. Scale, offset and clamp the raw sample into [0, 255]
//! 2. Master disable forces everything off
//! 3. Enable once the arc is up and the enable delay has passed
//! 4. Velocity-adaptive lock against the planner's programmed feed
//! 5. Jog toward the setpoint when outside the dead band

use super::PlasmaContext;
use crate::state::JogCommand;
use crate::traits::{ArcVoltageSampler, FeedbackMessage, FeedbackSink, MotionPlanner};

/// Fraction of programmed feed above which the VAD lock releases
const VAD_RELEASE_RATIO: f32 = 0.99;

/// Map a raw sample to clamped voltage units
///
/// `raw / full_scale * scale + offset`, saturated to [0, 255] and truncated.
pub fn scale_voltage(raw: u16, full_scale: u16, scale: f32, offset: f32) -> u8 {
    let normalized = raw as f32 / full_scale.max(1) as f32;
    let volts = normalized * scale + offset;
    // NaN saturates to 0
    volts.clamp(0.0, u8::MAX as f32) as u8
}

/// Bang-bang jog decision with an inclusive dead band
///
/// Voltage above the band means the torch is too high (jog down); below the
/// band means it is too low (jog up).
pub fn jog_decision(voltage: u8, setpoint: u8, hysteresis: u8) -> JogCommand {
    let error = voltage as i16 - setpoint as i16;
    if error.abs() <= hysteresis as i16 {
        JogCommand::Hold
    } else if error > 0 {
        JogCommand::Down
    } else {
        JogCommand::Up
    }
}

/// Voltage feedback controller
pub struct VoltageFeedback<V, P> {
    sampler: V,
    planner: P,
}

impl<V: ArcVoltageSampler, P: MotionPlanner> VoltageFeedback<V, P> {
    /// Create a new feedback controller
    pub fn new(sampler: V, planner: P) -> Self {
        Self { sampler, planner }
    }

    /// Get mutable access to the voltage sampler
    pub fn sampler_mut(&mut self) -> &mut V {
        &mut self.sampler
    }

    /// Get mutable access to the planner view
    pub fn planner_mut(&mut self) -> &mut P {
        &mut self.planner
    }

    /// Run one control cycle and return the published jog request
    pub fn update<F: FeedbackSink>(
        &mut self,
        ctx: &mut PlasmaContext<'_>,
        feedback: &mut F,
    ) -> JogCommand {
        let settings = ctx.settings();
        let master_enabled = settings.thc_enabled;
        let vad_threshold = settings.vad_threshold;
        let setpoint = settings.arc_voltage_setpoint;
        let hysteresis = settings.arc_voltage_hysteresis;
        let voltage = scale_voltage(
            self.sampler.raw_sample(),
            self.sampler.full_scale(),
            settings.arc_voltage_scale,
            settings.arc_voltage_offset,
        );

        let shared = ctx.shared();
        let state = ctx.state_mut();
        state.arc_voltage = voltage;

        if !master_enabled {
            state.thc_enabled = false;
            shared.jog.clear();
            return JogCommand::Hold;
        }

        if state.arc_ok && !state.thc_enabled && shared.clock.has_reached(state.thc_delay_deadline)
        {
            state.thc_enabled = true;
            feedback.feedback(FeedbackMessage::ThcEnabled);
        }

        if state.thc_enabled {
            if let Some(block) = self.planner.current_block() {
                let realtime = self.planner.realtime_rate();
                if realtime < block.programmed_rate * vad_threshold as f32 / 100.0 {
                    state.vad_lock = true;
                }
                if realtime > block.programmed_rate * VAD_RELEASE_RATIO {
                    state.vad_lock = false;
                }
            }
        }

        let command = if !state.thc_enabled || state.is_locked() {
            JogCommand::Hold
        } else {
            jog_decision(voltage, setpoint, hysteresis)
        };

        shared.jog.set(command);
        command
    }
}
