//! Torch control
//!
//! Arc ignition sequencing and the arc-voltage height feedback loop. Both
//! operate on a single [`PlasmaContext`] owned by the background control
//! loop; hardware and host collaborators are injected through the traits
//! in [`crate::traits`].

pub mod feedback;
pub mod ignition;

pub use feedback::{jog_decision, scale_voltage, VoltageFeedback};
pub use ignition::{ArcIgnition, IgnitionError};

use crate::config::{PlasmaSettings, ThcConfig, TimerConfig};
use crate::state::{PlasmaState, ThcShared};

/// Control-loop context
///
/// Holds the loaded settings, the runtime state and a reference to the
/// words shared with the jog interrupt.
#[derive(Debug)]
pub struct PlasmaContext<'a> {
    settings: PlasmaSettings,
    timer: TimerConfig,
    state: PlasmaState,
    shared: &'a ThcShared,
}

impl<'a> PlasmaContext<'a> {
    /// Create a context with all runtime flags cleared and the axis holding
    pub fn new(config: &ThcConfig, shared: &'a ThcShared) -> Self {
        shared.jog.clear();
        Self {
            settings: config.plasma.clone(),
            timer: config.timer,
            state: PlasmaState::new(),
            shared,
        }
    }

    /// Loaded torch settings
    pub fn settings(&self) -> &PlasmaSettings {
        &self.settings
    }

    /// Tick clock configuration
    pub fn timer(&self) -> &TimerConfig {
        &self.timer
    }

    /// Snapshot of the runtime state
    pub fn state(&self) -> &PlasmaState {
        &self.state
    }

    /// State shared with the jog interrupt
    pub fn shared(&self) -> &'a ThcShared {
        self.shared
    }

    /// Assert or release the external correction lock
    pub fn set_void_lock(&mut self, locked: bool) {
        self.state.void_lock = locked;
    }

    pub(crate) fn state_mut(&mut self) -> &mut PlasmaState {
        &mut self.state
    }
}
