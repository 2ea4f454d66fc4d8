//! Control-loop runtime state

/// Torch and height control state owned by the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlasmaState {
    /// Last computed arc voltage, clamped to [0, 255]
    pub arc_voltage: u8,
    /// Torch relay is energized
    pub torch_on: bool,
    /// Arc established (verified or assumed)
    pub arc_ok: bool,
    /// Height correction is active
    pub thc_enabled: bool,
    /// Velocity-adaptive lock: feed is too slow for correction
    pub vad_lock: bool,
    /// Externally asserted correction lock
    pub void_lock: bool,
    /// Tick at which height control may engage
    pub thc_delay_deadline: u32,
}

impl PlasmaState {
    /// Create the initial state (all flags cleared)
    pub const fn new() -> Self {
        Self {
            arc_voltage: 0,
            torch_on: false,
            arc_ok: false,
            thc_enabled: false,
            vad_lock: false,
            void_lock: false,
            thc_delay_deadline: 0,
        }
    }

    /// Clear everything the end of a cut invalidates
    ///
    /// The last voltage reading and the deadline are left as they are.
    pub fn clear_torch(&mut self) {
        self.torch_on = false;
        self.arc_ok = false;
        self.thc_enabled = false;
        self.vad_lock = false;
        self.void_lock = false;
    }

    /// Whether any lock currently suppresses correction
    pub fn is_locked(&self) -> bool {
        self.vad_lock || self.void_lock
    }
}
