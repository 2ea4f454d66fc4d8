//! Motion planner view used for velocity-adaptive locking

/// The block currently being executed by the host planner
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlannedBlock {
    /// Feed rate programmed for this block (host units, e.g. mm/min)
    pub programmed_rate: f32,
}

/// Trait for the host motion planner
pub trait MotionPlanner {
    /// Block currently executing, or `None` when the planner is idle
    fn current_block(&self) -> Option<PlannedBlock>;

    /// Actual feed rate right now, in the same units as `programmed_rate`
    fn realtime_rate(&self) -> f32;
}
