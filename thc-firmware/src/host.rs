//! Host-side collaborators for a standalone controller
//!
//! Feedback and alarms are queued for the UART link. There is no motion
//! planner on this board, so velocity-adaptive locking never engages.

use defmt::*;
use thc_core::traits::{
    Alarm, AlarmSink, FeedbackMessage, FeedbackSink, MotionPlanner, PlannedBlock,
};

use crate::channels::{HostLine, HOST_CHANNEL};

fn queue(line: HostLine) {
    if HOST_CHANNEL.try_send(line).is_err() {
        warn!("Host channel full, dropping {:?}", line);
    }
}

/// Feedback sink that queues `[MSG:...]` lines for the host
pub struct ChannelFeedback;

impl FeedbackSink for ChannelFeedback {
    fn feedback(&mut self, message: FeedbackMessage) {
        info!("{}", message.text());
        queue(HostLine::Message(message));
    }
}

/// Alarm sink that reports to the host and holds off re-ignition
///
/// Once raised, the latch stays set until the operator releases the cut
/// request, which is this board's resume action.
#[derive(Debug, Default)]
pub struct AlarmLatch {
    latched: Option<Alarm>,
}

impl AlarmLatch {
    /// Create a cleared latch
    pub const fn new() -> Self {
        Self { latched: None }
    }

    /// Whether an alarm is pending operator resume
    pub fn is_latched(&self) -> bool {
        self.latched.is_some()
    }

    /// Clear the latch on operator resume
    pub fn resume(&mut self) {
        if let Some(alarm) = self.latched.take() {
            info!("Resumed after {}", alarm.name());
        }
    }
}

impl AlarmSink for AlarmLatch {
    fn raise(&mut self, alarm: Alarm) {
        error!("ALARM: {}", alarm.name());
        self.latched = Some(alarm);
        queue(HostLine::Alarm(alarm));
    }
}

/// Planner view for a controller without access to the host's block queue
pub struct StandalonePlanner;

impl MotionPlanner for StandalonePlanner {
    fn current_block(&self) -> Option<PlannedBlock> {
        None
    }

    fn realtime_rate(&self) -> f32 {
        0.0
    }
}
