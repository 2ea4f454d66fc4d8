//! Inter-task communication
//!
//! Static state shared between the tick interrupt task, the control task
//! and the host link.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use thc_core::traits::{Alarm, FeedbackMessage};
use thc_core::ThcShared;

/// Channel capacity for outgoing host lines
const HOST_CHANNEL_SIZE: usize = 8;

/// A line queued for the host link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostLine {
    /// `[MSG:...]` feedback
    Message(FeedbackMessage),
    /// `ALARM:...` report
    Alarm(Alarm),
}

/// Jog flags, axis position and tick clock
///
/// Written from the tick interrupt task and the control task, one writer
/// per field.
pub static SHARED: ThcShared = ThcShared::new();

/// Lines waiting to be written to the host UART
pub static HOST_CHANNEL: Channel<CriticalSectionRawMutex, HostLine, HOST_CHANNEL_SIZE> =
    Channel::new();

impl core::fmt::Display for HostLine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HostLine::Message(message) => message.fmt(f),
            HostLine::Alarm(alarm) => alarm.fmt(f),
        }
    }
}
