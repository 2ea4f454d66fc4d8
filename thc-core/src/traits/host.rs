//! Host feedback and alarm channels
//!
//! The height controller reports five lifecycle messages and raises a
//! single fatal alarm. Formatting follows the host's feedback line
//! convention: `[MSG:<text>]` for messages, `ALARM:<name>` for alarms.

use core::fmt;

/// Lifecycle messages emitted by the height controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedbackMessage {
    /// Torch relay energized
    TorchOn,
    /// Arc established
    ArcOk,
    /// Ignition attempt failed, retrying
    ArcRetry,
    /// All ignition attempts failed
    ArcFailed,
    /// Height correction engaged
    ThcEnabled,
}

impl FeedbackMessage {
    /// Human-readable text of the message
    pub fn text(&self) -> &'static str {
        match self {
            FeedbackMessage::TorchOn => "Plasma torch on",
            FeedbackMessage::ArcOk => "Plasma arc ok",
            FeedbackMessage::ArcRetry => "Plasma arc retry",
            FeedbackMessage::ArcFailed => "Plasma arc failed",
            FeedbackMessage::ThcEnabled => "Plasma THC enabled",
        }
    }
}

impl fmt::Display for FeedbackMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[MSG:{}]", self.text())
    }
}

/// Fatal conditions raised by the height controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm {
    /// The arc never established within the retry budget
    TorchArcFailed,
}

impl Alarm {
    /// Alarm code name reported to the host
    pub fn name(&self) -> &'static str {
        match self {
            Alarm::TorchArcFailed => "TORCH_ARC_FAILED",
        }
    }
}

impl fmt::Display for Alarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ALARM:{}", self.name())
    }
}

/// Trait for the host's text feedback channel
pub trait FeedbackSink {
    /// Emit one feedback message
    fn feedback(&mut self, message: FeedbackMessage);
}

/// Trait for the host's alarm channel
///
/// The host turns a raised alarm into a paused state like a manual tool
/// change: motion halts, jogging is allowed, and the operator resumes.
pub trait AlarmSink {
    /// Raise a fatal alarm
    fn raise(&mut self, alarm: Alarm);
}
