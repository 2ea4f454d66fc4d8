//! Hardware and host collaborator traits
//!
//! These traits define the interface between the height control logic
//! and hardware-specific or host-specific implementations.

pub mod host;
pub mod planner;
pub mod sensor;
pub mod stepper;
pub mod timer;
pub mod torch;

pub use host::{Alarm, AlarmSink, FeedbackMessage, FeedbackSink};
pub use planner::{MotionPlanner, PlannedBlock};
pub use sensor::{ArcVoltageSampler, DEFAULT_SAMPLE_FULL_SCALE};
pub use stepper::StepOutput;
pub use timer::TickSource;
pub use torch::{ArcOkInput, TorchRelay};
