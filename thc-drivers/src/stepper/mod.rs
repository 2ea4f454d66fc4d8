//! Height axis step/direction driver

pub mod step_dir;

pub use step_dir::{GpioStepOutput, StepTiming};
