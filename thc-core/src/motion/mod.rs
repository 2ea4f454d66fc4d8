//! Height axis motion
//!
//! One-step-per-tick jogging of the torch axis, driven from the timer
//! interrupt.

pub mod jog;

pub use jog::AxisJogDriver;
