//! Torch relay and arc-ok drivers

pub mod arc_ok;
pub mod relay;

pub use arc_ok::GpioArcOk;
pub use relay::GpioTorchRelay;
