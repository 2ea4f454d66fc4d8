//! Arc voltage sampling

pub mod arc_voltage;

pub use arc_voltage::LatchedSample;
