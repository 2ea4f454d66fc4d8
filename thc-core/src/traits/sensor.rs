//! Arc voltage sampler trait

/// Full-scale count of a 10-bit analog sampler
pub const DEFAULT_SAMPLE_FULL_SCALE: u16 = 1024;

/// Trait for the analog arc voltage input
///
/// The raw sample is normalized by `full_scale()` before the configured
/// scale and offset are applied.
pub trait ArcVoltageSampler {
    /// Most recent raw sample
    fn raw_sample(&mut self) -> u16;

    /// Sample count corresponding to full scale
    ///
    /// Defaults to 1024 (10-bit). 12-bit samplers should return 4096.
    fn full_scale(&self) -> u16 {
        DEFAULT_SAMPLE_FULL_SCALE
    }
}
