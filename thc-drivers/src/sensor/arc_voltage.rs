//! Latched arc voltage sample
//!
//! The ADC is read asynchronously by the control task; the latest count is
//! latched here and handed to the feedback controller on its next cycle.
//! Arc voltage normally arrives through an isolated divider board (e.g. a
//! 50:1 divider), so the configured scale absorbs the divider ratio.

use thc_core::traits::{ArcVoltageSampler, DEFAULT_SAMPLE_FULL_SCALE};

/// Full-scale count of a 12-bit ADC
pub const ADC_12BIT_FULL_SCALE: u16 = 4096;

/// Most recent raw ADC count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LatchedSample {
    raw: u16,
    full_scale: u16,
}

impl Default for LatchedSample {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_FULL_SCALE)
    }
}

impl LatchedSample {
    /// Create a sampler for an ADC with `full_scale` counts
    pub const fn new(full_scale: u16) -> Self {
        Self { raw: 0, full_scale }
    }

    /// Sampler for a 12-bit ADC
    pub const fn adc_12bit() -> Self {
        Self::new(ADC_12BIT_FULL_SCALE)
    }

    /// Store a new conversion result, clamped to full scale
    pub fn latch(&mut self, raw: u16) {
        self.raw = raw.min(self.full_scale);
    }

    /// Last latched count
    pub fn raw(&self) -> u16 {
        self.raw
    }
}

impl ArcVoltageSampler for LatchedSample {
    fn raw_sample(&mut self) -> u16 {
        self.raw
    }

    fn full_scale(&self) -> u16 {
        self.full_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thc_core::control::scale_voltage;

    #[test]
    fn test_latch_and_read() {
        let mut sample = LatchedSample::adc_12bit();
        assert_eq!(sample.raw_sample(), 0);

        sample.latch(2048);
        assert_eq!(sample.raw_sample(), 2048);
        assert_eq!(sample.full_scale(), 4096);

        // Out-of-range conversions are pinned to full scale
        sample.latch(u16::MAX);
        assert_eq!(sample.raw(), 4096);
    }

    #[test]
    fn test_default_is_10bit() {
        assert_eq!(LatchedSample::default().full_scale(), 1024);
    }

    #[test]
    fn test_resolution_independent_scaling() {
        let mut ten = LatchedSample::default();
        let mut twelve = LatchedSample::adc_12bit();
        ten.latch(512);
        twelve.latch(2048);

        let a = scale_voltage(ten.raw_sample(), ten.full_scale(), 250.0, 0.0);
        let b = scale_voltage(twelve.raw_sample(), twelve.full_scale(), 250.0, 0.0);
        assert_eq!(a, 125);
        assert_eq!(a, b);
    }
}
