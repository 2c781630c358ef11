//! Bounded uniform sampling.
//!
//! Every stochastic input of the model (viral load, inhalation rate, mask
//! efficacy, symptom onset, isolation duration, …) is drawn from a bounded
//! uniform distribution.  `UniformRange` validates its support at
//! construction so no sampling call can produce a negative duration, rate,
//! or probability at runtime.

use crate::{CoreError, CoreResult, SimRng};

/// A validated uniform distribution over `[lo, hi)`.
///
/// Degenerate ranges (`lo == hi`) are allowed and always return `lo`,
/// standing in for fixed parameters.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UniformRange {
    lo: f64,
    hi: f64,
}

impl UniformRange {
    /// Construct a range, rejecting inverted, negative, or non-finite
    /// supports as configuration errors.
    pub fn new(lo: f64, hi: f64) -> CoreResult<Self> {
        if !lo.is_finite() || !hi.is_finite() || lo < 0.0 || hi < lo {
            return Err(CoreError::InvalidRange { lo, hi });
        }
        Ok(UniformRange { lo, hi })
    }

    /// A degenerate range that always samples `v`.
    pub fn fixed(v: f64) -> CoreResult<Self> {
        Self::new(v, v)
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Draw one value from the support.
    #[inline]
    pub fn sample(&self, rng: &mut SimRng) -> f64 {
        if self.lo == self.hi {
            return self.lo;
        }
        rng.gen_range(self.lo..self.hi)
    }
}
