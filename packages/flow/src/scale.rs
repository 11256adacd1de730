//! Linear weight scale for arrow strokes.

use migration_map_flow_models::{RegionMetric, WeightRange};

/// Maps `[0, domain_max]` linearly onto a [`WeightRange`].
///
/// The scale is not clamped. A zero or non-finite domain collapses to the
/// range minimum instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_max: f64,
    range: WeightRange,
}

impl LinearScale {
    #[must_use]
    pub const fn new(domain_max: f64, range: WeightRange) -> Self {
        Self { domain_max, range }
    }

    /// Builds the scale over the largest outbound or inbound value of any
    /// region, the hub included.
    #[must_use]
    pub fn for_regions(regions: &[RegionMetric], range: WeightRange) -> Self {
        let domain_max = max_value(regions);
        if domain_max <= 0.0 {
            log::warn!("All migration values are zero; arrows get the minimum weight");
        }
        Self::new(domain_max, range)
    }

    #[must_use]
    pub const fn domain_max(&self) -> f64 {
        self.domain_max
    }

    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        if !self.domain_max.is_finite() || self.domain_max <= 0.0 {
            return self.range.min;
        }
        let t = value / self.domain_max;
        (self.range.max - self.range.min).mul_add(t, self.range.min)
    }

    /// `apply(value)` raised to `exponent`.
    ///
    /// A value far enough below zero maps under the range; the base is
    /// floored at `0.0` so a fractional exponent cannot produce `NaN`.
    #[must_use]
    pub fn weight(&self, value: f64, exponent: f64) -> f64 {
        self.apply(value).max(0.0).powf(exponent)
    }
}

/// Largest outbound or inbound value across `regions`, or `0.0` when
/// none have metrics.
#[must_use]
pub fn max_value(regions: &[RegionMetric]) -> f64 {
    regions
        .iter()
        .filter_map(|r| r.metrics)
        .map(|m| m.peak())
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}
