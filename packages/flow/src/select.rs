//! Threshold selection of arrow regions.
//!
//! Thresholds are absolute and compared strictly. Regions without a
//! metrics entry never match, so a negative threshold cannot pull them
//! in.

use migration_map_flow_models::{FlowMetrics, RegionMetric, Selection};

/// Returns whether `metrics` passes `selection`.
///
/// Comparisons involving `NaN` are false, so malformed values drop out.
#[must_use]
pub fn matches(selection: &Selection, metrics: &FlowMetrics) -> bool {
    match *selection {
        Selection::OutboundAbove { threshold } => metrics.outbound > threshold,
        Selection::NetBelow { threshold } => metrics.net() < -threshold,
        Selection::NetAbove { threshold } => metrics.net() > threshold,
    }
}

/// Yields the regions passing `selection`, in input order, skipping the
/// hub and regions without metrics.
pub fn select<'a>(
    regions: &'a [RegionMetric],
    selection: &'a Selection,
    hub: &'a str,
) -> impl Iterator<Item = (&'a RegionMetric, FlowMetrics)> + 'a {
    regions.iter().filter_map(move |region| {
        if region.name == hub {
            return None;
        }
        let metrics = region.metrics?;
        matches(selection, &metrics).then_some((region, metrics))
    })
}
