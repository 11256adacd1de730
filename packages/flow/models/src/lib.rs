#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region metric, flow arrow and planner configuration types.
//!
//! A [`RegionMetric`] is one map region joined with its migration counts
//! relative to the hub region. The planner turns a slice of them into
//! [`FlowArrow`]s according to a [`PlannerConfig`], which is deserialized
//! from TOML.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A position in plotted (projected) coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (grows downwards, as in SVG).
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Which way an arrow runs relative to the hub.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FlowDirection {
    /// From the region to the hub (the region sends migrants).
    Outbound,
    /// From the hub to the region (the region receives migrants).
    Inbound,
}

/// Which of the two metric values a rule reads.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricField {
    /// Migrants moving from the region to the hub.
    Outbound,
    /// Migrants moving from the hub to the region.
    Inbound,
}

/// Migration counts for a region, relative to the hub.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// Count moving from the region to the hub.
    pub outbound: f64,
    /// Count moving from the hub to the region. Zero when the data set
    /// only carries a single metric.
    pub inbound: f64,
}

impl FlowMetrics {
    #[must_use]
    pub const fn new(outbound: f64, inbound: f64) -> Self {
        Self { outbound, inbound }
    }

    /// Net flow towards the hub (`outbound - inbound`).
    #[must_use]
    pub fn net(&self) -> f64 {
        self.outbound - self.inbound
    }

    #[must_use]
    pub const fn get(&self, field: MetricField) -> f64 {
        match field {
            MetricField::Outbound => self.outbound,
            MetricField::Inbound => self.inbound,
        }
    }

    /// The larger of the two values; used to size the weight scale.
    #[must_use]
    pub fn peak(&self) -> f64 {
        self.outbound.max(self.inbound)
    }
}

/// A map region joined with its migration metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionMetric {
    /// Region name, unique within a data set (e.g. "Nevada").
    pub name: String,
    /// Plotted position of the region's centroid. `None` when the region
    /// has no usable geometry.
    pub position: Option<Point>,
    /// `None` when the metrics mapping has no entry for this region.
    pub metrics: Option<FlowMetrics>,
}

impl RegionMetric {
    /// Outbound value, reading a missing entry as zero.
    #[must_use]
    pub fn outbound_value(&self) -> f64 {
        self.metrics.map_or(0.0, |m| m.outbound)
    }

    /// Inbound value, reading a missing entry as zero.
    #[must_use]
    pub fn inbound_value(&self) -> f64 {
        self.metrics.map_or(0.0, |m| m.inbound)
    }
}

/// A single circular SVG arc from `start` to `end`.
///
/// Rotation is always 0, the large-arc flag 0 and the sweep flag 1, so
/// the arc is fully described by its endpoints and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcPath {
    pub start: Point,
    /// Radius used for both axes.
    pub radius: f64,
    pub end: Point,
}

impl fmt::Display for ArcPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M{},{}A{},{} 0 0,1 {},{}",
            Num(self.start.x),
            Num(self.start.y),
            Num(self.radius),
            Num(self.radius),
            Num(self.end.x),
            Num(self.end.y),
        )
    }
}

/// Formats a number for an SVG attribute the way JavaScript's
/// `Number.prototype.toString` does.
///
/// Integers print without a decimal point, negative zero prints as `0`,
/// and magnitudes below `1e-6` or at least `1e21` use exponent notation
/// with an explicit sign (`1e+21`, `1.5e-7`).
#[derive(Debug, Clone, Copy)]
pub struct Num(pub f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0;
        if n.is_nan() {
            return f.write_str("NaN");
        }
        if n.is_infinite() {
            return f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" });
        }
        if n == 0.0 {
            return f.write_str("0");
        }

        let magnitude = n.abs();
        if magnitude >= 1e21 || magnitude < 1e-6 {
            let exp = format!("{n:e}");
            return match exp.split_once('e') {
                Some((mantissa, power)) if !power.starts_with('-') => {
                    write!(f, "{mantissa}e+{power}")
                }
                _ => f.write_str(&exp),
            };
        }
        write!(f, "{n}")
    }
}

/// Shape of a planned arrow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArrowGeometry {
    /// Curved arrow drawn as an SVG path.
    Arc(ArcPath),
    /// Straight arrow drawn as an SVG line.
    Straight {
        /// Line start.
        start: Point,
        /// Line end.
        end: Point,
    },
}

impl ArrowGeometry {
    /// Arc radius, or `0.0` for straight arrows.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        match self {
            Self::Arc(arc) => arc.radius,
            Self::Straight { .. } => 0.0,
        }
    }
}

/// A planned arrow between a region and the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowArrow {
    /// Name of the non-hub region at one end of the arrow.
    pub region: String,
    pub direction: FlowDirection,
    pub source: Point,
    pub target: Point,
    pub geometry: ArrowGeometry,
    /// Arc radius, or `0.0` for straight arrows.
    pub curvature: f64,
    /// Stroke width.
    pub weight: f64,
}

/// Projected outline of one region, as closed rings in plot coordinates.
///
/// A polygon contributes its exterior ring followed by its holes; a
/// multipolygon contributes the rings of each member in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionOutline {
    pub name: String,
    pub rings: Vec<Vec<Point>>,
}

/// A planner variant, deserialized from TOML.
///
/// Describes where the metrics live in the input data, which region is
/// the hub, and the ordered list of arrow rules to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Unique variant identifier (e.g. `"net_flow"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Name of the hub region as it appears in the boundary data.
    pub hub: String,
    /// Field mapping for the boundary and metrics inputs.
    pub fields: MetricFieldMapping,
    /// Output range of the linear weight scale.
    #[serde(default)]
    pub weight_range: WeightRange,
    /// How boundary coordinates are projected into plotted space.
    pub projection: ProjectionConfig,
    /// Arrow rules, applied in order.
    pub rules: Vec<ArrowRule>,
}

/// Names of the input fields the planner reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricFieldMapping {
    /// Feature property holding the region name.
    #[serde(default = "default_name_field")]
    pub name: String,
    /// Metrics record field holding the outbound value
    /// (e.g. `"going_to_california"`).
    pub outbound: String,
    /// Metrics record field holding the inbound value
    /// (e.g. `"coming_from_california"`). Single-metric data sets omit it.
    pub inbound: Option<String>,
}

fn default_name_field() -> String {
    "name".to_string()
}

/// Output range of the linear weight scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRange {
    pub min: f64,
    pub max: f64,
}

impl Default for WeightRange {
    fn default() -> Self {
        Self { min: 1.0, max: 5.0 }
    }
}

/// How to project `[longitude, latitude]` into plotted coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectionConfig {
    /// Plate carrée around `center`, scaled in plotted units per radian.
    Equirectangular {
        /// `[longitude, latitude]` mapped to `translate`.
        center: [f64; 2],
        /// Plotted units per radian.
        scale: f64,
        /// Plotted position of `center`.
        translate: [f64; 2],
    },
}

/// One arrow rule: which regions qualify and how their arrows look.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowRule {
    pub direction: FlowDirection,
    pub selection: Selection,
    /// Metric fed into the weight scale.
    pub weight_metric: MetricField,
    /// Exponent applied to the scaled weight. Values above 1 emphasize
    /// large flows.
    #[serde(default = "default_exponent")]
    pub exponent: f64,
    #[serde(default)]
    pub geometry: GeometryKind,
    #[serde(default)]
    pub curve: CurveConfig,
}

const fn default_exponent() -> f64 {
    1.0
}

/// Threshold predicate a region must pass to get an arrow.
///
/// Thresholds are absolute, in the same units as the metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Selection {
    /// `outbound > threshold`.
    OutboundAbove {
        /// Cutoff value.
        threshold: f64,
    },
    /// `outbound - inbound < -threshold`.
    NetBelow {
        /// Cutoff value.
        threshold: f64,
    },
    /// `outbound - inbound > threshold`.
    NetAbove {
        /// Cutoff value.
        threshold: f64,
    },
}

impl Selection {
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        match *self {
            Self::OutboundAbove { threshold }
            | Self::NetBelow { threshold }
            | Self::NetAbove { threshold } => threshold,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GeometryKind {
    #[default]
    Arc,
    Straight,
}

/// Arc shaping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Multiplier turning endpoint distance into arc radius.
    pub scale_factor: f64,
    /// Added to the vertical displacement before the radius is computed.
    pub displacement_bias_y: f64,
    /// Added to the end point's y coordinate. Keeps opposing arrows from
    /// overlapping.
    pub end_bias_y: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            scale_factor: 1.5,
            displacement_bias_y: 0.0,
            end_bias_y: 0.0,
        }
    }
}
