//! Arc geometry for flow arrows.
//!
//! Every curved arrow is one circular SVG arc whose radius is the
//! endpoint distance times the curve's scale factor, so arrows between
//! distant regions bow out proportionally less than they would with a
//! fixed radius.

use migration_map_flow_models::{ArcPath, ArrowGeometry, CurveConfig, GeometryKind, Point};

/// Arc radius for an arrow from `source` to `target`.
///
/// The vertical displacement includes the curve's displacement bias.
#[must_use]
pub fn arc_radius(source: Point, target: Point, curve: &CurveConfig) -> f64 {
    let dx = target.x - source.x;
    let dy = target.y - source.y + curve.displacement_bias_y;
    dx.hypot(dy) * curve.scale_factor
}

/// Builds the arc from `source` to `target`, shifting the end point down
/// by the curve's end bias.
#[must_use]
pub fn generate_curve_path(source: Point, target: Point, curve: &CurveConfig) -> ArcPath {
    ArcPath {
        start: source,
        radius: arc_radius(source, target, curve),
        end: target.offset(0.0, curve.end_bias_y),
    }
}

#[must_use]
pub fn arrow_geometry(
    source: Point,
    target: Point,
    kind: GeometryKind,
    curve: &CurveConfig,
) -> ArrowGeometry {
    match kind {
        GeometryKind::Arc => ArrowGeometry::Arc(generate_curve_path(source, target, curve)),
        GeometryKind::Straight => ArrowGeometry::Straight {
            start: source,
            end: target.offset(0.0, curve.end_bias_y),
        },
    }
}
