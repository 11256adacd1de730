//! SVG markup for region shapes, flow arrows and arrowhead markers.

use std::fmt::Write as _;

use migration_map_flow_models::{
    ArrowGeometry, FlowArrow, Num, Point, RegionMetric, RegionOutline,
};

use crate::RenderStyle;
use crate::tooltip::region_html;

/// Triangle drawn by each arrowhead marker.
const ARROWHEAD_PATH: &str = "M 0 0 L 10 5 L 0 10 Z";

/// Border between neighbouring regions.
const REGION_STROKE: &str = "white";
const REGION_STROKE_WIDTH: f64 = 2.5;

/// Escapes text for use inside a double-quoted attribute or element body.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A `<defs>` block with one arrowhead marker per direction.
#[must_use]
pub fn arrow_markers(style: &RenderStyle) -> String {
    let mut out = String::from("<defs>");
    for arrow in [&style.outbound, &style.inbound] {
        let _ = write!(
            out,
            r#"<marker id="{}" viewBox="0 0 10 10" refX="5" refY="5" markerWidth="6" markerHeight="6" orient="auto"><path d="{ARROWHEAD_PATH}" fill="{}"/></marker>"#,
            escape(&arrow.marker_id),
            escape(&arrow.color),
        );
    }
    out.push_str("</defs>");
    out
}

/// One arrow as a `<path>` (arc) or `<line>` (straight) element.
#[must_use]
pub fn render_arrow(arrow: &FlowArrow, style: &RenderStyle) -> String {
    let arrow_style = style.arrow(arrow.direction);
    let shared = format!(
        r#"stroke="{}" stroke-width="{}" fill="none" marker-end="url(#{})""#,
        escape(&arrow_style.color),
        Num(arrow.weight),
        escape(&arrow_style.marker_id),
    );
    let class = escape(&arrow_style.class);
    let region = escape(&arrow.region);

    match arrow.geometry {
        ArrowGeometry::Arc(arc) => {
            format!(r#"<path class="{class}" data-region="{region}" d="{arc}" {shared}/>"#)
        }
        ArrowGeometry::Straight { start, end } => format!(
            r#"<line class="{class}" data-region="{region}" x1="{}" y1="{}" x2="{}" y2="{}" {shared}/>"#,
            Num(start.x),
            Num(start.y),
            Num(end.x),
            Num(end.y),
        ),
    }
}

/// Marker definitions followed by every arrow, one element per line.
#[must_use]
pub fn render_arrows(arrows: &[FlowArrow], style: &RenderStyle) -> String {
    let mut out = arrow_markers(style);
    out.push('\n');
    for arrow in arrows {
        out.push_str(&render_arrow(arrow, style));
        out.push('\n');
    }
    log::debug!("Rendered {} arrows", arrows.len());
    out
}

/// SVG path data for a set of closed rings, `M x,y L x,y ... Z` per ring.
///
/// A ring's repeated closing point is left to the `Z`.
#[must_use]
pub fn rings_path(rings: &[Vec<Point>]) -> String {
    let mut d = String::new();
    for ring in rings {
        let open = match ring.split_last() {
            Some((last, rest)) if rest.first() == Some(last) => rest,
            _ => ring.as_slice(),
        };
        for (i, p) in open.iter().enumerate() {
            let _ = write!(
                d,
                "{}{},{}",
                if i == 0 { 'M' } else { 'L' },
                Num(p.x),
                Num(p.y)
            );
        }
        if !open.is_empty() {
            d.push('Z');
        }
    }
    d
}

/// One filled `<path>` per region outline, in outline order.
///
/// The hub gets the hub fill and every other region the base fill. Each
/// element carries its hover fill and tooltip body as data attributes so
/// the host can apply [`crate::tooltip::Tooltip`] transitions. Outlines
/// without rings are skipped.
#[must_use]
pub fn render_regions(
    outlines: &[RegionOutline],
    regions: &[RegionMetric],
    hub: &str,
    style: &RenderStyle,
) -> String {
    let mut out = String::new();
    let mut drawn = 0_usize;

    for outline in outlines.iter().filter(|o| !o.rings.is_empty()) {
        let tooltip = regions.iter().find(|r| r.name == outline.name).map_or_else(
            || {
                region_html(
                    &RegionMetric {
                        name: outline.name.clone(),
                        position: None,
                        metrics: None,
                    },
                    hub,
                )
            },
            |region| region_html(region, hub),
        );

        let _ = writeln!(
            out,
            r#"<path class="region" data-region="{}" d="{}" fill="{}" stroke="{REGION_STROKE}" stroke-width="{}" data-hover-fill="{}" data-tooltip="{}"/>"#,
            escape(&outline.name),
            rings_path(&outline.rings),
            escape(style.region_fill(&outline.name, hub, false)),
            Num(REGION_STROKE_WIDTH),
            escape(style.region_fill(&outline.name, hub, true)),
            escape(&tooltip),
        );
        drawn += 1;
    }

    log::debug!("Rendered {drawn} region shapes");
    out
}
