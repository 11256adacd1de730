//! Hover tooltip state.
//!
//! Each pointer event maps to a pure function returning the tooltip's
//! new display state. Nothing here touches region or arrow data.

use migration_map_flow_models::{Num, RegionMetric};
use serde::{Deserialize, Serialize};

use crate::svg::escape;

/// Horizontal distance from the pointer to the tooltip's left edge.
pub const OFFSET_X: f64 = 20.0;
/// Vertical distance from the pointer to the tooltip's top edge.
pub const OFFSET_Y: f64 = -20.0;

/// Pointer position in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub page_x: f64,
    pub page_y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub visible: bool,
    pub left: f64,
    pub top: f64,
    /// Tooltip body markup.
    pub html: String,
}

impl Tooltip {
    /// Pointer entered an element: show `html` next to the pointer.
    #[must_use]
    pub fn show(pointer: Pointer, html: String) -> Self {
        Self {
            visible: true,
            left: pointer.page_x + OFFSET_X,
            top: pointer.page_y + OFFSET_Y,
            html,
        }
    }

    /// Pointer moved: follow it, keeping content and visibility.
    #[must_use]
    pub fn moved(&self, pointer: Pointer) -> Self {
        Self {
            left: pointer.page_x + OFFSET_X,
            top: pointer.page_y + OFFSET_Y,
            ..self.clone()
        }
    }

    /// Pointer left the element.
    #[must_use]
    pub fn hidden(&self) -> Self {
        Self {
            visible: false,
            ..self.clone()
        }
    }

    /// Inline CSS positioning the tooltip.
    #[must_use]
    pub fn css(&self) -> String {
        format!(
            "left: {}px; top: {}px; visibility: {}",
            Num(self.left),
            Num(self.top),
            if self.visible { "visible" } else { "hidden" }
        )
    }
}

/// Tooltip body for a hovered region.
///
/// Regions without metrics show `n/a` for both values.
#[must_use]
pub fn region_html(region: &RegionMetric, hub: &str) -> String {
    let (outbound, inbound) = region.metrics.map_or_else(
        || ("n/a".to_string(), "n/a".to_string()),
        |m| (Num(m.outbound).to_string(), Num(m.inbound).to_string()),
    );
    let hub = escape(hub);
    format!(
        "State: {}<br>Going to {hub}: {outbound}<br>Coming from {hub}: {inbound}",
        escape(&region.name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration_map_flow_models::FlowMetrics;

    const POINTER: Pointer = Pointer {
        page_x: 100.0,
        page_y: 50.0,
    };

    #[test]
    fn show_offsets_from_pointer() {
        let tip = Tooltip::show(POINTER, "hi".to_string());
        assert!(tip.visible);
        assert!((tip.left - 120.0).abs() < f64::EPSILON);
        assert!((tip.top - 30.0).abs() < f64::EPSILON);
        assert_eq!(tip.css(), "left: 120px; top: 30px; visibility: visible");
    }

    #[test]
    fn move_keeps_content() {
        let tip = Tooltip::show(POINTER, "hi".to_string()).moved(Pointer {
            page_x: 0.0,
            page_y: 0.0,
        });
        assert!(tip.visible);
        assert_eq!(tip.html, "hi");
        assert!((tip.left - 20.0).abs() < f64::EPSILON);
        assert!((tip.top + 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn hide_is_idempotent() {
        let tip = Tooltip::show(POINTER, "hi".to_string());
        let once = tip.hidden();
        assert!(!once.visible);
        assert_eq!(once.hidden(), once);
        assert!(once.css().ends_with("visibility: hidden"));
    }

    #[test]
    fn region_body() {
        let region = RegionMetric {
            name: "Nevada".to_string(),
            position: None,
            metrics: Some(FlowMetrics::new(24_913.0, 40_500.0)),
        };
        assert_eq!(
            region_html(&region, "California"),
            "State: Nevada<br>Going to California: 24913<br>Coming from California: 40500"
        );
    }

    #[test]
    fn region_body_without_metrics() {
        let region = RegionMetric {
            name: "Puerto Rico".to_string(),
            position: None,
            metrics: None,
        };
        assert!(region_html(&region, "California").ends_with("Coming from California: n/a"));
    }
}
