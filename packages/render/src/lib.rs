#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! SVG rendering of region shapes, planned flow arrows and hover tooltip
//! state.
//!
//! Rendering only produces markup strings; attaching them to a document
//! and wiring pointer events is left to the host.

pub mod svg;
pub mod tooltip;

use migration_map_flow_models::FlowDirection;
use serde::{Deserialize, Serialize};

/// Stroke and marker settings for one arrow direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrowStyle {
    /// CSS class on the arrow element (`"from"` or `"to"`).
    pub class: String,
    /// Stroke and arrowhead color.
    pub color: String,
    /// Id of the arrowhead `<marker>`.
    pub marker_id: String,
}

/// Colors used when rendering the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Arrows from a region into the hub.
    pub outbound: ArrowStyle,
    /// Arrows from the hub out to a region.
    pub inbound: ArrowStyle,
    pub hub_fill: String,
    pub region_fill: String,
    /// Fill of the region under the pointer.
    pub hover_fill: String,
}

impl RenderStyle {
    #[must_use]
    pub const fn arrow(&self, direction: FlowDirection) -> &ArrowStyle {
        match direction {
            FlowDirection::Outbound => &self.outbound,
            FlowDirection::Inbound => &self.inbound,
        }
    }

    /// Fill color for a region.
    #[must_use]
    pub fn region_fill(&self, region: &str, hub: &str, hovered: bool) -> &str {
        if hovered {
            &self.hover_fill
        } else if region == hub {
            &self.hub_fill
        } else {
            &self.region_fill
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            outbound: ArrowStyle {
                class: "from".to_string(),
                color: "#45d985".to_string(),
                marker_id: "arrowhead-green".to_string(),
            },
            inbound: ArrowStyle {
                class: "to".to_string(),
                color: "#bd2300".to_string(),
                marker_id: "arrowhead-red".to_string(),
            },
            hub_fill: "#f2a724".to_string(),
            region_fill: "#3d3d3d".to_string(),
            hover_fill: "#ff9ee7".to_string(),
        }
    }
}
