#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Arrow flow planning for migration maps.
//!
//! Given the regions of a map joined with their migration metrics, the
//! [`ArrowFlowPlanner`] picks which regions get an arrow to or from the
//! hub region, shapes each arrow as a single circular arc, and sizes its
//! stroke from a linear weight scale.
//!
//! Planner variants are described by a [`PlannerConfig`]. The built-in
//! variants live in [`registry`] as TOML embedded at compile time.

pub mod config;
pub mod curve;
pub mod registry;
pub mod scale;
pub mod select;

use migration_map_flow_models::{FlowArrow, FlowDirection, PlannerConfig, Point, RegionMetric};
use thiserror::Error;

use crate::scale::LinearScale;

/// Errors that can occur while configuring or running the planner.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The hub region is missing from the data set or has no position.
    #[error("Hub region '{name}' not found or has no position")]
    HubNotFound {
        /// Configured hub name.
        name: String,
    },

    /// No built-in variant has the requested identifier.
    #[error("Unknown planner preset '{id}'")]
    UnknownPreset {
        /// Requested identifier.
        id: String,
    },

    /// TOML parsing failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration parsed but holds unusable values.
    #[error("Invalid planner config: {message}")]
    InvalidConfig {
        /// Description of what went wrong.
        message: String,
    },
}

/// Plans the arrows for one data load.
///
/// Planning is a pure function of the configuration and the region
/// slice: the same input always produces the same arrows, in rule order
/// and then in region order.
#[derive(Debug, Clone)]
pub struct ArrowFlowPlanner {
    config: PlannerConfig,
}

impl ArrowFlowPlanner {
    /// Creates a planner after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidConfig`] if the configuration holds
    /// non-finite numbers, a non-positive curve scale factor or an
    /// inverted weight range.
    pub fn new(config: PlannerConfig) -> Result<Self, FlowError> {
        config::validate(&config)?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans every arrow for `regions`.
    ///
    /// Regions selected by a rule but lacking a position are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::HubNotFound`] if no region carries the hub's
    /// name or the hub has no position.
    pub fn plan(&self, regions: &[RegionMetric]) -> Result<Vec<FlowArrow>, FlowError> {
        let hub = self.hub_position(regions)?;
        let scale = LinearScale::for_regions(regions, self.config.weight_range);

        let mut arrows = Vec::new();

        for rule in &self.config.rules {
            let before = arrows.len();

            for (region, metrics) in select::select(regions, &rule.selection, &self.config.hub) {
                let Some(position) = region.position else {
                    log::warn!(
                        "Region '{}' qualifies for a {} arrow but has no position",
                        region.name,
                        rule.direction
                    );
                    continue;
                };

                let (source, target) = match rule.direction {
                    FlowDirection::Outbound => (position, hub),
                    FlowDirection::Inbound => (hub, position),
                };

                let geometry = curve::arrow_geometry(source, target, rule.geometry, &rule.curve);

                arrows.push(FlowArrow {
                    region: region.name.clone(),
                    direction: rule.direction,
                    source,
                    target,
                    geometry,
                    curvature: geometry.radius(),
                    weight: scale.weight(metrics.get(rule.weight_metric), rule.exponent),
                });
            }

            log::debug!(
                "Rule {:?} ({}) produced {} arrows",
                rule.selection,
                rule.direction,
                arrows.len() - before
            );
        }

        log::info!(
            "Planned {} arrows for '{}' from {} regions",
            arrows.len(),
            self.config.id,
            regions.len()
        );

        Ok(arrows)
    }

    fn hub_position(&self, regions: &[RegionMetric]) -> Result<Point, FlowError> {
        regions
            .iter()
            .find(|r| r.name == self.config.hub)
            .and_then(|r| r.position)
            .ok_or_else(|| FlowError::HubNotFound {
                name: self.config.hub.clone(),
            })
    }
}
