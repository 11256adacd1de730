//! Compile-time registry of planner presets.
//!
//! Each entry is an `(id, toml_content)` pair embedded via `include_str!`.
//! Adding a variant requires creating a TOML file in `presets/` and adding
//! a corresponding entry here.

use migration_map_flow_models::PlannerConfig;

use crate::FlowError;

/// Number of registered presets. Enforced by a test.
#[cfg(test)]
const EXPECTED_PRESET_COUNT: usize = 2;

/// Embedded TOML preset definitions.
const PRESET_TOMLS: &[(&str, &str)] = &[
    ("single_metric", include_str!("../presets/single_metric.toml")),
    ("net_flow", include_str!("../presets/net_flow.toml")),
];

/// Returns all registered presets.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse or validate. Since
/// these are compile-time constants, failures indicate a development
/// error and are caught by the tests below.
#[must_use]
pub fn all_presets() -> Vec<PlannerConfig> {
    PRESET_TOMLS
        .iter()
        .map(|(id, toml_str)| {
            crate::config::from_toml_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to load planner preset '{id}': {e}"))
        })
        .collect()
}

/// Returns the preset registered under `id`.
///
/// # Errors
///
/// Returns [`FlowError::UnknownPreset`] if no preset has that id, or the
/// parse error if the embedded TOML is broken.
pub fn preset(id: &str) -> Result<PlannerConfig, FlowError> {
    let (_, toml_str) = PRESET_TOMLS
        .iter()
        .find(|(preset_id, _)| *preset_id == id)
        .ok_or_else(|| FlowError::UnknownPreset { id: id.to_string() })?;
    crate::config::from_toml_str(toml_str)
}

/// Ids of all registered presets, in registration order.
#[must_use]
pub fn preset_ids() -> Vec<&'static str> {
    PRESET_TOMLS.iter().map(|(id, _)| *id).collect()
}
