//! Loading and validation of [`PlannerConfig`] values.

use migration_map_flow_models::{PlannerConfig, ProjectionConfig};

use crate::FlowError;

/// Parses and validates a planner config from TOML text.
///
/// # Errors
///
/// Returns [`FlowError::Toml`] if the text is not a valid config and
/// [`FlowError::InvalidConfig`] if it fails [`validate`].
pub fn from_toml_str(toml_str: &str) -> Result<PlannerConfig, FlowError> {
    let config: PlannerConfig = toml::de::from_str(toml_str)?;
    validate(&config)?;
    Ok(config)
}

/// Checks that a config can drive the planner.
///
/// # Errors
///
/// Returns [`FlowError::InvalidConfig`] describing the first problem found.
pub fn validate(config: &PlannerConfig) -> Result<(), FlowError> {
    if config.hub.trim().is_empty() {
        return Err(invalid("hub name is empty"));
    }
    if config.fields.name.trim().is_empty() || config.fields.outbound.trim().is_empty() {
        return Err(invalid("field mapping has an empty field name"));
    }

    let range = config.weight_range;
    if !range.min.is_finite() || !range.max.is_finite() {
        return Err(invalid("weight range must be finite"));
    }
    if range.min < 0.0 || range.min > range.max {
        return Err(invalid(&format!(
            "weight range [{}, {}] must satisfy 0 <= min <= max",
            range.min, range.max
        )));
    }

    match &config.projection {
        ProjectionConfig::Equirectangular {
            center,
            scale,
            translate,
        } => {
            if !scale.is_finite() || *scale <= 0.0 {
                return Err(invalid("projection scale must be positive"));
            }
            if !center.iter().chain(translate).all(|v| v.is_finite()) {
                return Err(invalid("projection center and translate must be finite"));
            }
        }
    }

    for (i, rule) in config.rules.iter().enumerate() {
        if !rule.selection.threshold().is_finite() {
            return Err(invalid(&format!("rule {i}: threshold must be finite")));
        }
        if !rule.exponent.is_finite() || rule.exponent < 0.0 {
            return Err(invalid(&format!("rule {i}: exponent must be >= 0")));
        }
        let curve = rule.curve;
        if !curve.scale_factor.is_finite() || curve.scale_factor <= 0.0 {
            return Err(invalid(&format!(
                "rule {i}: curve scale factor must be positive"
            )));
        }
        if !curve.displacement_bias_y.is_finite() || !curve.end_bias_y.is_finite() {
            return Err(invalid(&format!("rule {i}: curve biases must be finite")));
        }
    }

    if config.rules.is_empty() {
        log::warn!("Planner config '{}' has no arrow rules", config.id);
    }
    if config.fields.inbound.is_none() {
        log::debug!(
            "Planner config '{}' has no inbound field; inbound values read as 0",
            config.id
        );
    }

    Ok(())
}

fn invalid(message: &str) -> FlowError {
    FlowError::InvalidConfig {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
id = "minimal"
name = "Minimal"
hub = "California"

[fields]
outbound = "going_to_california"

[projection]
type = "equirectangular"
center = [0.0, 0.0]
scale = 100.0
translate = [0.0, 0.0]

[[rules]]
direction = "outbound"
selection = { type = "outbound_above", threshold = 1.0 }
weight_metric = "outbound"
"#;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config = from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.fields.name, "name");
        assert_eq!(config.fields.inbound, None);
        assert!((config.weight_range.min - 1.0).abs() < f64::EPSILON);
        assert!((config.weight_range.max - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.rules.len(), 1);
    }

    #[test]
    fn rejects_inverted_weight_range() {
        let mut config = from_toml_str(MINIMAL).unwrap();
        config.weight_range.min = 6.0;
        assert!(matches!(
            validate(&config),
            Err(FlowError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rejects_non_positive_scale_factor() {
        let mut config = from_toml_str(MINIMAL).unwrap();
        config.rules[0].curve.scale_factor = 0.0;
        assert!(matches!(
            validate(&config),
            Err(FlowError::InvalidConfig { message }) if message.contains("scale factor")
        ));
    }

    #[test]
    fn rejects_nan_threshold() {
        let text = MINIMAL.replace("threshold = 1.0", "threshold = nan");
        assert!(matches!(
            from_toml_str(&text),
            Err(FlowError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn reports_toml_errors() {
        assert!(matches!(
            from_toml_str("id = "),
            Err(FlowError::Toml(_))
        ));
    }

    #[test]
    fn rejects_empty_hub() {
        let text = MINIMAL.replace("hub = \"California\"", "hub = \"  \"");
        assert!(matches!(
            from_toml_str(&text),
            Err(FlowError::InvalidConfig { .. })
        ));
    }
}
