//! Loading of the boundary and metrics inputs.
//!
//! Each input is either a local path or an `http(s)://` URL. Both are
//! loaded concurrently; if either fails the whole load fails and nothing
//! is returned.

use geojson::FeatureCollection;
use migration_map_flow_models::MetricFieldMapping;

use crate::GeographyError;
use crate::join::{MetricsTable, parse_feature_collection, parse_metrics};

/// The two parsed map inputs.
#[derive(Debug, Clone)]
pub struct MapInputs {
    /// Region boundaries.
    pub boundaries: FeatureCollection,
    /// Migration metrics keyed by region name.
    pub metrics: MetricsTable,
}

/// Returns whether `location` should be fetched over HTTP.
#[must_use]
pub fn is_remote(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Reads the full text at `location`.
///
/// # Errors
///
/// Returns [`GeographyError`] if the request fails, the server answers
/// with a non-success status, or the file cannot be read.
pub async fn load_text(
    client: &reqwest::Client,
    location: &str,
) -> Result<String, GeographyError> {
    if is_remote(location) {
        log::debug!("Fetching {location}");
        let resp = client.get(location.trim()).send().await?;
        if !resp.status().is_success() {
            return Err(GeographyError::Conversion {
                message: format!("Request for {location} failed with status {}", resp.status()),
            });
        }
        Ok(resp.text().await?)
    } else {
        log::debug!("Reading {location}");
        tokio::fs::read_to_string(location)
            .await
            .map_err(|source| GeographyError::Io {
                path: location.to_string(),
                source,
            })
    }
}

/// Loads and parses both inputs concurrently.
///
/// # Errors
///
/// Returns the first [`GeographyError`] hit while loading or parsing
/// either input.
pub async fn load_inputs(
    client: &reqwest::Client,
    boundaries_location: &str,
    metrics_location: &str,
    fields: &MetricFieldMapping,
) -> Result<MapInputs, GeographyError> {
    let (boundaries_text, metrics_text) = tokio::try_join!(
        load_text(client, boundaries_location),
        load_text(client, metrics_location)
    )?;

    let boundaries = parse_feature_collection(&boundaries_text)?;
    log::info!(
        "Loaded {} boundary features from {boundaries_location}",
        boundaries.features.len()
    );

    let metrics = parse_metrics(&metrics_text, fields)?;
    log::info!(
        "Loaded metrics for {} regions from {metrics_location}",
        metrics.len()
    );

    Ok(MapInputs {
        boundaries,
        metrics,
    })
}
