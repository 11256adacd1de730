#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary and migration metrics loading for the migration map.
//!
//! Loads a `GeoJSON` `FeatureCollection` of region boundaries and a
//! name-keyed migration metrics file, from disk or over HTTP, then joins
//! them into [`RegionMetric`](migration_map_flow_models::RegionMetric)
//! values positioned at each region's projected centroid.

pub mod join;
pub mod load;
pub mod projection;

use thiserror::Error;

/// Errors that can occur while loading or joining map data.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading a local file failed.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
