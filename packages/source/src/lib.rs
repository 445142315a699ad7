#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Input and output for postal-area land-use analysis.
//!
//! Analysis runs are described by TOML configurations, either loaded from
//! disk or embedded at compile time as presets ([`registry`]). Postal
//! areas and land-use polygons are read from `GeoJSON` ([`load`]),
//! projected to planar meters on ingestion ([`projection`]), and the
//! enriched records are written back as CSV and `GeoJSON` ([`export`]).

pub mod config;
pub mod export;
pub mod load;
pub mod projection;
pub mod registry;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing analysis data.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration is inconsistent.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// No preset has the requested id.
    #[error("Unknown preset: {id}")]
    UnknownPreset {
        /// Requested preset id.
        id: String,
    },
}
