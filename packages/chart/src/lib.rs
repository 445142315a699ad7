#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Land-use bar charts for a single postal area.
//!
//! A chart shows the green, industrial and other land-use percentages of
//! one postal area in that fixed order. It is either saved as
//! `land_use_in_<postal_code>.png` or displayed in the terminal.

pub mod font;
pub mod raster;
pub mod terminal;

use std::path::{Path, PathBuf};

use land_use_models::{LandUseCategory, PostalAreaRow};
use thiserror::Error;

/// Errors that can occur while building or writing a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// No row has the requested postal code.
    #[error("Unknown postal code: {postal_code}")]
    UnknownPostalCode {
        /// Requested postal code.
        postal_code: String,
    },

    /// Encoding or writing the image failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Writing to the terminal failed.
    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),
}

/// The values drawn for one postal area.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Postal code the chart is for.
    pub postal_code: String,
    /// Display name used in the title.
    pub name: String,
    /// Percentages in green, industrial, other order; missing is zero.
    pub bars: [(LandUseCategory, f64); 3],
}

impl ChartData {
    /// Builds chart data from one row.
    #[must_use]
    pub fn from_row(row: &PostalAreaRow) -> Self {
        Self {
            postal_code: row.postal_code.clone(),
            name: row.name.clone(),
            bars: LandUseCategory::ALL.map(|c| (c, row.percentage(c).unwrap_or(0.0))),
        }
    }

    /// Finds the row for `postal_code` and builds chart data from it.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::UnknownPostalCode`] if no row matches.
    pub fn for_postal_code(rows: &[PostalAreaRow], postal_code: &str) -> Result<Self, ChartError> {
        rows.iter()
            .find(|row| row.postal_code == postal_code)
            .map(Self::from_row)
            .ok_or_else(|| ChartError::UnknownPostalCode {
                postal_code: postal_code.to_string(),
            })
    }

    /// Chart title.
    #[must_use]
    pub fn title(&self) -> String {
        format!("Land use percentages in {}", self.name)
    }

    /// Largest bar value.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.bars.iter().map(|(_, v)| *v).fold(0.0, f64::max)
    }
}

/// Output file name for a postal code's chart.
#[must_use]
pub fn file_name(postal_code: &str) -> String {
    format!("land_use_in_{postal_code}.png")
}

/// Either saves the chart into `dir` or displays it in the terminal.
///
/// Returns the written path when saving.
///
/// # Errors
///
/// Returns [`ChartError`] if the image or terminal output fails.
pub fn show(data: &ChartData, save: bool, dir: &Path) -> Result<Option<PathBuf>, ChartError> {
    if save {
        let path = dir.join(file_name(&data.postal_code));
        raster::save_png(data, &path)?;
        log::info!("Saved chart for {} to {}", data.postal_code, path.display());
        Ok(Some(path))
    } else {
        terminal::display(data)?;
        Ok(None)
    }
}
