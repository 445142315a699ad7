//! Analysis configuration, deserialized from TOML.
//!
//! A configuration names the postal-area dataset, how to read its
//! properties, one land-use dataset per category, the population years
//! to compare, and the projection to apply on ingestion.

use std::path::{Path, PathBuf};

use land_use_analysis::OverlayOptions;
use land_use_models::LandUseCategory;
use serde::{Deserialize, Serialize};

use crate::SourceError;
use crate::projection::Projection;

/// One complete analysis run, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Unique identifier (e.g. `"helsinki"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Keep only postal areas whose municipality code starts with this.
    pub municipality_code: Option<String>,
    /// Postal-area dataset.
    pub postal_areas: PostalAreaSource,
    /// Land-use datasets, one per category.
    pub land_use: LandUseSources,
    /// Population reference years.
    pub population: PopulationYears,
    /// Projection applied to every input coordinate.
    #[serde(default)]
    pub projection: Projection,
    /// Overlay engine settings.
    #[serde(default)]
    pub overlay: OverlayOptions,
}

/// Where postal-area polygons come from and how to read their properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostalAreaSource {
    /// Path to a `GeoJSON` `FeatureCollection`.
    pub path: PathBuf,
    /// Property names.
    pub fields: PostalFieldMapping,
}

/// Property names holding each postal-area attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostalFieldMapping {
    /// Property containing the postal code.
    pub postal_code: String,
    /// Property containing the display name.
    pub name: String,
    /// Property containing the municipality code.
    pub municipality: String,
    /// Population properties, one per reference year.
    #[serde(default)]
    pub population: Vec<PopulationField>,
}

/// Property holding the population of one reference year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationField {
    /// Reference year.
    pub year: u16,
    /// Property name.
    pub property: String,
}

/// Land-use dataset paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandUseSources {
    /// Green space polygons.
    pub green: PathBuf,
    /// Industrial area polygons.
    pub industrial: PathBuf,
    /// Other built-up area polygons.
    pub other: PathBuf,
}

impl LandUseSources {
    /// Dataset path for a category.
    #[must_use]
    pub fn path(&self, category: LandUseCategory) -> &Path {
        match category {
            LandUseCategory::Green => &self.green,
            LandUseCategory::Industrial => &self.industrial,
            LandUseCategory::Other => &self.other,
        }
    }
}

/// Population years used by the derived fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PopulationYears {
    /// Earlier year of the population change.
    pub from_year: u16,
    /// Later year of the population change.
    pub to_year: u16,
    /// Year used for green area per resident.
    pub per_capita_year: u16,
}

impl AnalysisConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Toml`] if the text is not a valid
    /// configuration, or [`SourceError::Config`] if a population year is
    /// referenced without a matching population property.
    pub fn from_toml(text: &str) -> Result<Self, SourceError> {
        let config: Self = toml::de::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file. Relative dataset paths are resolved
    /// against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::from_toml(&text)?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }

        Ok(config)
    }

    /// Prefixes every relative dataset path with `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.postal_areas.path);
        resolve(&mut self.land_use.green);
        resolve(&mut self.land_use.industrial);
        resolve(&mut self.land_use.other);
    }

    fn validate(&self) -> Result<(), SourceError> {
        let years = &self.population;
        for year in [years.from_year, years.to_year, years.per_capita_year] {
            let known = self
                .postal_areas
                .fields
                .population
                .iter()
                .any(|f| f.year == year);
            if !known {
                return Err(SourceError::Config {
                    message: format!(
                        "{}: population year {year} has no population property",
                        self.id
                    ),
                });
            }
        }
        Ok(())
    }
}
