#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Postal-area and land-use record types.
//!
//! A [`PostalAreaRecord`] is loaded once per postal-code area and then
//! enriched by each analysis stage. Derived values use `Option` as the
//! missing-value marker: `None` means "no data" or "undefined ratio",
//! never zero.

use std::collections::BTreeMap;

use geo::{MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Land-use category of a polygon set.
///
/// The declaration order (green, industrial, other) is the evaluation
/// order used when selecting a dominant category; ties go to the earlier
/// variant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LandUseCategory {
    /// Parks, forests and other green space.
    Green,
    /// Industrial areas.
    Industrial,
    /// Other built-up area, mainly residential and commercial.
    Other,
}

impl LandUseCategory {
    /// All categories in evaluation order.
    pub const ALL: [Self; 3] = [Self::Green, Self::Industrial, Self::Other];

    /// Label used for the dominant land-use field.
    #[must_use]
    pub const fn dominant_label(self) -> &'static str {
        match self {
            Self::Green => "Green area",
            Self::Industrial => "Industrial",
            Self::Other => "Residential or commercial",
        }
    }

    /// Bar label used in land-use charts.
    #[must_use]
    pub const fn chart_label(self) -> &'static str {
        match self {
            Self::Green => "Green area",
            Self::Industrial => "Industrial area",
            Self::Other => "Other land use",
        }
    }

    /// How postal areas without any intersecting polygon are filled.
    ///
    /// Green areas stay missing so the per-capita figure is missing too;
    /// the other categories are zero-filled.
    #[must_use]
    pub const fn fill_policy(self) -> FillPolicy {
        match self {
            Self::Green => FillPolicy::KeepMissing,
            Self::Industrial | Self::Other => FillPolicy::Zero,
        }
    }
}

/// What a merge writes for postal areas absent from an area summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPolicy {
    /// Leave the area as the missing marker.
    KeepMissing,
    /// Treat the area as zero square kilometers.
    Zero,
}

impl FillPolicy {
    /// Value written for an unmatched postal area.
    #[must_use]
    pub const fn fill_value(self) -> Option<f64> {
        match self {
            Self::KeepMissing => None,
            Self::Zero => Some(0.0),
        }
    }
}

/// Area and share of one land-use category inside a postal area.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LandUseStats {
    /// Summed intersection area in km².
    pub area_km2: Option<f64>,
    /// `area_km2 / total_area_km2 * 100`, rounded to one decimal.
    pub percentage: Option<f64>,
}

/// Population change between two reference years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationChange {
    /// Earlier reference year.
    pub from_year: u16,
    /// Later reference year.
    pub to_year: u16,
    /// Later population minus earlier population.
    pub change: i64,
    /// `change / earlier * 100`, rounded to one decimal.
    ///
    /// Not guarded: a zero earlier population yields an infinite value
    /// (or NaN when both years are zero).
    pub percentage: f64,
}

/// One postal-code area and everything derived for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PostalAreaRecord {
    /// Postal code, unique within a collection (e.g. "00100").
    pub postal_code: String,
    /// Display name (e.g. "Helsinki keskusta - Etu-Töölö").
    pub name: String,
    /// Municipality code the area belongs to (e.g. "091").
    pub municipality: String,
    /// Boundary in a planar, meter-based coordinate system.
    pub boundary: MultiPolygon<f64>,
    /// Population per reference year.
    pub population: BTreeMap<u16, i64>,
    /// Total boundary area in km².
    pub total_area_km2: Option<f64>,
    /// Green area statistics.
    pub green: LandUseStats,
    /// Industrial area statistics.
    pub industrial: LandUseStats,
    /// Other built-up area statistics.
    pub other: LandUseStats,
    /// Green area in m² per resident.
    pub green_area_per_capita_m2: Option<f64>,
    /// Category with the largest percentage.
    pub dominant_land_use: Option<LandUseCategory>,
    /// Population change between two reference years.
    pub population_change: Option<PopulationChange>,
}

impl PostalAreaRecord {
    /// Creates a record with no derived fields filled in.
    #[must_use]
    pub fn new(
        postal_code: impl Into<String>,
        name: impl Into<String>,
        municipality: impl Into<String>,
        boundary: MultiPolygon<f64>,
    ) -> Self {
        Self {
            postal_code: postal_code.into(),
            name: name.into(),
            municipality: municipality.into(),
            boundary,
            population: BTreeMap::new(),
            total_area_km2: None,
            green: LandUseStats::default(),
            industrial: LandUseStats::default(),
            other: LandUseStats::default(),
            green_area_per_capita_m2: None,
            dominant_land_use: None,
            population_change: None,
        }
    }

    /// Sets the population for a reference year.
    #[must_use]
    pub fn with_population(mut self, year: u16, population: i64) -> Self {
        self.population.insert(year, population);
        self
    }

    /// Population for a reference year, if known.
    #[must_use]
    pub fn population(&self, year: u16) -> Option<i64> {
        self.population.get(&year).copied()
    }

    /// Statistics for one category.
    #[must_use]
    pub const fn stats(&self, category: LandUseCategory) -> &LandUseStats {
        match category {
            LandUseCategory::Green => &self.green,
            LandUseCategory::Industrial => &self.industrial,
            LandUseCategory::Other => &self.other,
        }
    }

    /// Mutable statistics for one category.
    pub const fn stats_mut(&mut self, category: LandUseCategory) -> &mut LandUseStats {
        match category {
            LandUseCategory::Green => &mut self.green,
            LandUseCategory::Industrial => &mut self.industrial,
            LandUseCategory::Other => &mut self.other,
        }
    }
}

/// Polygons of a single land-use category.
#[derive(Debug, Clone, PartialEq)]
pub struct LandUsePolygonSet {
    /// Category every polygon in the set belongs to.
    pub category: LandUseCategory,
    /// Member polygons in a planar, meter-based coordinate system.
    pub polygons: Vec<Polygon<f64>>,
}

impl LandUsePolygonSet {
    /// Creates a polygon set for a category.
    #[must_use]
    pub const fn new(category: LandUseCategory, polygons: Vec<Polygon<f64>>) -> Self {
        Self { category, polygons }
    }

    /// Number of polygons in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Whether the set has no polygons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// Summed intersection area per postal code for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAreaSummary {
    /// Category the areas were computed for.
    pub category: LandUseCategory,
    /// Postal code -> summed intersection area in km².
    pub areas_km2: BTreeMap<String, f64>,
    /// Number of non-empty intersection fragments that were summed.
    pub fragment_count: usize,
}

impl CategoryAreaSummary {
    /// Creates an empty summary.
    #[must_use]
    pub const fn new(category: LandUseCategory) -> Self {
        Self {
            category,
            areas_km2: BTreeMap::new(),
            fragment_count: 0,
        }
    }

    /// Adds one intersection fragment's area to a postal code's total.
    pub fn add_fragment(&mut self, postal_code: &str, area_km2: f64) {
        *self.areas_km2.entry(postal_code.to_string()).or_insert(0.0) += area_km2;
        self.fragment_count += 1;
    }

    /// Summed area for a postal code, if any fragment intersected it.
    #[must_use]
    pub fn area_km2(&self, postal_code: &str) -> Option<f64> {
        self.areas_km2.get(postal_code).copied()
    }
}

/// Flat, geometry-free view of a [`PostalAreaRecord`] for tabular output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostalAreaRow {
    /// Postal code.
    pub postal_code: String,
    /// Display name.
    pub name: String,
    /// Municipality code.
    pub municipality: String,
    /// Total boundary area in km².
    pub total_area_km2: Option<f64>,
    /// Green area in km².
    pub green_area_km2: Option<f64>,
    /// Green area share of the total area.
    pub green_area_percentage: Option<f64>,
    /// Green area in m² per resident.
    pub green_area_per_capita_m2: Option<f64>,
    /// Industrial area in km².
    pub industrial_area_km2: Option<f64>,
    /// Industrial area share of the total area.
    pub industrial_area_percentage: Option<f64>,
    /// Other built-up area in km².
    pub other_area_km2: Option<f64>,
    /// Other built-up area share of the total area.
    pub other_area_percentage: Option<f64>,
    /// Dominant land-use label (e.g. "Green area").
    pub dominant_land_use: Option<String>,
    /// Population change.
    pub population_change: Option<i64>,
    /// Population change relative to the earlier year.
    pub population_change_percentage: Option<f64>,
}

impl PostalAreaRow {
    /// Percentage for one category.
    #[must_use]
    pub const fn percentage(&self, category: LandUseCategory) -> Option<f64> {
        match category {
            LandUseCategory::Green => self.green_area_percentage,
            LandUseCategory::Industrial => self.industrial_area_percentage,
            LandUseCategory::Other => self.other_area_percentage,
        }
    }
}

impl From<&PostalAreaRecord> for PostalAreaRow {
    fn from(record: &PostalAreaRecord) -> Self {
        Self {
            postal_code: record.postal_code.clone(),
            name: record.name.clone(),
            municipality: record.municipality.clone(),
            total_area_km2: record.total_area_km2,
            green_area_km2: record.green.area_km2,
            green_area_percentage: record.green.percentage,
            green_area_per_capita_m2: record.green_area_per_capita_m2,
            industrial_area_km2: record.industrial.area_km2,
            industrial_area_percentage: record.industrial.percentage,
            other_area_km2: record.other.area_km2,
            other_area_percentage: record.other.percentage,
            dominant_land_use: record
                .dominant_land_use
                .map(|c| c.dominant_label().to_string()),
            population_change: record.population_change.map(|c| c.change),
            population_change_percentage: record.population_change.map(|c| c.percentage),
        }
    }
}
