#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Land-use composition and population statistics for postal-code areas.
//!
//! The [`LandUseAggregator`] runs one parametrised pipeline per land-use
//! category:
//!
//! 1. total boundary area per postal area (km²)
//! 2. repair of the land-use polygons ([`repair`])
//! 3. intersection and per-postal-code summation ([`overlay`])
//! 4. left merge with the category's [`FillPolicy`] ([`pipeline`])
//! 5. percentage of total area, plus per-capita area for green space
//!
//! [`dominant`] and [`population`] derive the remaining fields once the
//! category pipelines have run.
//!
//! [`FillPolicy`]: land_use_models::FillPolicy

pub mod dominant;
pub mod overlay;
pub mod pipeline;
pub mod population;
pub mod progress;
pub mod ratio;
pub mod repair;

use std::sync::Arc;

use land_use_models::{CategoryAreaSummary, LandUseCategory, LandUsePolygonSet, PostalAreaRecord};
use serde::{Deserialize, Serialize};

use crate::progress::{ProgressCallback, null_progress};

/// Overlay engine settings, fixed once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct OverlayOptions {
    /// Pre-filter candidate polygon pairs with an R-tree.
    pub spatial_index: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            spatial_index: true,
        }
    }
}

/// Runs the category area pipeline against a postal-area collection.
pub struct LandUseAggregator {
    options: OverlayOptions,
    per_capita_year: u16,
    progress: Arc<dyn ProgressCallback>,
}

impl LandUseAggregator {
    /// Creates an aggregator computing green area per resident for
    /// `per_capita_year`.
    #[must_use]
    pub fn new(options: OverlayOptions, per_capita_year: u16) -> Self {
        Self {
            options,
            per_capita_year,
            progress: null_progress(),
        }
    }

    /// Reports overlay progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// Enriches `records` with the area, percentage and (for green space)
    /// per-capita fields of `land_use`'s category.
    ///
    /// Repairs `land_use` in place. Returns the intermediate summary.
    pub fn apply(
        &self,
        records: &mut [PostalAreaRecord],
        land_use: &mut LandUsePolygonSet,
    ) -> CategoryAreaSummary {
        let category = land_use.category;
        log::info!(
            "Computing {category} areas for {} postal areas from {} polygons",
            records.len(),
            land_use.len()
        );

        pipeline::total_areas(records);
        repair::repair_set(land_use);

        let summary = overlay::overlay_aggregate(
            records,
            land_use,
            self.options.spatial_index,
            &self.progress,
        );

        let filled = pipeline::merge_summary(records, &summary, category.fill_policy());
        log::debug!("{category}: {filled} postal areas had no intersecting polygons");

        pipeline::derive_percentages(records, category);
        if category == LandUseCategory::Green {
            pipeline::derive_green_per_capita(records, self.per_capita_year);
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{MultiPolygon, Polygon, Rect, coord, polygon};

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        Rect::new(coord! { x: x, y: y }, coord! { x: x + size, y: y + size }).to_polygon()
    }

    fn boundary(x: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![square(x, 0.0, 1000.0)])
    }

    /// Two 1 km × 1 km postal areas side by side.
    fn postal_areas() -> Vec<PostalAreaRecord> {
        vec![
            PostalAreaRecord::new("00100", "West", "091", boundary(0.0))
                .with_population(2020, 1000),
            PostalAreaRecord::new("00120", "East", "091", boundary(1000.0))
                .with_population(2020, 0),
        ]
    }

    fn aggregator() -> LandUseAggregator {
        LandUseAggregator::new(OverlayOptions::default(), 2020)
    }

    #[test]
    fn green_pipeline_fills_area_percentage_and_per_capita() {
        let mut records = postal_areas();
        let mut green = LandUsePolygonSet::new(
            LandUseCategory::Green,
            vec![square(0.0, 0.0, 500.0), square(1500.0, 0.0, 500.0)],
        );

        aggregator().apply(&mut records, &mut green);

        assert!((records[0].green.area_km2.unwrap() - 0.25).abs() < 1e-9);
        assert_eq!(records[0].green.percentage, Some(25.0));
        assert_eq!(records[0].green_area_per_capita_m2, Some(250.0));

        assert_eq!(records[1].green.percentage, Some(25.0));
        assert_eq!(records[1].green_area_per_capita_m2, None);
    }

    #[test]
    fn disjoint_inputs_follow_fill_policy() {
        let far_away = || vec![square(10_000.0, 10_000.0, 100.0)];

        let mut records = postal_areas();
        for category in LandUseCategory::ALL {
            let mut set = LandUsePolygonSet::new(category, far_away());
            aggregator().apply(&mut records, &mut set);
        }

        for record in &records {
            assert_eq!(record.green.area_km2, None);
            assert_eq!(record.green.percentage, None);
            assert_eq!(record.green_area_per_capita_m2, None);
            assert_eq!(record.industrial.area_km2, Some(0.0));
            assert_eq!(record.industrial.percentage, Some(0.0));
            assert_eq!(record.other.area_km2, Some(0.0));
            assert_eq!(record.other.percentage, Some(0.0));
        }
    }

    #[test]
    fn industrial_and_other_commute() {
        let industrial = || {
            LandUsePolygonSet::new(LandUseCategory::Industrial, vec![square(0.0, 0.0, 300.0)])
        };
        let other = || {
            LandUsePolygonSet::new(LandUseCategory::Other, vec![square(800.0, 0.0, 700.0)])
        };

        let mut forward = postal_areas();
        aggregator().apply(&mut forward, &mut industrial());
        aggregator().apply(&mut forward, &mut other());

        let mut backward = postal_areas();
        aggregator().apply(&mut backward, &mut other());
        aggregator().apply(&mut backward, &mut industrial());

        for (a, b) in forward.iter().zip(&backward) {
            assert_eq!(a.industrial.percentage, b.industrial.percentage);
            assert_eq!(a.other.percentage, b.other.percentage);
        }
        assert_eq!(forward[0].industrial.percentage, Some(9.0));
        assert_eq!(forward[0].other.percentage, Some(14.0));
        assert_eq!(forward[1].other.percentage, Some(35.0));
    }

    #[test]
    fn self_intersecting_input_is_repaired_not_rejected() {
        let mut records = postal_areas();
        let bowtie = polygon![
            (x: 0.0, y: 0.0),
            (x: 200.0, y: 200.0),
            (x: 200.0, y: 0.0),
            (x: 0.0, y: 200.0),
            (x: 0.0, y: 0.0),
        ];
        let mut set = LandUsePolygonSet::new(LandUseCategory::Other, vec![bowtie]);

        let summary = aggregator().apply(&mut records, &mut set);

        assert_eq!(set.len(), 2);
        assert_eq!(summary.fragment_count, 2);
        assert!((records[0].other.area_km2.unwrap() - 0.02).abs() < 1e-9);
        assert_eq!(records[0].other.percentage, Some(2.0));
    }

    #[test]
    fn percentages_need_not_sum_to_hundred() {
        let mut records = postal_areas();
        let overlapping = || vec![square(0.0, 0.0, 800.0)];
        for category in LandUseCategory::ALL {
            let mut set = LandUsePolygonSet::new(category, overlapping());
            aggregator().apply(&mut records, &mut set);
        }

        let r = &records[0];
        let sum = r.green.percentage.unwrap()
            + r.industrial.percentage.unwrap()
            + r.other.percentage.unwrap();
        assert!((sum - 192.0).abs() < 1e-9);
    }
}
