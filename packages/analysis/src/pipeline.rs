//! Merge and derivation steps of the category area pipeline.
//!
//! Each step writes only the fields of the category it is given, so the
//! three category pipelines can run in any order on the same records.

use geo::Area;
use land_use_models::{CategoryAreaSummary, FillPolicy, LandUseCategory, PostalAreaRecord};

use crate::overlay::M2_PER_KM2;
use crate::ratio::{per_capita_m2, percentage};

/// Computes the total boundary area in km² for every record,
/// overwriting any previous value.
pub fn total_areas(records: &mut [PostalAreaRecord]) {
    for record in records {
        record.total_area_km2 = Some(record.boundary.unsigned_area() / M2_PER_KM2);
    }
}

/// Left-merges a summary onto the records by postal code.
///
/// Records absent from the summary get the fill policy's value. Returns
/// the number of records that were filled.
pub fn merge_summary(
    records: &mut [PostalAreaRecord],
    summary: &CategoryAreaSummary,
    fill: FillPolicy,
) -> usize {
    let mut filled = 0;

    for record in records {
        let area = summary.area_km2(&record.postal_code).or_else(|| {
            filled += 1;
            fill.fill_value()
        });
        record.stats_mut(summary.category).area_km2 = area;
    }

    filled
}

/// Derives `area / total * 100` for one category on every record.
pub fn derive_percentages(records: &mut [PostalAreaRecord], category: LandUseCategory) {
    for record in records {
        let total = record.total_area_km2;
        let stats = record.stats_mut(category);
        stats.percentage = percentage(stats.area_km2, total);
    }
}

/// Derives green area per resident for a reference year.
pub fn derive_green_per_capita(records: &mut [PostalAreaRecord], year: u16) {
    for record in records {
        record.green_area_per_capita_m2 =
            per_capita_m2(record.green.area_km2, record.population(year));
    }
}
