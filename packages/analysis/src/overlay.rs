//! Intersection of postal-area boundaries with a land-use polygon set.
//!
//! Land-use polygons are bulk-loaded into an R-tree keyed by bounding
//! box. Each postal boundary only intersects the polygons whose envelope
//! overlaps its own; every non-empty intersection fragment is summed into
//! a [`CategoryAreaSummary`] under the boundary's postal code.

use std::sync::Arc;

use geo::{Area, BooleanOps, BoundingRect, MultiPolygon, Polygon};
use land_use_models::{CategoryAreaSummary, LandUsePolygonSet, PostalAreaRecord};
use rstar::{AABB, RTree, RTreeObject};

use crate::progress::ProgressCallback;

/// Square meters per square kilometer.
pub const M2_PER_KM2: f64 = 1_000_000.0;

/// A land-use polygon stored in the R-tree with its envelope.
struct LandUseEntry<'a> {
    envelope: AABB<[f64; 2]>,
    polygon: &'a Polygon<f64>,
}

impl RTreeObject for LandUseEntry<'_> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Candidate lookup over a land-use polygon set.
enum Candidates<'a> {
    Indexed(RTree<LandUseEntry<'a>>),
    Scan(&'a [Polygon<f64>]),
}

impl<'a> Candidates<'a> {
    fn build(set: &'a LandUsePolygonSet, spatial_index: bool) -> Self {
        if !spatial_index {
            return Self::Scan(&set.polygons);
        }

        let entries = set
            .polygons
            .iter()
            .filter_map(|polygon| {
                let rect = polygon.bounding_rect()?;
                Some(LandUseEntry {
                    envelope: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                    polygon,
                })
            })
            .collect();

        Self::Indexed(RTree::bulk_load(entries))
    }

    fn near(&self, boundary: &MultiPolygon<f64>) -> Vec<&'a Polygon<f64>> {
        match self {
            Self::Scan(polygons) => polygons.iter().collect(),
            Self::Indexed(tree) => {
                let Some(rect) = boundary.bounding_rect() else {
                    return Vec::new();
                };
                let query = AABB::from_corners(
                    [rect.min().x, rect.min().y],
                    [rect.max().x, rect.max().y],
                );
                tree.locate_in_envelope_intersecting(&query)
                    .map(|entry| entry.polygon)
                    .collect()
            }
        }
    }
}

/// Intersects every postal boundary with every land-use polygon and sums
/// the fragment areas in km² by postal code.
///
/// Postal codes with no non-empty fragment are absent from the summary.
/// With `spatial_index` disabled every pair is intersected; the result is
/// the same, only slower.
#[must_use]
pub fn overlay_aggregate(
    records: &[PostalAreaRecord],
    land_use: &LandUsePolygonSet,
    spatial_index: bool,
    progress: &Arc<dyn ProgressCallback>,
) -> CategoryAreaSummary {
    let candidates = Candidates::build(land_use, spatial_index);
    let mut summary = CategoryAreaSummary::new(land_use.category);

    progress.set_total(records.len() as u64);
    progress.set_message(format!("Overlaying {} areas", land_use.category));

    for record in records {
        for polygon in candidates.near(&record.boundary) {
            let fragment = record.boundary.intersection(polygon);
            if fragment.0.is_empty() {
                continue;
            }
            summary.add_fragment(&record.postal_code, fragment.unsigned_area() / M2_PER_KM2);
        }
        progress.inc(1);
    }

    progress.finish(format!(
        "{}: {} fragments in {} postal areas",
        land_use.category,
        summary.fragment_count,
        summary.areas_km2.len()
    ));

    summary
}
