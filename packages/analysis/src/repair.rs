//! Geometry repair for land-use polygons.
//!
//! Self-intersecting rings are resolved by running each polygon through
//! the boolean-ops engine against an empty operand, which rebuilds it as
//! one or more valid simple polygons. Polygons left with no area are
//! dropped. Repair never fails.

use geo::{Area, BooleanOps, MultiPolygon, Polygon};
use land_use_models::LandUsePolygonSet;

/// Repairs one polygon into zero or more valid polygons.
#[must_use]
pub fn repair_polygon(polygon: &Polygon<f64>) -> Vec<Polygon<f64>> {
    let empty: MultiPolygon<f64> = MultiPolygon(Vec::new());

    polygon
        .union(&empty)
        .0
        .into_iter()
        .filter(|p| p.unsigned_area() > 0.0)
        .collect()
}

/// Repairs every polygon of a set in place.
///
/// Returns the number of input polygons that were dropped because they
/// had no area.
pub fn repair_set(set: &mut LandUsePolygonSet) -> usize {
    let before = set.polygons.len();
    let mut dropped = 0;

    set.polygons = set
        .polygons
        .iter()
        .flat_map(|polygon| {
            let repaired = repair_polygon(polygon);
            if repaired.is_empty() {
                dropped += 1;
            }
            repaired
        })
        .collect();

    log::debug!(
        "Repaired {} {} polygons into {} ({dropped} degenerate dropped)",
        before,
        set.category,
        set.polygons.len(),
    );

    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{BoundingRect, polygon};
    use land_use_models::LandUseCategory;

    fn total_area(polygons: &[Polygon<f64>]) -> f64 {
        polygons.iter().map(Area::unsigned_area).sum()
    }

    #[test]
    fn bowtie_is_split_into_valid_parts() {
        let bowtie = polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 2.0, y: 0.0),
            (x: 0.0, y: 2.0),
            (x: 0.0, y: 0.0),
        ];
        assert!(bowtie.unsigned_area() < 1e-9);

        let repaired = repair_polygon(&bowtie);

        assert_eq!(repaired.len(), 2);
        assert!((total_area(&repaired) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_polygon_is_dropped() {
        let line = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 0.0),
        ];
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ];
        let mut set = LandUsePolygonSet::new(LandUseCategory::Green, vec![line, square]);

        let dropped = repair_set(&mut set);

        assert_eq!(dropped, 1);
        assert_eq!(set.len(), 1);
        assert!((total_area(&set.polygons) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn repair_is_idempotent() {
        let square = polygon![
            (x: 10.0, y: 10.0),
            (x: 20.0, y: 10.0),
            (x: 20.0, y: 20.0),
            (x: 10.0, y: 20.0),
            (x: 10.0, y: 10.0),
        ];
        let with_hole = polygon!(
            exterior: [
                (x: 0.0, y: 0.0),
                (x: 8.0, y: 0.0),
                (x: 8.0, y: 8.0),
                (x: 0.0, y: 8.0),
                (x: 0.0, y: 0.0),
            ],
            interiors: [[
                (x: 2.0, y: 2.0),
                (x: 4.0, y: 2.0),
                (x: 4.0, y: 4.0),
                (x: 2.0, y: 4.0),
                (x: 2.0, y: 2.0),
            ]],
        );
        let mut once = LandUsePolygonSet::new(LandUseCategory::Other, vec![square, with_hole]);
        repair_set(&mut once);
        let mut twice = once.clone();
        repair_set(&mut twice);

        assert_eq!(once.len(), twice.len());
        for (a, b) in once.polygons.iter().zip(&twice.polygons) {
            assert!((a.unsigned_area() - b.unsigned_area()).abs() < 1e-9);
            assert_eq!(a.interiors().len(), b.interiors().len());
            let (ra, rb) = (a.bounding_rect().unwrap(), b.bounding_rect().unwrap());
            assert!((ra.min().x - rb.min().x).abs() < 1e-9);
            assert!((ra.max().y - rb.max().y).abs() < 1e-9);
        }
        assert!((total_area(&once.polygons) - 160.0).abs() < 1e-9);
    }
}
