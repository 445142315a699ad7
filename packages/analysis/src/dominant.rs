//! Dominant land-use selection.

use land_use_models::{LandUseCategory, PostalAreaRecord};

/// Category with the largest percentage.
///
/// Missing percentages count as zero. Categories are compared in
/// [`LandUseCategory::ALL`] order and only a strictly larger value
/// replaces the current pick, so ties go to green, then industrial.
#[must_use]
pub fn dominant_category(record: &PostalAreaRecord) -> LandUseCategory {
    let mut best = LandUseCategory::ALL[0];
    let mut best_value = f64::NEG_INFINITY;

    for category in LandUseCategory::ALL {
        let value = record.stats(category).percentage.unwrap_or(0.0);
        if value > best_value {
            best = category;
            best_value = value;
        }
    }

    best
}

/// Assigns the dominant land-use category to every record.
pub fn assign_dominant_land_use(records: &mut [PostalAreaRecord]) {
    for record in records {
        record.dominant_land_use = Some(dominant_category(record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::MultiPolygon;

    fn with_percentages(
        green: Option<f64>,
        industrial: Option<f64>,
        other: Option<f64>,
    ) -> PostalAreaRecord {
        let mut record = PostalAreaRecord::new("00100", "Test", "091", MultiPolygon(vec![]));
        record.green.percentage = green;
        record.industrial.percentage = industrial;
        record.other.percentage = other;
        record
    }

    #[test]
    fn picks_largest_share() {
        let record = with_percentages(Some(50.0), Some(30.0), Some(20.0));
        assert_eq!(dominant_category(&record).dominant_label(), "Green area");

        let record = with_percentages(Some(5.0), Some(30.0), Some(60.0));
        assert_eq!(
            dominant_category(&record).dominant_label(),
            "Residential or commercial"
        );
    }

    #[test]
    fn ties_go_to_earlier_category() {
        let record = with_percentages(Some(40.0), Some(40.0), Some(20.0));
        assert_eq!(dominant_category(&record), LandUseCategory::Green);

        let record = with_percentages(Some(10.0), Some(45.0), Some(45.0));
        assert_eq!(dominant_category(&record), LandUseCategory::Industrial);
    }

    #[test]
    fn missing_counts_as_zero() {
        let record = with_percentages(None, Some(0.0), Some(0.5));
        assert_eq!(dominant_category(&record), LandUseCategory::Other);

        let record = with_percentages(None, None, None);
        assert_eq!(dominant_category(&record), LandUseCategory::Green);
    }

    #[test]
    fn assigns_every_record() {
        let mut records = vec![
            with_percentages(Some(1.0), Some(2.0), Some(3.0)),
            with_percentages(Some(3.0), Some(2.0), Some(1.0)),
        ];
        assign_dominant_land_use(&mut records);
        assert_eq!(records[0].dominant_land_use, Some(LandUseCategory::Other));
        assert_eq!(records[1].dominant_land_use, Some(LandUseCategory::Green));
    }
}
