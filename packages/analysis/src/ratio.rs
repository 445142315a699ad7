//! Rounding and ratio helpers shared by every derived field.

/// Rounds to one decimal place, with exact halves going to the even
/// digit (6.25 becomes 6.2).
///
/// Non-finite values pass through unchanged.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// `part / whole * 100`, rounded to one decimal.
///
/// Returns `None` when either side is missing or the ratio is undefined
/// (zero or non-finite `whole`).
#[must_use]
pub fn percentage(part: Option<f64>, whole: Option<f64>) -> Option<f64> {
    let value = part? / whole? * 100.0;
    value.is_finite().then(|| round1(value))
}

/// Green area in m² per resident, rounded to one decimal.
///
/// Returns `None` when the area is missing, the population is absent, or
/// the population is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn per_capita_m2(area_km2: Option<f64>, population: Option<i64>) -> Option<f64> {
    let value = area_km2? * 1_000_000.0 / population? as f64;
    value.is_finite().then(|| round1(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_one_decimal() {
        assert!((round1(12.345) - 12.3).abs() < f64::EPSILON);
        assert!((round1(0.96) - 1.0).abs() < f64::EPSILON);
        assert!((round1(-0.04) - 0.0).abs() < f64::EPSILON);
        assert!(round1(f64::INFINITY).is_infinite());
    }

    #[test]
    fn halves_round_to_even() {
        assert!((round1(12.25) - 12.2).abs() < f64::EPSILON);
        assert!((round1(0.75) - 0.8).abs() < f64::EPSILON);
        assert!((round1(-2.5) - -2.5).abs() < f64::EPSILON);
        assert_eq!(percentage(Some(1.0), Some(16.0)), Some(6.2));
        assert_eq!(per_capita_m2(Some(0.5), Some(80_000)), Some(6.2));
    }

    #[test]
    fn percentage_of_whole() {
        assert_eq!(percentage(Some(1.0), Some(4.0)), Some(25.0));
        assert_eq!(percentage(Some(1.0), Some(3.0)), Some(33.3));
    }

    #[test]
    fn percentage_is_missing_for_zero_or_missing_inputs() {
        assert_eq!(percentage(Some(1.0), Some(0.0)), None);
        assert_eq!(percentage(Some(0.0), Some(0.0)), None);
        assert_eq!(percentage(None, Some(2.0)), None);
        assert_eq!(percentage(Some(1.0), None), None);
    }

    #[test]
    fn per_capita_converts_km2_to_m2() {
        assert_eq!(per_capita_m2(Some(0.5), Some(1000)), Some(500.0));
        assert_eq!(per_capita_m2(Some(0.001), Some(3)), Some(333.3));
    }

    #[test]
    fn per_capita_is_missing_without_population_or_area() {
        assert_eq!(per_capita_m2(Some(0.5), Some(0)), None);
        assert_eq!(per_capita_m2(Some(0.0), Some(0)), None);
        assert_eq!(per_capita_m2(None, Some(100)), None);
        assert_eq!(per_capita_m2(Some(0.5), None), None);
    }
}
