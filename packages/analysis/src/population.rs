//! Population change between two reference years.

use land_use_models::{PopulationChange, PostalAreaRecord};

use crate::ratio::round1;

/// Change from `earlier` to `later`, with the percentage relative to
/// `earlier`.
///
/// The percentage is not guarded: an earlier population of zero yields
/// an infinite value, or NaN when both are zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn change_between(
    from_year: u16,
    earlier: i64,
    to_year: u16,
    later: i64,
) -> PopulationChange {
    let change = later - earlier;

    PopulationChange {
        from_year,
        to_year,
        change,
        percentage: round1(change as f64 / earlier as f64 * 100.0),
    }
}

/// Computes population change for every record.
///
/// Records missing either year get `None`. Returns the number of records
/// whose percentage is not finite.
pub fn population_change(
    records: &mut [PostalAreaRecord],
    from_year: u16,
    to_year: u16,
) -> usize {
    let mut undefined = 0;

    for record in records {
        let years = (record.population(from_year), record.population(to_year));
        record.population_change = match years {
            (Some(earlier), Some(later)) => {
                let change = change_between(from_year, earlier, to_year, later);
                if !change.percentage.is_finite() {
                    log::warn!(
                        "{} ({}): population change {from_year}->{to_year} is undefined \
                         (population {earlier} in {from_year})",
                        record.postal_code,
                        record.name,
                    );
                    undefined += 1;
                }
                Some(change)
            }
            _ => None,
        };
    }

    undefined
}
