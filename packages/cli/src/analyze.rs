//! Full analysis run: load, enrich, export, and optionally chart.

use std::path::Path;
use std::time::Instant;

use land_use_analysis::dominant::assign_dominant_land_use;
use land_use_analysis::population::population_change;
use land_use_analysis::progress::ProgressCallback;
use land_use_analysis::{LandUseAggregator, OverlayOptions};
use land_use_chart::ChartData;
use land_use_cli_utils::{IndicatifProgress, MultiProgress};
use land_use_models::{LandUseCategory, LandUsePolygonSet, PostalAreaRecord, PostalAreaRow};
use land_use_source::config::{AnalysisConfig, PopulationYears};
use land_use_source::{export, load};

/// Runs every stage for `config` and writes the outputs to `output_dir`.
///
/// # Errors
///
/// Returns an error if any input cannot be loaded, any output cannot be
/// written, or a requested chart's postal code is not in the results.
pub fn run(
    config: &AnalysisConfig,
    output_dir: &Path,
    plots: &[String],
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    log::info!("Running analysis '{}' ({})", config.id, config.name);

    let mut records = load::load_postal_areas(config)?;
    if records.is_empty() {
        log::warn!("{}: no postal areas to analyze", config.id);
    }

    let sets = LandUseCategory::ALL
        .into_iter()
        .map(|category| load::load_land_use(config, category))
        .collect::<Result<Vec<_>, _>>()?;

    enrich(
        &mut records,
        sets,
        config.overlay,
        config.population,
        |category| IndicatifProgress::overlay_bar(multi, &format!("Overlaying {category} areas")),
    );

    export::write_outputs(&records, output_dir)?;

    let rows: Vec<PostalAreaRow> = records.iter().map(PostalAreaRow::from).collect();
    for postal_code in plots {
        let data = ChartData::for_postal_code(&rows, postal_code)?;
        land_use_chart::show(&data, true, output_dir)?;
    }

    log::info!(
        "Analysis '{}' finished: {} postal areas in {:.1}s",
        config.id,
        records.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Runs the category pipelines, the dominant selector and the population
/// change on already loaded data.
pub fn enrich(
    records: &mut [PostalAreaRecord],
    sets: Vec<LandUsePolygonSet>,
    overlay: OverlayOptions,
    years: PopulationYears,
    progress: impl Fn(LandUseCategory) -> std::sync::Arc<dyn ProgressCallback>,
) {
    for mut set in sets {
        let aggregator = LandUseAggregator::new(overlay, years.per_capita_year)
            .with_progress(progress(set.category));
        aggregator.apply(records, &mut set);
    }

    assign_dominant_land_use(records);

    let undefined = population_change(records, years.from_year, years.to_year);
    if undefined > 0 {
        log::warn!(
            "{undefined} postal areas had no population in {}; change percentage undefined",
            years.from_year
        );
    }
}
