//! Loads postal areas and land-use polygons from `GeoJSON`.
//!
//! Uses the configuration's [`PostalFieldMapping`] to read attributes
//! regardless of the dataset's property naming, projects every
//! coordinate once, and skips features that carry no usable polygon.

use std::collections::BTreeSet;
use std::path::Path;

use geo::{Geometry, MultiPolygon, Polygon};
use geojson::{FeatureCollection, GeoJson, JsonObject};
use land_use_models::{LandUseCategory, LandUsePolygonSet, PostalAreaRecord};

use crate::SourceError;
use crate::config::{AnalysisConfig, PostalFieldMapping};
use crate::projection::Projection;

/// Loads, projects and municipality-filters the postal areas of a
/// configuration.
///
/// # Errors
///
/// Returns [`SourceError`] if the dataset cannot be read or is not a
/// `GeoJSON` `FeatureCollection`.
pub fn load_postal_areas(config: &AnalysisConfig) -> Result<Vec<PostalAreaRecord>, SourceError> {
    let path = &config.postal_areas.path;
    let text = read(path)?;
    let records = parse_postal_areas(
        &text,
        &config.postal_areas.fields,
        &config.projection,
        config.municipality_code.as_deref(),
    )?;

    match config.municipality_code.as_deref() {
        Some(code) => log::info!(
            "{}: loaded {} postal areas in municipality {code}",
            path.display(),
            records.len()
        ),
        None => log::info!("{}: loaded {} postal areas", path.display(), records.len()),
    }

    Ok(records)
}

/// Loads and projects the land-use polygons of one category.
///
/// # Errors
///
/// Returns [`SourceError`] if the dataset cannot be read or is not a
/// `GeoJSON` `FeatureCollection`.
pub fn load_land_use(
    config: &AnalysisConfig,
    category: LandUseCategory,
) -> Result<LandUsePolygonSet, SourceError> {
    let path = config.land_use.path(category);
    let text = read(path)?;
    let set = parse_land_use(&text, category, &config.projection)?;
    log::info!(
        "{}: loaded {} {category} polygons",
        path.display(),
        set.len()
    );
    Ok(set)
}

/// Parses postal-area features.
///
/// Features without a postal code or polygon geometry are skipped. With
/// `municipality` set, only features whose municipality code starts with
/// it are kept. Repeated postal codes after the first kept one are
/// skipped.
///
/// # Errors
///
/// Returns [`SourceError::GeoJson`] if `text` is not a
/// `FeatureCollection`.
pub fn parse_postal_areas(
    text: &str,
    fields: &PostalFieldMapping,
    projection: &Projection,
    municipality: Option<&str>,
) -> Result<Vec<PostalAreaRecord>, SourceError> {
    let collection = parse_collection(text)?;
    let mut records = Vec::with_capacity(collection.features.len());
    let mut seen = BTreeSet::new();
    let mut skipped = 0usize;

    for feature in collection.features {
        let Some(props) = feature.properties.as_ref() else {
            skipped += 1;
            continue;
        };
        let Some(postal_code) = property_string(props, &fields.postal_code) else {
            skipped += 1;
            continue;
        };
        let Some(boundary) = feature.geometry.and_then(to_multi_polygon) else {
            log::warn!("Postal area {postal_code} has no polygon geometry, skipping");
            skipped += 1;
            continue;
        };

        let municipality_code = property_string(props, &fields.municipality).unwrap_or_default();
        if municipality.is_some_and(|prefix| !municipality_code.starts_with(prefix)) {
            continue;
        }

        if !seen.insert(postal_code.clone()) {
            log::warn!("Duplicate postal code {postal_code}, keeping the first feature");
            skipped += 1;
            continue;
        }

        let mut record = PostalAreaRecord::new(
            postal_code,
            property_string(props, &fields.name).unwrap_or_default(),
            municipality_code,
            projection.project_multi_polygon(&boundary),
        );
        for field in &fields.population {
            if let Some(population) = property_population(props, &field.property) {
                record.population.insert(field.year, population);
            }
        }

        records.push(record);
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} postal area features");
    }

    Ok(records)
}

/// Parses land-use features into a polygon set. Multi-polygons are split
/// into their members; non-polygon features are skipped.
///
/// # Errors
///
/// Returns [`SourceError::GeoJson`] if `text` is not a
/// `FeatureCollection`.
pub fn parse_land_use(
    text: &str,
    category: LandUseCategory,
    projection: &Projection,
) -> Result<LandUsePolygonSet, SourceError> {
    let collection = parse_collection(text)?;
    let total = collection.features.len();

    let polygons: Vec<Polygon<f64>> = collection
        .features
        .into_iter()
        .filter_map(|f| f.geometry.and_then(to_multi_polygon))
        .flat_map(|mp| mp.0)
        .map(|p| projection.project_polygon(&p))
        .collect();

    if polygons.is_empty() && total > 0 {
        log::warn!("No polygon geometry among {total} {category} features");
    }

    Ok(LandUsePolygonSet::new(category, polygons))
}

fn read(path: &Path) -> Result<String, SourceError> {
    std::fs::read_to_string(path).map_err(|e| SourceError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_collection(text: &str) -> Result<FeatureCollection, SourceError> {
    let geojson: GeoJson = text.parse()?;
    Ok(FeatureCollection::try_from(geojson)?)
}

/// Converts a `GeoJSON` geometry to a [`MultiPolygon`].
/// Handles `Polygon`, `MultiPolygon` and collections of either.
fn to_multi_polygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geometry: Geometry<f64> = geometry.try_into().ok()?;
    let polygons = polygons_of(geometry);
    (!polygons.is_empty()).then(|| MultiPolygon(polygons))
}

fn polygons_of(geometry: Geometry<f64>) -> Vec<Polygon<f64>> {
    match geometry {
        Geometry::Polygon(p) => vec![p],
        Geometry::MultiPolygon(mp) => mp.0,
        Geometry::GeometryCollection(gc) => gc.0.into_iter().flat_map(polygons_of).collect(),
        _ => Vec::new(),
    }
}

/// Reads a property as text; numbers are formatted without quotes.
fn property_string(props: &JsonObject, key: &str) -> Option<String> {
    match props.get(key)? {
        serde_json::Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a population figure. Negative values mark suppressed figures
/// in the source data and are treated as missing.
#[allow(clippy::cast_possible_truncation)]
fn property_population(props: &JsonObject, key: &str) -> Option<i64> {
    let value = props.get(key)?;
    let population = value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.round() as i64))
        .or_else(|| value.as_str()?.trim().parse().ok())?;
    (population >= 0).then_some(population)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PopulationField;
    use geo::Area;

    fn fields() -> PostalFieldMapping {
        PostalFieldMapping {
            postal_code: "postinumeroalue".to_string(),
            name: "nimi".to_string(),
            municipality: "kunta".to_string(),
            population: vec![
                PopulationField {
                    year: 2019,
                    property: "pop_2019".to_string(),
                },
                PopulationField {
                    year: 2020,
                    property: "pop_2020".to_string(),
                },
            ],
        }
    }

    const POSTAL: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "type": "Feature",
          "properties": {"postinumeroalue": "00100", "nimi": "Helsinki keskusta", "kunta": "091", "pop_2019": 18000, "pop_2020": "18284"},
          "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1000,0],[1000,1000],[0,1000],[0,0]]]}
        },
        {
          "type": "Feature",
          "properties": {"postinumeroalue": "02100", "nimi": "Tapiola", "kunta": "049", "pop_2019": -1, "pop_2020": 9000.0},
          "geometry": {"type": "MultiPolygon", "coordinates": [[[[0,0],[10,0],[10,10],[0,10],[0,0]]], [[[20,20],[30,20],[30,30],[20,30],[20,20]]]]}
        },
        {
          "type": "Feature",
          "properties": {"postinumeroalue": "00100", "nimi": "Duplicate", "kunta": "091"},
          "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}
        },
        {
          "type": "Feature",
          "properties": {"postinumeroalue": "00120", "nimi": "Punavuori", "kunta": "091"},
          "geometry": {"type": "Point", "coordinates": [5, 5]}
        },
        {
          "type": "Feature",
          "properties": {"nimi": "No code", "kunta": "091"},
          "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}
        }
      ]
    }"#;

    #[test]
    fn parses_postal_areas_with_field_mapping() {
        let records = parse_postal_areas(POSTAL, &fields(), &Projection::Planar, None).unwrap();

        assert_eq!(records.len(), 2);
        let center = &records[0];
        assert_eq!(center.postal_code, "00100");
        assert_eq!(center.name, "Helsinki keskusta");
        assert_eq!(center.municipality, "091");
        assert_eq!(center.population(2019), Some(18_000));
        assert_eq!(center.population(2020), Some(18_284));
        assert!((center.boundary.unsigned_area() - 1_000_000.0).abs() < 1e-6);

        let tapiola = &records[1];
        assert_eq!(tapiola.boundary.0.len(), 2);
        assert_eq!(tapiola.population(2019), None);
        assert_eq!(tapiola.population(2020), Some(9000));
    }

    #[test]
    fn filters_by_municipality_prefix() {
        let parse = |prefix| {
            parse_postal_areas(POSTAL, &fields(), &Projection::Planar, prefix).unwrap()
        };

        let helsinki = parse(Some("091"));
        assert_eq!(helsinki.len(), 1);
        assert_eq!(helsinki[0].postal_code, "00100");

        assert_eq!(parse(Some("0")).len(), 2);
        assert!(parse(Some("092")).is_empty());
    }

    #[test]
    fn duplicate_from_another_municipality_does_not_hide_match() {
        let text = r#"{
          "type": "FeatureCollection",
          "features": [
            {
              "type": "Feature",
              "properties": {"postinumeroalue": "01200", "nimi": "Hakunila", "kunta": "092"},
              "geometry": {"type": "Polygon", "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]]]}
            },
            {
              "type": "Feature",
              "properties": {"postinumeroalue": "01200", "nimi": "Vaarala", "kunta": "091"},
              "geometry": {"type": "Polygon", "coordinates": [[[0,0],[20,0],[20,20],[0,20],[0,0]]]}
            }
          ]
        }"#;

        let records =
            parse_postal_areas(text, &fields(), &Projection::Planar, Some("091")).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Vaarala");
        assert_eq!(records[0].municipality, "091");

        let unfiltered = parse_postal_areas(text, &fields(), &Projection::Planar, None).unwrap();
        assert_eq!(unfiltered.len(), 1);
        assert_eq!(unfiltered[0].name, "Hakunila");
    }

    #[test]
    fn land_use_multipolygons_are_split() {
        let text = r#"{
          "type": "FeatureCollection",
          "features": [
            {"type": "Feature", "properties": {}, "geometry": {"type": "MultiPolygon", "coordinates": [[[[0,0],[1,0],[1,1],[0,0]]], [[[5,5],[6,5],[6,6],[5,5]]]]}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "LineString", "coordinates": [[0,0],[1,1]]}},
            {"type": "Feature", "properties": {}, "geometry": null}
          ]
        }"#;

        let set = parse_land_use(text, LandUseCategory::Green, &Projection::Planar).unwrap();

        assert_eq!(set.category, LandUseCategory::Green);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn projection_is_applied_on_ingestion() {
        let text = r#"{
          "type": "FeatureCollection",
          "features": [
            {"type": "Feature", "properties": {}, "geometry": {"type": "Polygon", "coordinates": [[[24.9,60.1],[25.0,60.1],[25.0,60.2],[24.9,60.1]]]}}
          ]
        }"#;

        let set = parse_land_use(text, LandUseCategory::Other, &Projection::ETRS_GK25).unwrap();

        let first = set.polygons[0].exterior().0[0];
        assert!(first.x > 25_490_000.0 && first.x < 25_500_000.0);
        assert!(first.y > 6_660_000.0 && first.y < 6_680_000.0);
    }

    #[test]
    fn rejects_non_collection_input() {
        let err = parse_land_use(
            r#"{"type": "Point", "coordinates": [0, 0]}"#,
            LandUseCategory::Green,
            &Projection::Planar,
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::GeoJson(_)));
    }
}
