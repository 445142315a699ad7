//! Writes enriched postal areas as CSV and `GeoJSON`, and reads the CSV
//! back for charting.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject};
use land_use_models::{PostalAreaRecord, PostalAreaRow};

use crate::SourceError;

/// File name of the tabular output.
pub const CSV_FILE_NAME: &str = "land_use.csv";
/// File name of the `GeoJSON` output.
pub const GEOJSON_FILE_NAME: &str = "land_use.geojson";

/// Writes one CSV row per record.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if writing fails.
pub fn write_csv<W: Write>(records: &[PostalAreaRecord], writer: W) -> Result<(), SourceError> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(PostalAreaRow::from(record))?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Reads rows written by [`write_csv`].
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if a row cannot be parsed.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<PostalAreaRow>, SourceError> {
    let mut csv = csv::Reader::from_reader(reader);
    csv.deserialize()
        .map(|row| row.map_err(SourceError::from))
        .collect()
}

/// Builds a `FeatureCollection` with each record's boundary and its row
/// as properties.
///
/// # Errors
///
/// Returns [`SourceError::Json`] if a row cannot be converted to JSON.
pub fn to_feature_collection(
    records: &[PostalAreaRecord],
) -> Result<FeatureCollection, SourceError> {
    let features = records
        .iter()
        .map(|record| {
            let properties: JsonObject = match serde_json::to_value(PostalAreaRow::from(record))? {
                serde_json::Value::Object(map) => map,
                _ => JsonObject::new(),
            };
            Ok(Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::from(&record.boundary))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect::<Result<Vec<_>, SourceError>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Writes [`CSV_FILE_NAME`] and [`GEOJSON_FILE_NAME`] into `dir`.
///
/// # Errors
///
/// Returns [`SourceError`] if the directory or either file cannot be
/// written.
pub fn write_outputs(records: &[PostalAreaRecord], dir: &Path) -> Result<(), SourceError> {
    std::fs::create_dir_all(dir).map_err(|e| SourceError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let csv_path = dir.join(CSV_FILE_NAME);
    write_csv(records, BufWriter::new(create(&csv_path)?))?;
    log::info!("Wrote {} rows to {}", records.len(), csv_path.display());

    let geojson_path = dir.join(GEOJSON_FILE_NAME);
    let geojson = GeoJson::FeatureCollection(to_feature_collection(records)?);
    let mut writer = BufWriter::new(create(&geojson_path)?);
    serde_json::to_writer(&mut writer, &geojson)?;
    writer.flush().map_err(|e| SourceError::Io {
        path: geojson_path.clone(),
        source: e,
    })?;
    log::info!("Wrote {} features to {}", records.len(), geojson_path.display());

    Ok(())
}

/// Reads the CSV output from a file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened or parsed.
pub fn read_csv_file(path: &Path) -> Result<Vec<PostalAreaRow>, SourceError> {
    let file = File::open(path).map_err(|e| SourceError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_csv(file)
}

fn create(path: &Path) -> Result<File, SourceError> {
    File::create(path).map_err(|e| SourceError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
