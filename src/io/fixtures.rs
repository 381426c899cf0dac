//! Builds real zipped shapefile granules for tests instead of committing
//! binary fixtures.

use shapefile::dbase;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub(crate) struct FeatureRow {
    pub reach_id: String,
    pub wse: f64,
    pub width: f64,
}

impl FeatureRow {
    pub(crate) fn new<I: Into<String>>(reach_id: I, wse: f64, width: f64) -> Self {
        Self {
            reach_id: reach_id.into(),
            wse,
            width,
        }
    }
}

/// Writes a zipped reach granule named `filename` into `dir` and returns
/// its path. The dbf carries a stale `crid` column so tests can assert
/// filename-attribute precedence.
pub(crate) fn reach_granule(dir: &Path, filename: &str, rows: &[FeatureRow]) -> String {
    let stem = filename.trim_end_matches(".zip");

    let table = dbase::TableWriterBuilder::new()
        .add_character_field("reach_id".try_into().unwrap(), 20)
        .add_numeric_field("wse".try_into().unwrap(), 14, 4)
        .add_numeric_field("width".try_into().unwrap(), 14, 3)
        .add_character_field("crid".try_into().unwrap(), 8);

    let shp_path = dir.join(format!("{stem}.shp"));
    let mut writer = shapefile::Writer::from_path(&shp_path, table).unwrap();

    for row in rows {
        let mut record = dbase::Record::default();
        record.insert(
            "reach_id".to_string(),
            dbase::FieldValue::Character(Some(row.reach_id.clone())),
        );
        record.insert(
            "wse".to_string(),
            dbase::FieldValue::Numeric(Some(row.wse)),
        );
        record.insert(
            "width".to_string(),
            dbase::FieldValue::Numeric(Some(row.width)),
        );
        record.insert(
            "crid".to_string(),
            dbase::FieldValue::Character(Some("stale".to_string())),
        );

        writer
            .write_shape_and_record(&shapefile::Point::new(-71.06, 42.36), &record)
            .unwrap();
    }
    drop(writer);

    let zip_path = dir.join(filename);
    let mut zip = ZipWriter::new(File::create(&zip_path).unwrap());
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for extension in ["shp", "shx", "dbf"] {
        let member = format!("{stem}.{extension}");

        let mut bytes = vec![];
        File::open(dir.join(&member))
            .unwrap()
            .read_to_end(&mut bytes)
            .unwrap();

        zip.start_file(member, options).unwrap();
        zip.write_all(&bytes).unwrap();
    }
    zip.finish().unwrap();

    zip_path.to_string_lossy().into_owned()
}
