use super::{GranuleMeta, GranuleReader};
use crate::types::{FieldValue, Record};
use crate::{Error, Result};

use async_trait::async_trait;
use aws_sdk_s3::{config::Builder as ConfigBuilder, Client};
use shapefile::dbase;
use std::fs;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Decodes zipped vector granules into [`Record`]s, fetching `s3://`
/// locators through the object store and anything else from the local
/// filesystem.
#[derive(Debug, Clone)]
pub struct ShapefileReader {
    s3: Client,
}

#[derive(Debug)]
pub struct ShapefileReaderBuilder {
    builder: ConfigBuilder,
}

impl ShapefileReaderBuilder {
    pub async fn new() -> Self {
        let config = aws_config::load_from_env().await;
        let builder = ConfigBuilder::from(&config);

        Self { builder }
    }

    pub fn endpoint_url(self, url: Option<String>) -> Self {
        match url {
            Some(url) => Self {
                builder: self.builder.endpoint_url(&url).force_path_style(true),
            },
            None => self,
        }
    }

    pub fn build(self) -> ShapefileReader {
        let config = self.builder.build();

        ShapefileReader {
            s3: Client::from_conf(config),
        }
    }
}

impl ShapefileReader {
    pub async fn builder() -> ShapefileReaderBuilder {
        ShapefileReaderBuilder::new().await
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        use aws_sdk_s3::config::{Credentials, Region};

        let config = aws_sdk_s3::Config::builder()
            .region(Region::new("us-west-2"))
            .credentials_provider(Credentials::new("fake", "fake", None, None, "test"))
            .build();

        Self {
            s3: Client::from_conf(config),
        }
    }

    async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        match path.strip_prefix("s3://") {
            Some(rest) => {
                let (bucket, key) = rest.split_once('/').ok_or_else(|| {
                    Error::unreadable(path, "an s3 locator needs a bucket and a key")
                })?;

                let output = self
                    .s3
                    .get_object()
                    .bucket(bucket)
                    .key(key)
                    .send()
                    .await
                    .map_err(|err| Error::unreadable(path, err))?;

                let data = output
                    .body
                    .collect()
                    .await
                    .map_err(|err| Error::unreadable(path, err))?;
                Ok(data.into_bytes().to_vec())
            }
            None => fs::read(path).map_err(|err| Error::unreadable(path, err)),
        }
    }
}

#[async_trait]
impl GranuleReader for ShapefileReader {
    async fn read(&self, path: &str) -> Result<Vec<Record>> {
        let bytes = self.fetch(path).await?;
        let meta = GranuleMeta::parse(base_name(path))?;

        decode(path, &bytes, &meta)
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn decode(path: &str, bytes: &[u8], meta: &GranuleMeta) -> Result<Vec<Record>> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|err| Error::unreadable(path, err))?;

    let shp = member_bytes(path, &mut archive, ".shp")?;
    let dbf = member_bytes(path, &mut archive, ".dbf")?;

    let shape_reader = shapefile::ShapeReader::new(Cursor::new(shp))
        .map_err(|err| Error::unreadable(path, err))?;
    let dbase_reader =
        dbase::Reader::new(Cursor::new(dbf)).map_err(|err| Error::unreadable(path, err))?;
    let mut reader = shapefile::Reader::new(shape_reader, dbase_reader);

    let mut records: Vec<Record> = vec![];

    for feature in reader.iter_shapes_and_records() {
        // Only the scalar attributes are consumed; the geometry is dropped.
        let (_geometry, attributes) = feature.map_err(|err| Error::unreadable(path, err))?;

        let mut record = Record::new();
        for (name, value) in attributes {
            if let Some(value) = to_field_value(value) {
                record.insert(name, value);
            }
        }
        meta.merge_into(&mut record);

        records.push(record);
    }

    Ok(records)
}

fn member_bytes(
    path: &str,
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    extension: &str,
) -> Result<Vec<u8>> {
    let name = archive
        .file_names()
        .find(|name| name.to_ascii_lowercase().ends_with(extension))
        .map(str::to_string)
        .ok_or_else(|| Error::unreadable(path, format!("no `{extension}` member in the archive")))?;

    let mut member = archive
        .by_name(&name)
        .map_err(|err| Error::unreadable(path, err))?;

    let mut bytes = Vec::with_capacity(member.size() as usize);
    member
        .read_to_end(&mut bytes)
        .map_err(|err| Error::unreadable(path, err))?;

    Ok(bytes)
}

/// Null attributes are omitted rather than stored as sentinel strings.
/// Numerics keep their shortest exact decimal representation.
fn to_field_value(value: dbase::FieldValue) -> Option<FieldValue> {
    match value {
        dbase::FieldValue::Character(value) => value.map(FieldValue::S),
        dbase::FieldValue::Numeric(value) => value.map(|n| FieldValue::N(n.to_string())),
        dbase::FieldValue::Float(value) => value.map(|n| FieldValue::N(n.to_string())),
        dbase::FieldValue::Integer(value) => Some(FieldValue::N(value.to_string())),
        dbase::FieldValue::Double(value) => Some(FieldValue::N(value.to_string())),
        dbase::FieldValue::Logical(value) => value.map(FieldValue::Bool),
        dbase::FieldValue::Date(value) => value.map(|date| {
            FieldValue::S(format!(
                "{:04}-{:02}-{:02}",
                date.year(),
                date.month(),
                date.day(),
            ))
        }),
        _ => None,
    }
}
