use crate::types::Record;
use crate::{Error, Result};

use chrono::NaiveDateTime;

const COMPACT_FORMAT: &str = "%Y%m%dT%H%M%S";
const ISO_8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Provenance attributes carried in a granule filename of the form
/// `<product>_<level>_<mode>_<subtype>_<feature>_<cycle>_<pass>_<continent>_<start>_<end>_<crid>_<counter>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GranuleMeta {
    pub cycle_id: String,
    pub pass_id: String,
    pub continent_id: String,
    pub range_start_time: String,
    pub range_end_time: String,
    pub crid: String,
}

impl GranuleMeta {
    pub fn parse(filename: &str) -> Result<Self> {
        let segments: Vec<&str> = filename.split('_').collect();

        if segments.len() < 11 {
            return Err(Error::malformed_filename(
                filename,
                format!(
                    "expected at least 11 underscore-separated segments, found {}",
                    segments.len(),
                ),
            ));
        }

        Ok(Self {
            cycle_id: segments[5].to_string(),
            pass_id: segments[6].to_string(),
            continent_id: segments[7].to_string(),
            range_start_time: reformat(filename, segments[8])?,
            range_end_time: reformat(filename, segments[9])?,
            crid: segments[10].to_string(),
        })
    }

    /// Writes the filename attributes into the record, overwriting any
    /// colliding attribute. Filename metadata wins.
    pub fn merge_into(&self, record: &mut Record) {
        record.insert("cycle_id", self.cycle_id.as_str());
        record.insert("pass_id", self.pass_id.as_str());
        record.insert("continent_id", self.continent_id.as_str());
        record.insert("range_start_time", self.range_start_time.as_str());
        record.insert("range_end_time", self.range_end_time.as_str());
        record.insert("crid", self.crid.as_str());
    }
}

fn reformat(filename: &str, compact: &str) -> Result<String> {
    NaiveDateTime::parse_from_str(compact, COMPACT_FORMAT)
        .map(|time| time.format(ISO_8601_FORMAT).to_string())
        .map_err(|err| {
            Error::malformed_filename(filename, format!("bad timestamp segment `{compact}`: {err}"))
        })
}
