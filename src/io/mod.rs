mod granule;
mod shapefile;

#[cfg(test)]
pub(crate) mod fixtures;

pub use granule::GranuleMeta;
pub use shapefile::{ShapefileReader, ShapefileReaderBuilder};

use crate::types::Record;
use crate::Result;

use async_trait::async_trait;

/// Turns one granule locator into store-ready records.
#[async_trait]
pub trait GranuleReader: Send + Sync {
    async fn read(&self, path: &str) -> Result<Vec<Record>>;
}
