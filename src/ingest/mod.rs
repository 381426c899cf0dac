mod binding;

pub use binding::{FeatureKind, TableBinding, SORT_ATTRIBUTE};

use crate::io::GranuleReader;
use crate::search::{DateWindow, GranuleSearch};
use crate::store::{Database, Table};
use crate::Result;

use std::sync::Arc;
use tracing::{info, warn};
use ulid::Ulid;

/// Orchestrates one ingestion run: resolve the table binding, ensure the
/// table, discover granules, extract, upsert.
pub struct Ingestor {
    database: Database,
    search: Arc<dyn GranuleSearch>,
    reader: Arc<dyn GranuleReader>,
    bindings: Vec<TableBinding>,
}

/// What one run found and wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    pub run_id: Ulid,
    pub table_name: String,
    pub granules_found: usize,
    pub granules_matched: usize,
    pub granules_skipped: usize,
    pub records_written: usize,
}

impl IngestSummary {
    fn empty(run_id: Ulid, table_name: &str) -> Self {
        Self {
            run_id,
            table_name: table_name.to_string(),
            granules_found: 0,
            granules_matched: 0,
            granules_skipped: 0,
            records_written: 0,
        }
    }
}

impl Ingestor {
    pub fn new(
        database: Database,
        search: Arc<dyn GranuleSearch>,
        reader: Arc<dyn GranuleReader>,
        bindings: Vec<TableBinding>,
    ) -> Self {
        Self {
            database,
            search,
            reader,
            bindings,
        }
    }

    /// Runs one ingestion for `table_name` over `window`. An unknown table
    /// name logs a warning and returns an empty summary; discovery auth
    /// failures, table failures, and extractor/store failures on a granule
    /// are fatal for the run.
    pub async fn run(&self, table_name: &str, window: DateWindow) -> Result<IngestSummary> {
        let run_id = Ulid::new();

        let Some(binding) = self.binding(table_name) else {
            warn!(run_id = %run_id, "table `{table_name}` is not bound to any feature type, nothing to ingest");
            return Ok(IngestSummary::empty(run_id, table_name));
        };

        let table = self.ensure_table(binding).await?;
        let granules = self
            .search
            .find_granules(binding.feature.collection(), &window)
            .await?;

        let mut summary = IngestSummary::empty(run_id, table_name);
        summary.granules_found = granules.len();

        for path in &granules {
            match FeatureKind::of_path(path) {
                Some(kind) if kind == binding.feature => {
                    let written = self.load_granule(&table, path).await?;
                    summary.granules_matched += 1;
                    summary.records_written += written;
                }
                // Another feature type's granule from the same collection;
                // not this table's concern.
                Some(_) => {}
                None => {
                    warn!(run_id = %run_id, "no known feature marker in `{path}`, skipping");
                    summary.granules_skipped += 1;
                }
            }
        }

        info!(
            run_id = %run_id,
            "ingested into `{table_name}`: {} of {} granules matched, {} skipped, {} records written",
            summary.granules_matched,
            summary.granules_found,
            summary.granules_skipped,
            summary.records_written,
        );

        Ok(summary)
    }

    async fn ensure_table(&self, binding: &TableBinding) -> Result<Table> {
        let table_name = binding.table_name.as_str();

        if self.database.exists(table_name).await? {
            self.database.load(table_name).await
        } else {
            info!("creating table `{table_name}`");
            self.database.create(table_name, binding.key_schema()).await
        }
    }

    async fn load_granule(&self, table: &Table, path: &str) -> Result<usize> {
        let records = self.reader.read(path).await?;
        let count = records.len();

        for mut record in records {
            record.coerce_string_keys(table.key_schema());
            table.add(record).await?;
        }

        info!("loaded {count} records from `{path}`");
        Ok(count)
    }

    fn binding(&self, table_name: &str) -> Option<&TableBinding> {
        self.bindings
            .iter()
            .find(|binding| binding.table_name == table_name)
    }
}
