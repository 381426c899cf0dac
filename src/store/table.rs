use super::{SortCondition, StoreClient};
use crate::types::{FieldValue, KeySchema, Record};
use crate::{Error, Result};

use std::sync::Arc;

/// A ready table: item operations bound to a name and its key schema.
/// Handles are only constructible through [`super::Database::create`] and
/// [`super::Database::load`], so an unbound or half-created handle does not
/// exist. No item state is cached beyond a single call.
#[derive(Clone)]
pub struct Table {
    name: String,
    key_schema: KeySchema,
    client: Arc<dyn StoreClient>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("key_schema", &self.key_schema)
            .finish_non_exhaustive()
    }
}

impl Table {
    pub(crate) fn new<N: Into<String>>(
        name: N,
        key_schema: KeySchema,
        client: Arc<dyn StoreClient>,
    ) -> Self {
        Self {
            name: name.into(),
            key_schema,
            client,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_schema(&self) -> &KeySchema {
        &self.key_schema
    }

    /// Upserts the record. Overwrites in place when the key pair already
    /// exists; the partition item count does not grow on re-add.
    pub async fn add(&self, record: Record) -> Result<()> {
        record.key_pair(&self.key_schema)?;
        self.client.put_item(&self.name, record).await
    }

    /// Exact point lookup. Absence is [`Error::ItemNotFound`], distinct
    /// from store failures.
    pub async fn get(&self, partition: FieldValue, sort: FieldValue) -> Result<Record> {
        self.check_key_kinds(&partition, &sort)?;

        self.client
            .get_item(&self.name, &self.key_schema, &partition, &sort)
            .await?
            .ok_or_else(|| Error::item_not_found(&self.name, &self.key_schema, &partition, &sort))
    }

    /// All items sharing the partition value, in ascending sort-key order,
    /// optionally constrained on the sort key. The full partition is
    /// returned; partitions are assumed bounded to one feature's time
    /// series.
    pub async fn query(
        &self,
        partition: FieldValue,
        condition: Option<SortCondition>,
    ) -> Result<Vec<Record>> {
        if !partition.matches(self.key_schema.partition_kind()) {
            return Err(Error::KeyKindMismatch {
                name: self.key_schema.partition_key().to_string(),
                expected: self.key_schema.partition_kind(),
            });
        }

        self.client
            .query(&self.name, &self.key_schema, &partition, condition.as_ref())
            .await
    }

    /// Partial attribute update on an existing item, returning the new
    /// values of the updated fields. No upsert-on-update.
    pub async fn update(
        &self,
        partition: FieldValue,
        sort: FieldValue,
        updates: Record,
    ) -> Result<Record> {
        self.check_key_kinds(&partition, &sort)?;

        self.client
            .update_item(&self.name, &self.key_schema, &partition, &sort, updates)
            .await
    }

    /// Removes exactly one item. Fails with [`Error::ItemNotFound`] when
    /// the key pair is absent.
    pub async fn delete_item(&self, partition: FieldValue, sort: FieldValue) -> Result<()> {
        self.check_key_kinds(&partition, &sort)?;

        self.client
            .delete_item(&self.name, &self.key_schema, &partition, &sort)
            .await
    }

    /// The store-reported item count. Exact against a local store,
    /// eventually consistent against the managed service.
    pub async fn item_count(&self) -> Result<u64> {
        self.client
            .describe_table(&self.name)
            .await?
            .map(|info| info.item_count)
            .ok_or_else(|| Error::TableNotFound(self.name.clone()))
    }

    fn check_key_kinds(&self, partition: &FieldValue, sort: &FieldValue) -> Result<()> {
        for (value, name, kind) in [
            (
                partition,
                self.key_schema.partition_key(),
                self.key_schema.partition_kind(),
            ),
            (
                sort,
                self.key_schema.sort_key(),
                self.key_schema.sort_kind(),
            ),
        ] {
            if !value.matches(kind) {
                return Err(Error::KeyKindMismatch {
                    name: name.to_string(),
                    expected: kind,
                });
            }
        }

        Ok(())
    }
}
