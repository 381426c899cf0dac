mod dynamodb;
#[cfg(test)]
mod memory;

use crate::types::{FieldValue, KeySchema, Record};
use crate::Result;

use async_trait::async_trait;

/// What the store reports about an existing table.
#[derive(Debug, Clone)]
pub struct TableInfo {
    pub name: String,
    pub key_schema: Option<KeySchema>,
    pub item_count: u64,
}

/// Constraint on the sort key of a query. A query without one returns the
/// whole partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortCondition {
    Eq(FieldValue),
    Between(FieldValue, FieldValue),
}

#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Returns `None` when no table of that name exists. Every other store
    /// failure is an error.
    async fn describe_table(&self, table_name: &str) -> Result<Option<TableInfo>>;
    /// Declares the table and returns once the store reports it active.
    async fn create_table(&self, table_name: &str, key_schema: &KeySchema) -> Result<()>;
    async fn delete_table(&self, table_name: &str) -> Result<()>;
    async fn list_tables(&self) -> Result<Vec<String>>;
    /// Upserts one item. The record is trusted to satisfy the key schema.
    async fn put_item(&self, table_name: &str, record: Record) -> Result<()>;
    async fn get_item(
        &self,
        table_name: &str,
        schema: &KeySchema,
        partition: &FieldValue,
        sort: &FieldValue,
    ) -> Result<Option<Record>>;
    /// Returns the partition's items in ascending sort-key order, following
    /// store-side response paging to exhaustion.
    async fn query(
        &self,
        table_name: &str,
        schema: &KeySchema,
        partition: &FieldValue,
        condition: Option<&SortCondition>,
    ) -> Result<Vec<Record>>;
    /// Applies the updates to an existing item and returns the new values of
    /// the updated fields. Fails when the item is absent.
    async fn update_item(
        &self,
        table_name: &str,
        schema: &KeySchema,
        partition: &FieldValue,
        sort: &FieldValue,
        updates: Record,
    ) -> Result<Record>;
    /// Removes exactly one item. Fails when the item is absent.
    async fn delete_item(
        &self,
        table_name: &str,
        schema: &KeySchema,
        partition: &FieldValue,
        sort: &FieldValue,
    ) -> Result<()>;
}

pub use dynamodb::{DynamoClient, DynamoClientBuilder};
#[cfg(test)]
pub use memory::MemoryClient;
