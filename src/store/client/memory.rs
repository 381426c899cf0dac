use super::{SortCondition, StoreClient, TableInfo};
use crate::types::{FieldValue, KeyKind, KeySchema, Record};
use crate::{Error, Result};

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory stand-in for the store, faithful to its key semantics:
/// upsert on key collision, ascending sort-key order within a partition
/// (lexicographic for string keys, numeric for number keys), and
/// conditional-delete/update failures on absent items.
#[derive(Debug, Default)]
pub struct MemoryClient {
    tables: Mutex<HashMap<String, MemoryTable>>,
}

#[derive(Debug)]
struct MemoryTable {
    key_schema: KeySchema,
    items: HashMap<(String, String), Record>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreClient for MemoryClient {
    async fn describe_table(&self, table_name: &str) -> Result<Option<TableInfo>> {
        let tables = self.tables.lock().unwrap();

        Ok(tables.get(table_name).map(|table| TableInfo {
            name: table_name.to_string(),
            key_schema: Some(table.key_schema.clone()),
            item_count: table.items.len() as u64,
        }))
    }

    async fn create_table(&self, table_name: &str, key_schema: &KeySchema) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();

        if tables.contains_key(table_name) {
            return Err(Error::store(
                "CreateTable",
                table_name,
                "Cannot create preexisting table",
            ));
        }

        tables.insert(
            table_name.to_string(),
            MemoryTable {
                key_schema: key_schema.clone(),
                items: HashMap::new(),
            },
        );

        Ok(())
    }

    async fn delete_table(&self, table_name: &str) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();

        tables
            .remove(table_name)
            .map(drop)
            .ok_or_else(|| Error::TableNotFound(table_name.to_string()))
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        let tables = self.tables.lock().unwrap();

        let mut names: Vec<String> = tables.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn put_item(&self, table_name: &str, record: Record) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let table = existing(&mut tables, "PutItem", table_name)?;

        let (partition, sort) = record.key_pair(&table.key_schema)?;
        table
            .items
            .insert((partition.to_string(), sort.to_string()), record);

        Ok(())
    }

    async fn get_item(
        &self,
        table_name: &str,
        _schema: &KeySchema,
        partition: &FieldValue,
        sort: &FieldValue,
    ) -> Result<Option<Record>> {
        let mut tables = self.tables.lock().unwrap();
        let table = existing(&mut tables, "GetItem", table_name)?;

        Ok(table
            .items
            .get(&(partition.to_string(), sort.to_string()))
            .cloned())
    }

    async fn query(
        &self,
        table_name: &str,
        schema: &KeySchema,
        partition: &FieldValue,
        condition: Option<&SortCondition>,
    ) -> Result<Vec<Record>> {
        let mut tables = self.tables.lock().unwrap();
        let table = existing(&mut tables, "Query", table_name)?;

        let sort_key = schema.sort_key();
        let sort_kind = schema.sort_kind();

        let mut records: Vec<Record> = table
            .items
            .iter()
            .filter(|((p, _), _)| p == &partition.to_string())
            .filter(|(_, record)| satisfies(sort_kind, record.get(sort_key), condition))
            .map(|(_, record)| record.clone())
            .collect();

        records.sort_by(|a, b| compare(sort_kind, a.get(sort_key), b.get(sort_key)));
        Ok(records)
    }

    async fn update_item(
        &self,
        table_name: &str,
        schema: &KeySchema,
        partition: &FieldValue,
        sort: &FieldValue,
        updates: Record,
    ) -> Result<Record> {
        let mut tables = self.tables.lock().unwrap();
        let table = existing(&mut tables, "UpdateItem", table_name)?;

        for key_attr in [schema.partition_key(), schema.sort_key()] {
            if updates.get(key_attr).is_some() {
                return Err(Error::store(
                    "UpdateItem",
                    table_name,
                    format!("Cannot update attribute {key_attr}. This attribute is part of a key"),
                ));
            }
        }

        let item = table
            .items
            .get_mut(&(partition.to_string(), sort.to_string()))
            .ok_or_else(|| Error::item_not_found(table_name, schema, partition, sort))?;

        for (name, value) in updates.clone() {
            item.insert(name, value);
        }

        Ok(updates)
    }

    async fn delete_item(
        &self,
        table_name: &str,
        schema: &KeySchema,
        partition: &FieldValue,
        sort: &FieldValue,
    ) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let table = existing(&mut tables, "DeleteItem", table_name)?;

        table
            .items
            .remove(&(partition.to_string(), sort.to_string()))
            .map(drop)
            .ok_or_else(|| Error::item_not_found(table_name, schema, partition, sort))
    }
}

fn existing<'a>(
    tables: &'a mut HashMap<String, MemoryTable>,
    operation: &str,
    table_name: &str,
) -> Result<&'a mut MemoryTable> {
    tables.get_mut(table_name).ok_or_else(|| {
        Error::store(
            operation,
            table_name,
            "Cannot do operations on a non-existent table",
        )
    })
}

fn satisfies(kind: KeyKind, value: Option<&FieldValue>, condition: Option<&SortCondition>) -> bool {
    if value.is_none() {
        return false;
    }

    match condition {
        None => true,
        Some(SortCondition::Eq(expected)) => value == Some(expected),
        Some(SortCondition::Between(lo, hi)) => {
            compare(kind, value, Some(lo)) != Ordering::Less
                && compare(kind, value, Some(hi)) != Ordering::Greater
        }
    }
}

fn compare(kind: KeyKind, a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    let a = a.map(FieldValue::to_string).unwrap_or_default();
    let b = b.map(FieldValue::to_string).unwrap_or_default();

    match kind {
        KeyKind::String => a.cmp(&b),
        KeyKind::Number => {
            let a: f64 = a.parse().unwrap_or(f64::MIN);
            let b: f64 = b.parse().unwrap_or(f64::MIN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric_schema() -> KeySchema {
        KeySchema::new("node_id", KeyKind::String, "cycle", KeyKind::Number)
    }

    #[tokio::test]
    async fn it_orders_number_sort_keys_numerically() {
        let client = MemoryClient::new();
        client.create_table("nodes", &numeric_schema()).await.unwrap();

        for cycle in [10_i64, 2, 9] {
            let record = Record::new().with("node_id", "n1").with("cycle", cycle);
            client.put_item("nodes", record).await.unwrap();
        }

        let records = client
            .query("nodes", &numeric_schema(), &FieldValue::S("n1".into()), None)
            .await
            .unwrap();

        let cycles: Vec<&str> = records
            .iter()
            .filter_map(|record| record.get("cycle").and_then(FieldValue::as_n))
            .collect();
        assert_eq!(cycles, vec!["2", "9", "10"]);
    }

    #[tokio::test]
    async fn it_rejects_creating_a_preexisting_table() {
        let client = MemoryClient::new();
        client.create_table("nodes", &numeric_schema()).await.unwrap();

        let err = client
            .create_table("nodes", &numeric_schema())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "CreateTable failed on table `nodes`: Cannot create preexisting table",
        );
    }

    #[tokio::test]
    async fn it_rejects_operations_on_a_missing_table() {
        let client = MemoryClient::new();

        let record = Record::new().with("node_id", "n1").with("cycle", 1_i64);
        let err = client.put_item("nodes", record).await.unwrap_err();
        assert!(matches!(err, Error::Store { .. }));
    }

    #[tokio::test]
    async fn it_rejects_an_update_naming_a_key_attribute() {
        let client = MemoryClient::new();
        client.create_table("nodes", &numeric_schema()).await.unwrap();

        let record = Record::new()
            .with("node_id", "n1")
            .with("cycle", 1_i64)
            .with("wse", 286.2983);
        client.put_item("nodes", record).await.unwrap();

        let updates = Record::new().with("node_id", "n2");
        let err = client
            .update_item(
                "nodes",
                &numeric_schema(),
                &FieldValue::S("n1".into()),
                &FieldValue::N("1".into()),
                updates,
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "UpdateItem failed on table `nodes`: \
             Cannot update attribute node_id. This attribute is part of a key",
        );

        // The stored item is untouched.
        let item = client
            .get_item(
                "nodes",
                &numeric_schema(),
                &FieldValue::S("n1".into()),
                &FieldValue::N("1".into()),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(item.get("node_id"), Some(&FieldValue::S("n1".into())));
    }
}
