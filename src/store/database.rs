use super::{StoreClient, Table};
use crate::types::KeySchema;
use crate::{Error, Result};

use std::sync::Arc;
use tracing::info;

/// Table lifecycle management over the injected store client. Item-level
/// operations live on the [`Table`] handles this hands out.
#[derive(Clone)]
pub struct Database {
    client: Arc<dyn StoreClient>,
}

impl Database {
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self { client }
    }

    /// Probes the store for a table of that name. Absence is `false`; any
    /// other store failure propagates.
    pub async fn exists(&self, table_name: &str) -> Result<bool> {
        self.client
            .describe_table(table_name)
            .await
            .map(|info| info.is_some())
    }

    /// Declares the table and blocks until the store reports it ready.
    /// Creating an existing name is a store-level error; callers wanting
    /// idempotent creation must check [`Database::exists`] first.
    pub async fn create(&self, table_name: &str, key_schema: KeySchema) -> Result<Table> {
        self.client.create_table(table_name, &key_schema).await?;
        info!("table `{table_name}` is active");

        Ok(Table::new(table_name, key_schema, Arc::clone(&self.client)))
    }

    /// Attaches to an existing table, recovering its key schema from the
    /// table description.
    pub async fn load(&self, table_name: &str) -> Result<Table> {
        let info = self
            .client
            .describe_table(table_name)
            .await?
            .ok_or_else(|| Error::TableNotFound(table_name.to_string()))?;

        let key_schema = info.key_schema.ok_or_else(|| {
            Error::store(
                "DescribeTable",
                table_name,
                "table lacks a partition+sort key schema",
            )
        })?;

        Ok(Table::new(table_name, key_schema, Arc::clone(&self.client)))
    }

    pub async fn list(&self) -> Result<Vec<String>> {
        self.client.list_tables().await
    }

    /// Removes the table and all its data. Irreversible; outstanding
    /// handles to the table must not be used afterwards.
    pub async fn delete(&self, table_name: &str) -> Result<()> {
        self.client.delete_table(table_name).await?;
        info!("table `{table_name}` deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::MemoryClient;
    use super::*;
    use crate::types::KeyKind;

    fn database() -> Database {
        Database::new(Arc::new(MemoryClient::new()))
    }

    fn schema() -> KeySchema {
        KeySchema::new(
            "reach_id",
            KeyKind::String,
            "range_start_time",
            KeyKind::String,
        )
    }

    #[tokio::test]
    async fn it_creates_a_table_and_finds_it_afterwards() {
        let database = database();
        assert!(!database.exists("hydro-swot-reach-table").await.unwrap());

        let table = database
            .create("hydro-swot-reach-table", schema())
            .await
            .unwrap();

        assert_eq!(table.name(), "hydro-swot-reach-table");
        assert_eq!(table.key_schema(), &schema());
        assert!(database.exists("hydro-swot-reach-table").await.unwrap());
    }

    #[tokio::test]
    async fn it_lists_a_created_table_exactly_once() {
        let database = database();
        database
            .create("hydro-swot-reach-table", schema())
            .await
            .unwrap();
        database
            .create("hydro-swot-node-table", schema())
            .await
            .unwrap();

        let names = database.list().await.unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(
            names
                .iter()
                .filter(|name| *name == "hydro-swot-reach-table")
                .count(),
            1,
        );
    }

    #[tokio::test]
    async fn it_loads_an_existing_table_with_its_key_schema() {
        let database = database();
        database
            .create("hydro-swot-reach-table", schema())
            .await
            .unwrap();

        let table = database.load("hydro-swot-reach-table").await.unwrap();
        assert_eq!(table.name(), "hydro-swot-reach-table");
        assert_eq!(table.key_schema(), &schema());
    }

    #[tokio::test]
    async fn it_fails_to_load_a_missing_table() {
        let err = database().load("hydro-swot-reach-table").await.unwrap_err();
        assert!(matches!(err, Error::TableNotFound(name) if name == "hydro-swot-reach-table"));
    }

    #[tokio::test]
    async fn it_deletes_a_table() {
        let database = database();
        database
            .create("hydro-swot-reach-table", schema())
            .await
            .unwrap();

        database.delete("hydro-swot-reach-table").await.unwrap();
        assert!(!database.exists("hydro-swot-reach-table").await.unwrap());
        assert!(database.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn it_propagates_creation_of_a_preexisting_table() {
        let database = database();
        database
            .create("hydro-swot-reach-table", schema())
            .await
            .unwrap();

        let err = database
            .create("hydro-swot-reach-table", schema())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Store { .. }));
    }
}
