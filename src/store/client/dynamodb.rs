use super::{SortCondition, StoreClient, TableInfo};
use crate::types::{FieldValue, KeyKind, KeySchema, Record};
use crate::{Error, Result};

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    config::Builder as ConfigBuilder,
    error::SdkError,
    operation::{
        delete_item::DeleteItemError, delete_table::DeleteTableError,
        describe_table::DescribeTableError, list_tables::ListTablesError,
        update_item::UpdateItemError,
    },
    types::{
        AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType, ReturnValue,
        TableDescription, TableStatus,
    },
    Client,
};
use std::collections::HashMap;
use tokio::time::{sleep, Duration};
use tracing::error;

const READY_CHECKS: usize = 30;
const READY_CHECK_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct DynamoClient {
    client: Client,
}

#[derive(Debug)]
pub struct DynamoClientBuilder {
    builder: ConfigBuilder,
}

impl DynamoClientBuilder {
    pub async fn new() -> Self {
        let config = aws_config::load_from_env().await;
        let builder = ConfigBuilder::from(&config);

        Self { builder }
    }

    pub fn endpoint_url(self, url: Option<String>) -> Self {
        match url {
            Some(url) => Self {
                builder: self.builder.endpoint_url(&url),
            },
            None => self,
        }
    }

    pub fn build(self) -> DynamoClient {
        let config = self.builder.build();

        DynamoClient {
            client: Client::from_conf(config),
        }
    }
}

impl DynamoClient {
    pub async fn builder() -> DynamoClientBuilder {
        DynamoClientBuilder::new().await
    }

    async fn wait_until_active(&self, table_name: &str) -> Result<()> {
        for _ in 0..READY_CHECKS {
            if let Some(TableStatus::Active) = self.table_status(table_name).await? {
                return Ok(());
            }
            sleep(READY_CHECK_INTERVAL).await;
        }

        Err(Error::TableWaitTimeout(table_name.to_string()))
    }

    async fn table_status(&self, table_name: &str) -> Result<Option<TableStatus>> {
        match self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
        {
            Ok(output) => Ok(output.table.and_then(|table| table.table_status)),
            Err(err) => from_describe_table_err::<TableStatus>(table_name, err),
        }
    }
}

#[async_trait]
impl StoreClient for DynamoClient {
    async fn describe_table(&self, table_name: &str) -> Result<Option<TableInfo>> {
        match self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
        {
            Ok(output) => to_table_info(table_name, output.table).map(Some),
            Err(err) => from_describe_table_err(table_name, err),
        }
    }

    async fn create_table(&self, table_name: &str, key_schema: &KeySchema) -> Result<()> {
        self.client
            .create_table()
            .table_name(table_name)
            .set_attribute_definitions(Some(attribute_definitions(table_name, key_schema)?))
            .set_key_schema(Some(key_schema_elements(table_name, key_schema)?))
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .map_err(|err| from_sdk_err("CreateTable", table_name, err))?;

        self.wait_until_active(table_name).await
    }

    async fn delete_table(&self, table_name: &str) -> Result<()> {
        self.client
            .delete_table()
            .table_name(table_name)
            .send()
            .await
            .map(drop)
            .map_err(|err| from_delete_table_err(table_name, err))
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = vec![];
        let mut last_name: Option<String> = None;

        loop {
            let output = self
                .client
                .list_tables()
                .set_exclusive_start_table_name(last_name.take())
                .send()
                .await
                .map_err(from_list_tables_err)?;

            names.extend(output.table_names.unwrap_or_default());
            last_name = output.last_evaluated_table_name;

            if last_name.is_none() {
                return Ok(names);
            }
        }
    }

    async fn put_item(&self, table_name: &str, record: Record) -> Result<()> {
        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(to_item(record)))
            .send()
            .await
            .map(drop)
            .map_err(|err| from_sdk_err("PutItem", table_name, err))
    }

    async fn get_item(
        &self,
        table_name: &str,
        schema: &KeySchema,
        partition: &FieldValue,
        sort: &FieldValue,
    ) -> Result<Option<Record>> {
        self.client
            .get_item()
            .table_name(table_name)
            .set_key(Some(to_key(schema, partition, sort)))
            .consistent_read(true)
            .send()
            .await
            .map(|output| output.item.map(to_record))
            .map_err(|err| from_sdk_err("GetItem", table_name, err))
    }

    async fn query(
        &self,
        table_name: &str,
        schema: &KeySchema,
        partition: &FieldValue,
        condition: Option<&SortCondition>,
    ) -> Result<Vec<Record>> {
        let mut records: Vec<Record> = vec![];
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let output = self
                .client
                .query()
                .table_name(table_name)
                .consistent_read(true)
                .key_condition_expression(condition_expression(schema, condition))
                .set_expression_attribute_values(Some(expression_values(partition, condition)))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|err| from_sdk_err("Query", table_name, err))?;

            records.extend(output.items.unwrap_or_default().into_iter().map(to_record));
            start_key = output.last_evaluated_key;

            if start_key.is_none() {
                return Ok(records);
            }
        }
    }

    async fn update_item(
        &self,
        table_name: &str,
        schema: &KeySchema,
        partition: &FieldValue,
        sort: &FieldValue,
        updates: Record,
    ) -> Result<Record> {
        if updates.is_empty() {
            return Err(Error::store(
                "UpdateItem",
                table_name,
                "no update fields were supplied",
            ));
        }

        let (expression, names, values) = update_expression(updates);

        match self
            .client
            .update_item()
            .table_name(table_name)
            .set_key(Some(to_key(schema, partition, sort)))
            .update_expression(expression)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .condition_expression(format!("attribute_exists({})", schema.partition_key()))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
        {
            Ok(output) => Ok(to_record(output.attributes.unwrap_or_default())),
            Err(err) => Err(from_update_item_err(table_name, schema, partition, sort, err)),
        }
    }

    async fn delete_item(
        &self,
        table_name: &str,
        schema: &KeySchema,
        partition: &FieldValue,
        sort: &FieldValue,
    ) -> Result<()> {
        match self
            .client
            .delete_item()
            .table_name(table_name)
            .set_key(Some(to_key(schema, partition, sort)))
            .condition_expression(format!("attribute_exists({})", schema.partition_key()))
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => Err(from_delete_item_err(table_name, schema, partition, sort, err)),
        }
    }
}

fn to_item(record: Record) -> HashMap<String, AttributeValue> {
    record
        .into_iter()
        .map(|(name, value)| (name, value.into()))
        .collect()
}

fn to_record(item: HashMap<String, AttributeValue>) -> Record {
    item.into_iter()
        .filter_map(|(name, value)| FieldValue::from_attribute(value).map(|value| (name, value)))
        .collect()
}

fn to_key(
    schema: &KeySchema,
    partition: &FieldValue,
    sort: &FieldValue,
) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (schema.partition_key().to_string(), partition.clone().into()),
        (schema.sort_key().to_string(), sort.clone().into()),
    ])
}

fn to_table_info(table_name: &str, table: Option<TableDescription>) -> Result<TableInfo> {
    let table = table.ok_or_else(|| {
        Error::store(
            "DescribeTable",
            table_name,
            "`table` is None in `DescribeTableOutput`",
        )
    })?;

    let name = table
        .table_name
        .clone()
        .unwrap_or_else(|| table_name.to_string());
    let item_count = table.item_count.unwrap_or_default().max(0) as u64;
    let key_schema = to_key_schema(&table);

    Ok(TableInfo {
        name,
        key_schema,
        item_count,
    })
}

fn to_key_schema(table: &TableDescription) -> Option<KeySchema> {
    let elements = table.key_schema.as_deref()?;
    let definitions = table.attribute_definitions.as_deref()?;

    let partition_key = key_of(elements, KeyType::Hash)?;
    let sort_key = key_of(elements, KeyType::Range)?;
    let partition_kind = kind_of(definitions, partition_key)?;
    let sort_kind = kind_of(definitions, sort_key)?;

    Some(KeySchema::new(
        partition_key,
        partition_kind,
        sort_key,
        sort_kind,
    ))
}

fn key_of(elements: &[KeySchemaElement], key_type: KeyType) -> Option<&str> {
    elements
        .iter()
        .find(|element| element.key_type == key_type)
        .map(|element| element.attribute_name.as_str())
}

fn kind_of(definitions: &[AttributeDefinition], name: &str) -> Option<KeyKind> {
    definitions
        .iter()
        .find(|definition| definition.attribute_name == name)
        .and_then(|definition| KeyKind::from_scalar(&definition.attribute_type))
}

fn attribute_definitions(table_name: &str, schema: &KeySchema) -> Result<Vec<AttributeDefinition>> {
    let mut definitions = Vec::with_capacity(2);

    for (name, kind) in [
        (schema.partition_key(), schema.partition_kind()),
        (schema.sort_key(), schema.sort_kind()),
    ] {
        let definition = AttributeDefinition::builder()
            .attribute_name(name)
            .attribute_type(kind.into())
            .build()
            .map_err(|err| Error::store("CreateTable", table_name, err))?;
        definitions.push(definition);
    }

    Ok(definitions)
}

fn key_schema_elements(table_name: &str, schema: &KeySchema) -> Result<Vec<KeySchemaElement>> {
    let mut elements = Vec::with_capacity(2);

    for (name, key_type) in [
        (schema.partition_key(), KeyType::Hash),
        (schema.sort_key(), KeyType::Range),
    ] {
        let element = KeySchemaElement::builder()
            .attribute_name(name)
            .key_type(key_type)
            .build()
            .map_err(|err| Error::store("CreateTable", table_name, err))?;
        elements.push(element);
    }

    Ok(elements)
}

fn condition_expression(schema: &KeySchema, condition: Option<&SortCondition>) -> String {
    let partition = schema.partition_key();
    let sort = schema.sort_key();

    match condition {
        None => format!("{partition} = :partition"),
        Some(SortCondition::Eq(_)) => format!("{partition} = :partition AND {sort} = :sort"),
        Some(SortCondition::Between(_, _)) => {
            format!("{partition} = :partition AND {sort} BETWEEN :lo AND :hi")
        }
    }
}

fn expression_values(
    partition: &FieldValue,
    condition: Option<&SortCondition>,
) -> HashMap<String, AttributeValue> {
    let mut values = HashMap::from([(":partition".to_string(), partition.clone().into())]);

    match condition {
        None => {}
        Some(SortCondition::Eq(value)) => {
            values.insert(":sort".to_string(), value.clone().into());
        }
        Some(SortCondition::Between(lo, hi)) => {
            values.insert(":lo".to_string(), lo.clone().into());
            values.insert(":hi".to_string(), hi.clone().into());
        }
    }

    values
}

fn update_expression(
    updates: Record,
) -> (String, HashMap<String, String>, HashMap<String, AttributeValue>) {
    let mut assignments: Vec<String> = vec![];
    let mut names: HashMap<String, String> = HashMap::new();
    let mut values: HashMap<String, AttributeValue> = HashMap::new();

    for (position, (name, value)) in updates.into_iter().enumerate() {
        let name_token = format!("#f{position}");
        let value_token = format!(":v{position}");

        assignments.push(format!("{name_token} = {value_token}"));
        names.insert(name_token, name);
        values.insert(value_token, value.into());
    }

    (format!("SET {}", assignments.join(", ")), names, values)
}

fn store_error<E>(operation: &'static str, table_name: &str, err: E) -> Error
where
    E: std::fmt::Debug + std::fmt::Display,
{
    error!("{operation} operation failed on table `{table_name}`: {err}");
    error!("{:#?}", err);
    Error::store(operation, table_name, err)
}

fn from_sdk_err<E>(operation: &'static str, table_name: &str, err: SdkError<E>) -> Error
where
    E: std::error::Error + 'static,
{
    match err {
        SdkError::ServiceError(e) => store_error(operation, table_name, e.into_err()),
        err => store_error(operation, table_name, err),
    }
}

fn from_describe_table_err<T>(table_name: &str, err: SdkError<DescribeTableError>) -> Result<Option<T>> {
    match err {
        SdkError::ServiceError(e) => match e.into_err() {
            DescribeTableError::ResourceNotFoundException(_) => Ok(None),
            e => Err(store_error("DescribeTable", table_name, e)),
        },
        err => Err(store_error("DescribeTable", table_name, err)),
    }
}

fn from_delete_table_err(table_name: &str, err: SdkError<DeleteTableError>) -> Error {
    match err {
        SdkError::ServiceError(e) => match e.into_err() {
            DeleteTableError::ResourceNotFoundException(_) => {
                Error::TableNotFound(table_name.to_string())
            }
            e => store_error("DeleteTable", table_name, e),
        },
        err => store_error("DeleteTable", table_name, err),
    }
}

fn from_list_tables_err(err: SdkError<ListTablesError>) -> Error {
    let message = match err {
        SdkError::ServiceError(e) => e.into_err().to_string(),
        err => err.to_string(),
    };

    error!("ListTables operation failed: {message}");
    // ListTables has account scope rather than a single table.
    Error::store("ListTables", "*", message)
}

fn from_update_item_err(
    table_name: &str,
    schema: &KeySchema,
    partition: &FieldValue,
    sort: &FieldValue,
    err: SdkError<UpdateItemError>,
) -> Error {
    match err {
        SdkError::ServiceError(e) => match e.into_err() {
            UpdateItemError::ConditionalCheckFailedException(_) => {
                Error::item_not_found(table_name, schema, partition, sort)
            }
            e => store_error("UpdateItem", table_name, e),
        },
        err => store_error("UpdateItem", table_name, err),
    }
}

fn from_delete_item_err(
    table_name: &str,
    schema: &KeySchema,
    partition: &FieldValue,
    sort: &FieldValue,
    err: SdkError<DeleteItemError>,
) -> Error {
    match err {
        SdkError::ServiceError(e) => match e.into_err() {
            DeleteItemError::ConditionalCheckFailedException(_) => {
                Error::item_not_found(table_name, schema, partition, sort)
            }
            e => store_error("DeleteItem", table_name, e),
        },
        err => store_error("DeleteItem", table_name, err),
    }
}
