mod client;
mod database;
mod table;

pub use client::{DynamoClient, DynamoClientBuilder, SortCondition, StoreClient, TableInfo};
pub use database::Database;
pub use table::Table;

#[cfg(test)]
pub use client::MemoryClient;
