use crate::types::{FieldValue, KeyKind, KeySchema};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Table not found: `{0}`")]
    TableNotFound(String),
    #[error("Item not found in `{table}`: {key}")]
    ItemNotFound { table: String, key: String },
    #[error("Record is missing key attribute `{0}`")]
    MissingKeyAttribute(String),
    #[error("Key attribute `{name}` must be a {expected} value")]
    KeyKindMismatch { name: String, expected: KeyKind },
    #[error("Malformed granule filename `{name}`: {reason}")]
    MalformedFilename { name: String, reason: String },
    #[error("Unreadable source `{path}`: {reason}")]
    UnreadableSource { path: String, reason: String },
    #[error("Timed out waiting for table `{0}` to become active")]
    TableWaitTimeout(String),
    #[error("Granule search rejected the request (status {0})")]
    SearchUnauthorized(u16),
    #[error("Granule search failed: {0}")]
    Search(String),
    #[error("{operation} failed on table `{table}`: {message}")]
    Store {
        operation: String,
        table: String,
        message: String,
    },
}

impl Error {
    pub(crate) fn store<M: std::fmt::Display>(operation: &str, table: &str, message: M) -> Self {
        Self::Store {
            operation: operation.to_string(),
            table: table.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn item_not_found(
        table: &str,
        schema: &KeySchema,
        partition: &FieldValue,
        sort: &FieldValue,
    ) -> Self {
        Self::ItemNotFound {
            table: table.to_string(),
            key: format!(
                "{} = `{partition}`, {} = `{sort}`",
                schema.partition_key(),
                schema.sort_key(),
            ),
        }
    }

    pub(crate) fn malformed_filename<M: ToString>(name: &str, reason: M) -> Self {
        Self::MalformedFilename {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn unreadable<M: ToString>(path: &str, reason: M) -> Self {
        Self::UnreadableSource {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for the absence variants, which callers may handle without
    /// treating the operation itself as failed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound(_) | Self::ItemNotFound { .. })
    }
}
