use super::{FieldValue, KeyKind, KeySchema};
use crate::{Error, Result};

use std::collections::btree_map;
use std::collections::BTreeMap;

/// A flat mapping of attribute name to scalar value, ordered by name.
/// The store is schemaless beyond the two key attributes, so any set of
/// extra fields is valid.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K, V>(&mut self, name: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(name.into(), value.into());
    }

    pub fn with<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Rewrites number-valued key attributes as strings when the schema
    /// expects string kind, keeping the same digits. Source files often
    /// carry feature ids in numeric columns.
    pub fn coerce_string_keys(&mut self, schema: &KeySchema) {
        for (name, kind) in [
            (schema.partition_key(), schema.partition_kind()),
            (schema.sort_key(), schema.sort_kind()),
        ] {
            if kind == KeyKind::String {
                if let Some(FieldValue::N(digits)) = self.get(name) {
                    let digits = digits.clone();
                    self.insert(name, FieldValue::S(digits));
                }
            }
        }
    }

    /// Extracts the partition and sort values required by `schema`, failing
    /// when either attribute is absent or of the wrong kind.
    pub fn key_pair(&self, schema: &KeySchema) -> Result<(FieldValue, FieldValue)> {
        let partition = self.key_value(schema.partition_key(), schema.partition_kind())?;
        let sort = self.key_value(schema.sort_key(), schema.sort_kind())?;
        Ok((partition, sort))
    }

    fn key_value(&self, name: &str, kind: KeyKind) -> Result<FieldValue> {
        let value = self
            .get(name)
            .ok_or_else(|| Error::MissingKeyAttribute(name.to_string()))?;

        if !value.matches(kind) {
            return Err(Error::KeyKindMismatch {
                name: name.to_string(),
                expected: kind,
            });
        }

        Ok(value.clone())
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, FieldValue);
    type IntoIter = btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
