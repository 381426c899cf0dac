use aws_sdk_dynamodb::types::ScalarAttributeType;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    String,
    Number,
}

impl KeyKind {
    pub(crate) fn from_scalar(value: &ScalarAttributeType) -> Option<KeyKind> {
        match value {
            ScalarAttributeType::S => Some(KeyKind::String),
            ScalarAttributeType::N => Some(KeyKind::Number),
            _ => None,
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
        }
    }
}

impl From<KeyKind> for ScalarAttributeType {
    fn from(kind: KeyKind) -> ScalarAttributeType {
        match kind {
            KeyKind::String => ScalarAttributeType::S,
            KeyKind::Number => ScalarAttributeType::N,
        }
    }
}

/// The partition and sort key pair every item in a table must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    partition_key: String,
    partition_kind: KeyKind,
    sort_key: String,
    sort_kind: KeyKind,
}

impl KeySchema {
    pub fn new<P, S>(partition_key: P, partition_kind: KeyKind, sort_key: S, sort_kind: KeyKind) -> Self
    where
        P: Into<String>,
        S: Into<String>,
    {
        Self {
            partition_key: partition_key.into(),
            partition_kind,
            sort_key: sort_key.into(),
            sort_kind,
        }
    }

    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    pub fn partition_kind(&self) -> KeyKind {
        self.partition_kind
    }

    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    pub fn sort_kind(&self) -> KeyKind {
        self.sort_kind
    }
}
