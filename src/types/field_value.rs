use super::KeyKind;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::Serialize;
use std::fmt;

/// A scalar attribute value. Numbers are carried as their exact decimal
/// representation so a measurement read from a source file is stored and
/// returned with the same digits.
#[derive(Debug, Serialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldValue {
    Bool(bool),
    N(String),
    S(String),
}

impl FieldValue {
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_n(&self) -> Option<&str> {
        match self {
            Self::N(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub(crate) fn matches(&self, kind: KeyKind) -> bool {
        match kind {
            KeyKind::String => matches!(self, Self::S(_)),
            KeyKind::Number => matches!(self, Self::N(_)),
        }
    }

    pub fn from_attribute(value: AttributeValue) -> Option<FieldValue> {
        match value {
            AttributeValue::Bool(v) => Some(FieldValue::Bool(v)),
            AttributeValue::N(v) => Some(FieldValue::N(v)),
            AttributeValue::S(v) => Some(FieldValue::S(v)),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::N(v) | Self::S(v) => write!(f, "{v}"),
        }
    }
}

impl From<FieldValue> for AttributeValue {
    fn from(value: FieldValue) -> AttributeValue {
        match value {
            FieldValue::Bool(v) => AttributeValue::Bool(v),
            FieldValue::N(v) => AttributeValue::N(v),
            FieldValue::S(v) => AttributeValue::S(v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> FieldValue {
        FieldValue::S(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> FieldValue {
        FieldValue::S(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> FieldValue {
        FieldValue::N(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> FieldValue {
        FieldValue::N(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> FieldValue {
        FieldValue::Bool(value)
    }
}
