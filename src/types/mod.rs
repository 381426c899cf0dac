mod field_value;
mod key_schema;
mod record;

pub use field_value::FieldValue;
pub use key_schema::{KeyKind, KeySchema};
pub use record::Record;
