use super::Value;

use std::fmt;

/// A hashable form of a scalar key value.
///
/// Storage rows carry keys as plain [`Value`]s; the engine converts them to
/// `Key` to match child rows with their parents. Both integer widths map to
/// [`Key::Int`] so an `I32` foreign key joins an `I64` primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Bool(bool),
    Int(i64),
    String(String),
}

impl Key {
    /// Returns the key held by `value`, or `None` for `Null` and non-scalar
    /// values.
    pub fn from_value(value: &Value) -> Option<Key> {
        match value {
            Value::Bool(v) => Some(Key::Bool(*v)),
            Value::I32(v) => Some(Key::Int(i64::from(*v))),
            Value::I64(v) => Some(Key::Int(*v)),
            Value::String(v) => Some(Key::String(v.clone())),
            Value::Id(id) => Some(id.key().clone()),
            _ => None,
        }
    }
}

impl From<Key> for Value {
    fn from(value: Key) -> Self {
        match value {
            Key::Bool(v) => Value::Bool(v),
            Key::Int(v) => Value::I64(v),
            Key::String(v) => Value::String(v),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bool(v) => write!(f, "{v}"),
            Key::Int(v) => write!(f, "{v}"),
            Key::String(v) => write!(f, "{v:?}"),
        }
    }
}
