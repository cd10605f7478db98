use super::{Id, Key, Value};
use crate::{schema::ModelId, Error, Result};

/// The type of a field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// Boolean value
    Bool,

    /// String type
    String,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// An opaque reference that identifies an instance of a composite type
    /// without nesting it.
    Id(ModelId),

    /// A nested instance of a composite type
    Model(ModelId),

    /// A list of a single type
    List(Box<Type>),
}

impl Type {
    pub fn list(ty: impl Into<Self>) -> Self {
        Self::List(Box::new(ty.into()))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub fn is_id(&self) -> bool {
        matches!(self, Self::Id(_))
    }

    pub fn is_model(&self) -> bool {
        matches!(self, Self::Model(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    /// True for types that hold a single value read from one storage column.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Model(_) | Self::List(_))
    }

    /// Checks `value` against this type, applying the declared conversions.
    ///
    /// Accepted conversions:
    /// - `I32` widens to `I64`
    /// - a scalar key becomes an `Id` of the target type. Checking the key
    ///   against the target's key type is up to the field, see
    ///   [`FieldPrimitive::cast`](crate::schema::FieldPrimitive::cast)
    ///
    /// `Null` and `Absent` are not accepted here; whether a field admits them
    /// depends on the field declaration, not on the value type.
    pub fn cast(&self, value: Value) -> Result<Value> {
        Ok(match (value, self) {
            (value @ Value::Bool(_), Self::Bool) => value,
            (value @ Value::String(_), Self::String) => value,
            (value @ Value::I32(_), Self::I32) => value,
            (value @ Value::I64(_), Self::I64) => value,
            (Value::I32(v), Self::I64) => Value::I64(i64::from(v)),
            (Value::Id(id), Self::Id(model)) if id.model_id() == *model => Value::Id(id),
            (
                value @ (Value::Bool(_) | Value::I32(_) | Value::I64(_) | Value::String(_)),
                Self::Id(model),
            ) => {
                // The pattern only admits scalar keys
                let key = Key::from_value(&value).ok_or_else(|| Error::type_mismatch(self, &value))?;
                Value::Id(Id::new(*model, key))
            }
            (Value::Record(record), Self::Model(model)) if record.model_id() == *model => {
                Value::Record(record)
            }
            (Value::List(items), Self::List(item_ty)) => Value::List(
                items
                    .into_iter()
                    .map(|item| item_ty.cast(item))
                    .collect::<Result<_>>()?,
            ),
            (value, _) => return Err(Error::type_mismatch(self, &value)),
        })
    }
}

impl From<&Self> for Type {
    fn from(value: &Self) -> Self {
        value.clone()
    }
}

impl From<ModelId> for Type {
    fn from(value: ModelId) -> Self {
        Self::Model(value)
    }
}
