use plait_core::{
    stmt::{self, Key, Value as CoreValue},
    Error, Result,
};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core value.
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a stored SQLite value to a core value, decoding by `ty` when
    /// given. Values that do not fit `ty` are returned as stored.
    pub fn from_sql(value: SqlValue, ty: Option<&stmt::Type>) -> Result<Self> {
        let core_value = match value {
            SqlValue::Null => CoreValue::Null,
            SqlValue::Integer(value) => match ty {
                Some(stmt::Type::Bool) => CoreValue::Bool(value != 0),
                Some(stmt::Type::I32) => match i32::try_from(value) {
                    Ok(value) => CoreValue::I32(value),
                    Err(_) => CoreValue::I64(value),
                },
                _ => CoreValue::I64(value),
            },
            SqlValue::Text(value) => CoreValue::String(value),
            SqlValue::Real(value) => {
                return Err(Error::invalid_result(format!(
                    "unsupported REAL value {value}"
                )))
            }
            SqlValue::Blob(_) => return Err(Error::invalid_result("unsupported BLOB value")),
        };

        Ok(Value(core_value))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match &self.0 {
            CoreValue::Bool(true) => Ok(ToSqlOutput::Owned(SqlValue::Integer(1))),
            CoreValue::Bool(false) => Ok(ToSqlOutput::Owned(SqlValue::Integer(0))),
            CoreValue::I32(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(i64::from(*v)))),
            CoreValue::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            CoreValue::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            CoreValue::Id(id) => match id.key() {
                Key::Bool(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(i64::from(*v)))),
                Key::Int(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
                Key::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            },
            CoreValue::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            value => Err(rusqlite::Error::ToSqlConversionFailure(
                format!("{} cannot be bound as a parameter", value.kind_name()).into(),
            )),
        }
    }
}
