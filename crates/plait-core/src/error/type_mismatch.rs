use super::Error;
use crate::stmt::{Type, Value};

/// Error when a value is not compatible with the declared field type.
///
/// Only the declared widenings are applied before this is reported; values
/// are never coerced otherwise.
#[derive(Debug)]
pub(super) struct TypeMismatch {
    expected: Box<str>,
    found: &'static str,
}

impl std::error::Error for TypeMismatch {}

impl core::fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "type mismatch: expected {}, found {}",
            self.expected, self.found
        )
    }
}

impl Error {
    pub fn type_mismatch(expected: &Type, found: &Value) -> Error {
        Error::from(super::ErrorKind::TypeMismatch(TypeMismatch {
            expected: format!("{expected:?}").into(),
            found: found.kind_name(),
        }))
    }

    pub fn is_type_mismatch(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::TypeMismatch(_)))
    }
}
