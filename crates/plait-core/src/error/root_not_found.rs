use super::Error;
use crate::stmt::Value;

/// Error when the root identifier of an assembly matches no row.
///
/// This is fatal to the request: no partially filled record is produced.
#[derive(Debug)]
pub(super) struct RootNotFound {
    model: Box<str>,
    key: Box<str>,
}

impl std::error::Error for RootNotFound {}

impl core::fmt::Display for RootNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "root not found: `{}` with key {}", self.model, self.key)
    }
}

impl Error {
    /// Creates a root not found error for the given type name and key.
    pub fn root_not_found(model: &str, key: &Value) -> Error {
        Error::from(super::ErrorKind::RootNotFound(RootNotFound {
            model: model.into(),
            key: key.to_string().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a root not
    /// found error.
    pub fn is_root_not_found(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::RootNotFound(_)))
    }
}
