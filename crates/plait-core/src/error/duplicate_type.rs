use super::Error;

/// Error when a composite type is registered under a name that is already
/// taken.
#[derive(Debug)]
pub(super) struct DuplicateType {
    name: Box<str>,
}

impl std::error::Error for DuplicateType {}

impl core::fmt::Display for DuplicateType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "duplicate type `{}`", self.name)
    }
}

impl Error {
    pub fn duplicate_type(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateType(DuplicateType {
            name: name.into().into(),
        }))
    }

    pub fn is_duplicate_type(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::DuplicateType(_)))
    }
}
