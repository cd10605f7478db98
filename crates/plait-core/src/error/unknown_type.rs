use super::Error;

/// Error when a composite type name is not registered.
#[derive(Debug)]
pub(super) struct UnknownType {
    name: Box<str>,
}

impl std::error::Error for UnknownType {}

impl core::fmt::Display for UnknownType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown type `{}`", self.name)
    }
}

impl Error {
    pub fn unknown_type(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownType(UnknownType {
            name: name.into().into(),
        }))
    }

    pub fn is_unknown_type(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::UnknownType(_)))
    }
}
