use super::Error;

/// Error when a value is supplied under a name the type does not declare.
#[derive(Debug)]
pub(super) struct UnknownField {
    model: Box<str>,
    field: Box<str>,
}

impl std::error::Error for UnknownField {}

impl core::fmt::Display for UnknownField {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unknown field `{}` for type `{}`",
            self.field, self.model
        )
    }
}

impl Error {
    pub fn unknown_field(model: &str, field: &str) -> Error {
        Error::from(super::ErrorKind::UnknownField(UnknownField {
            model: model.into(),
            field: field.into(),
        }))
    }

    pub fn is_unknown_field(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::UnknownField(_)))
    }
}
